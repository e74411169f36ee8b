//! Task management commands for CLI.

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use clap::Subcommand;
use taskdeck_core::{JsonStore, NewTask, TaskChanges, TaskManager, TaskStatus};

#[derive(Subcommand)]
pub enum TaskAction {
    /// Create a new task
    Add {
        /// Task title
        title: String,
        /// Task description
        #[arg(long)]
        description: Option<String>,
        /// Start date, RFC 3339 or YYYY-MM-DD; omitted means now
        #[arg(long)]
        start: Option<String>,
        /// Deadline, RFC 3339 or YYYY-MM-DD
        #[arg(long)]
        deadline: Option<String>,
        /// Owner id (default: configured owner)
        #[arg(long)]
        owner: Option<String>,
    },
    /// List tasks
    List {
        /// Filter by status (e.g. pending, in_progress)
        #[arg(long)]
        status: Option<String>,
        /// Owner id (default: configured owner)
        #[arg(long)]
        owner: Option<String>,
    },
    /// Get task details
    Show {
        /// Task ID
        id: String,
        #[arg(long)]
        owner: Option<String>,
    },
    /// Update a task
    Update {
        /// Task ID
        id: String,
        /// New title
        #[arg(long)]
        title: Option<String>,
        /// New description
        #[arg(long)]
        description: Option<String>,
        /// New status (same rules as `task status`)
        #[arg(long)]
        status: Option<String>,
        /// New start date
        #[arg(long)]
        start: Option<String>,
        /// New deadline
        #[arg(long, conflicts_with = "clear_deadline")]
        deadline: Option<String>,
        /// Remove the deadline
        #[arg(long)]
        clear_deadline: bool,
        #[arg(long)]
        owner: Option<String>,
    },
    /// Change a task's status
    Status {
        /// Task ID
        id: String,
        /// Target status (case-insensitive; FAILED and CANCELLED are refused)
        status: String,
        #[arg(long)]
        owner: Option<String>,
    },
    /// Start working on a task
    Start {
        /// Task ID
        id: String,
        #[arg(long)]
        owner: Option<String>,
    },
    /// Mark a task completed
    Done {
        /// Task ID
        id: String,
        #[arg(long)]
        owner: Option<String>,
    },
    /// Reopen a completed or cancelled task
    Reopen {
        /// Task ID
        id: String,
        #[arg(long)]
        owner: Option<String>,
    },
    /// Cancel a task, keeping its record
    Cancel {
        /// Task ID
        id: String,
        #[arg(long)]
        owner: Option<String>,
    },
    /// Delete a task permanently
    Delete {
        /// Task ID
        id: String,
        #[arg(long)]
        owner: Option<String>,
    },
}

pub fn run(action: TaskAction) -> Result<(), Box<dyn std::error::Error>> {
    let manager = TaskManager::new(JsonStore::open_default()?);

    match action {
        TaskAction::Add {
            title,
            description,
            start,
            deadline,
            owner,
        } => {
            let task = manager.create_task(NewTask {
                title,
                description,
                owner_id: super::resolve_owner(owner),
                start_date: start.as_deref().map(parse_datetime).transpose()?,
                deadline: deadline.as_deref().map(parse_datetime).transpose()?,
            })?;
            println!("Task created: {}", task.id().unwrap_or("?"));
            println!("{}", serde_json::to_string_pretty(&task.view(Utc::now()))?);
        }
        TaskAction::List { status, owner } => {
            let owner_id = super::resolve_owner(owner);
            let status: Option<TaskStatus> = status.as_deref().map(str::parse).transpose()?;
            let tasks = manager.list_tasks(&owner_id, status)?;
            let now = Utc::now();
            let views: Vec<_> = tasks.iter().map(|t| t.view(now)).collect();
            println!("{}", serde_json::to_string_pretty(&views)?);
        }
        TaskAction::Show { id, owner } => {
            let task = manager.get_task(&id, &super::resolve_owner(owner))?;
            println!("{}", serde_json::to_string_pretty(&task.view(Utc::now()))?);
        }
        TaskAction::Update {
            id,
            title,
            description,
            status,
            start,
            deadline,
            clear_deadline,
            owner,
        } => {
            let changes = TaskChanges {
                title,
                description,
                status: status.as_deref().map(str::parse).transpose()?,
                start_date: start.as_deref().map(parse_datetime).transpose()?,
                deadline: if clear_deadline {
                    Some(None)
                } else {
                    deadline.as_deref().map(parse_datetime).transpose()?.map(Some)
                },
            };
            let task = manager.update_task(&id, &super::resolve_owner(owner), changes)?;
            println!("Task updated:");
            println!("{}", serde_json::to_string_pretty(&task.view(Utc::now()))?);
        }
        TaskAction::Status { id, status, owner } => {
            let status: TaskStatus = status.parse()?;
            let task = manager.change_status(&id, &super::resolve_owner(owner), status)?;
            println!("{}", serde_json::to_string_pretty(&task.view(Utc::now()))?);
        }
        TaskAction::Start { id, owner } => {
            let task = manager.start_task(&id, &super::resolve_owner(owner))?;
            println!("{}", serde_json::to_string_pretty(&task.view(Utc::now()))?);
        }
        TaskAction::Done { id, owner } => {
            let task = manager.complete_task(&id, &super::resolve_owner(owner))?;
            println!("{}", serde_json::to_string_pretty(&task.view(Utc::now()))?);
        }
        TaskAction::Reopen { id, owner } => {
            let task = manager.reopen_task(&id, &super::resolve_owner(owner))?;
            println!("{}", serde_json::to_string_pretty(&task.view(Utc::now()))?);
        }
        TaskAction::Cancel { id, owner } => {
            let task = manager.cancel_task(&id, &super::resolve_owner(owner))?;
            println!("Task cancelled: {id}");
            println!("{}", serde_json::to_string_pretty(&task.view(Utc::now()))?);
        }
        TaskAction::Delete { id, owner } => {
            manager.delete_task(&id, &super::resolve_owner(owner))?;
            println!("Task deleted: {id}");
        }
    }
    Ok(())
}

/// Parse a CLI date as RFC 3339, or as a plain date at midnight UTC.
fn parse_datetime(value: &str) -> Result<DateTime<Utc>, Box<dyn std::error::Error>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Ok(dt.with_timezone(&Utc));
    }
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        if let Some(midnight) = date.and_hms_opt(0, 0, 0) {
            return Ok(Utc.from_utc_datetime(&midnight));
        }
    }
    Err(format!("invalid date '{value}': expected RFC 3339 or YYYY-MM-DD").into())
}
