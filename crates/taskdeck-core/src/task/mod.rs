//! Task entity with validated construction and a constrained status machine.
//!
//! All mutation goes through methods; there are no raw setters. Time-derived
//! queries take `now` as a parameter so behavior stays deterministic under
//! test. Storage adapters rebuild tasks from [`TaskRecord`] via
//! [`Task::restore`], which trusts its input and skips validation.

pub mod sweep;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{DomainError, RuleViolation, ValidationError};

/// Maximum title length in characters, counted after trimming.
pub const MAX_TITLE_LEN: usize = 200;

/// Task status enumeration.
///
/// Status flow:
///
///   SCHEDULED ──(start date reached, sweep)──> PENDING
///   PENDING <──────> IN_PROGRESS ──────> COMPLETED
///   COMPLETED ──(reopen)──> IN_PROGRESS
///   SCHEDULED / PENDING / IN_PROGRESS ──(deadline sweep)──> FAILED
///   any ──(cancel)──> CANCELLED
///
/// Direct status changes are mostly free-form; the exceptions are
/// COMPLETED → PENDING (must pass through IN_PROGRESS), FAILED (owned by
/// the deadline sweep) and CANCELLED (owned by [`Task::cancel`]).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskStatus {
    /// Start date lies in the future; waiting for activation
    Scheduled,
    /// Ready to be worked on
    Pending,
    /// Actively being worked on
    InProgress,
    /// Finished successfully
    Completed,
    /// Deadline passed without completion; applied only by the sweep
    Failed,
    /// Withdrawn by its owner; the soft-delete state
    Cancelled,
}

impl TaskStatus {
    /// Canonical wire form of the status.
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Scheduled => "SCHEDULED",
            TaskStatus::Pending => "PENDING",
            TaskStatus::InProgress => "IN_PROGRESS",
            TaskStatus::Completed => "COMPLETED",
            TaskStatus::Failed => "FAILED",
            TaskStatus::Cancelled => "CANCELLED",
        }
    }

    /// Check whether a caller may request a direct change to `to`.
    pub fn can_change_to(&self, to: TaskStatus) -> bool {
        manual_change(*self, to).is_ok()
    }
}

impl Default for TaskStatus {
    fn default() -> Self {
        TaskStatus::Pending
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskStatus {
    type Err = ValidationError;

    /// Parse a status string; case-insensitive, `-` and space read as `_`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_uppercase().replace('-', "_").replace(' ', "_");
        match normalized.as_str() {
            "SCHEDULED" => Ok(TaskStatus::Scheduled),
            "PENDING" => Ok(TaskStatus::Pending),
            "IN_PROGRESS" => Ok(TaskStatus::InProgress),
            "COMPLETED" => Ok(TaskStatus::Completed),
            "FAILED" => Ok(TaskStatus::Failed),
            "CANCELLED" => Ok(TaskStatus::Cancelled),
            _ => Err(ValidationError::UnknownStatus(s.to_string())),
        }
    }
}

/// Rules for caller-requested status changes.
///
/// FAILED is entered only by the overdue sweep and CANCELLED only by
/// [`Task::cancel`]; everything else is allowed except skipping straight
/// from COMPLETED back to PENDING.
fn manual_change(from: TaskStatus, to: TaskStatus) -> Result<(), RuleViolation> {
    match (from, to) {
        (TaskStatus::Completed, TaskStatus::Pending) => Err(RuleViolation::CompletedToPending),
        (_, TaskStatus::Failed) => Err(RuleViolation::ManualFail),
        (_, TaskStatus::Cancelled) => Err(RuleViolation::ManualCancel),
        _ => Ok(()),
    }
}

fn validate_title(raw: &str) -> Result<String, ValidationError> {
    let title = raw.trim();
    if title.is_empty() {
        return Err(ValidationError::EmptyTitle);
    }
    let len = title.chars().count();
    if len > MAX_TITLE_LEN {
        return Err(ValidationError::TitleTooLong { len });
    }
    Ok(title.to_string())
}

/// Input for validated task construction.
#[derive(Debug, Clone, Default)]
pub struct NewTask {
    /// Task title (required, trimmed, at most [`MAX_TITLE_LEN`] characters)
    pub title: String,
    /// Optional description; stored trimmed, empty when absent
    pub description: Option<String>,
    /// Owner identifier (required, immutable after creation)
    pub owner_id: String,
    /// Start of the task; defaults to creation time
    pub start_date: Option<DateTime<Utc>>,
    /// Optional deadline; must not precede the start date
    pub deadline: Option<DateTime<Utc>>,
}

/// Partial update for [`Task::apply`]; only provided fields are touched.
#[derive(Debug, Clone, Default)]
pub struct TaskChanges {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<TaskStatus>,
    pub start_date: Option<DateTime<Utc>>,
    /// Outer `None` leaves the deadline alone; `Some(None)` clears it.
    pub deadline: Option<Option<DateTime<Utc>>>,
}

/// Raw task fields as persisted.
///
/// Trusted reconstruction input for [`Task::restore`]. Storage adapters
/// serialize and deserialize this shape; application code never builds one
/// to bypass validation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskRecord {
    pub id: Option<String>,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub status: TaskStatus,
    pub owner_id: String,
    pub start_date: DateTime<Utc>,
    #[serde(default)]
    pub deadline: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A task with an owner, a lifecycle status and optional time bounds.
#[derive(Debug, Clone, Serialize)]
pub struct Task {
    /// Assigned by persistence; `None` until first saved
    id: Option<String>,
    title: String,
    description: String,
    status: TaskStatus,
    owner_id: String,
    start_date: DateTime<Utc>,
    deadline: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Task {
    /// Create a new task, validating every field.
    ///
    /// The initial status is derived, never caller-supplied: SCHEDULED when
    /// the start date lies strictly in the future, PENDING otherwise.
    pub fn create(input: NewTask) -> Result<Task, ValidationError> {
        let title = validate_title(&input.title)?;
        let owner_id = input.owner_id.trim();
        if owner_id.is_empty() {
            return Err(ValidationError::MissingOwner);
        }

        let now = Utc::now();
        let start_date = input.start_date.unwrap_or(now);
        if let Some(deadline) = input.deadline {
            if deadline < start_date {
                return Err(ValidationError::DeadlineBeforeStart {
                    start: start_date,
                    deadline,
                });
            }
        }

        let status = if start_date > now {
            TaskStatus::Scheduled
        } else {
            TaskStatus::Pending
        };

        Ok(Task {
            id: None,
            title,
            description: input
                .description
                .map(|d| d.trim().to_string())
                .unwrap_or_default(),
            status,
            owner_id: owner_id.to_string(),
            start_date,
            deadline: input.deadline,
            created_at: now,
            updated_at: now,
        })
    }

    /// Rebuild a task from stored fields without validation.
    pub fn restore(record: TaskRecord) -> Task {
        Task {
            id: record.id,
            title: record.title,
            description: record.description,
            status: record.status,
            owner_id: record.owner_id,
            start_date: record.start_date,
            deadline: record.deadline,
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }

    /// Snapshot the task fields for persistence.
    pub fn to_record(&self) -> TaskRecord {
        TaskRecord {
            id: self.id.clone(),
            title: self.title.clone(),
            description: self.description.clone(),
            status: self.status,
            owner_id: self.owner_id.clone(),
            start_date: self.start_date,
            deadline: self.deadline,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }

    // ── Queries ──

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn status(&self) -> TaskStatus {
        self.status
    }

    pub fn owner_id(&self) -> &str {
        &self.owner_id
    }

    pub fn start_date(&self) -> DateTime<Utc> {
        self.start_date
    }

    pub fn deadline(&self) -> Option<DateTime<Utc>> {
        self.deadline
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Ownership check used before any per-task operation.
    pub fn belongs_to(&self, owner_id: &str) -> bool {
        self.owner_id == owner_id
    }

    /// Whether the deadline has passed without completion.
    ///
    /// Counts FAILED and CANCELLED tasks too; only COMPLETED is exempt.
    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        match self.deadline {
            Some(deadline) => self.status != TaskStatus::Completed && now > deadline,
            None => false,
        }
    }

    /// Whether the sweep should mark this task failed.
    pub fn should_auto_fail(&self, now: DateTime<Utc>) -> bool {
        match self.deadline {
            Some(deadline) => {
                !matches!(
                    self.status,
                    TaskStatus::Completed | TaskStatus::Failed | TaskStatus::Cancelled
                ) && now > deadline
            }
            None => false,
        }
    }

    /// Whether the sweep should promote this scheduled task to pending.
    pub fn should_activate(&self, now: DateTime<Utc>) -> bool {
        self.status == TaskStatus::Scheduled && now >= self.start_date
    }

    /// Linear progress between start and deadline, as a whole percentage.
    ///
    /// `None` without a deadline. 100 once completed or past the deadline,
    /// 0 before the start date.
    pub fn progress_percentage(&self, now: DateTime<Utc>) -> Option<u8> {
        let deadline = self.deadline?;
        if self.status == TaskStatus::Completed || now >= deadline {
            return Some(100);
        }
        if now <= self.start_date {
            return Some(0);
        }
        let span = (deadline - self.start_date).num_milliseconds() as f64;
        let elapsed = (now - self.start_date).num_milliseconds() as f64;
        Some((elapsed / span * 100.0).round() as u8)
    }

    /// Serializable projection with the computed display fields.
    pub fn view(&self, now: DateTime<Utc>) -> TaskView {
        TaskView {
            id: self.id.clone(),
            title: self.title.clone(),
            description: self.description.clone(),
            status: self.status,
            owner_id: self.owner_id.clone(),
            start_date: self.start_date,
            deadline: self.deadline,
            progress: self.progress_percentage(now),
            is_overdue: self.is_overdue(now),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }

    // ── Commands ──

    /// Request a direct status change.
    pub fn change_status(&mut self, next: TaskStatus) -> Result<(), RuleViolation> {
        manual_change(self.status, next)?;
        self.status = next;
        self.touch();
        Ok(())
    }

    /// Bring a closed task back into play.
    ///
    /// COMPLETED reopens into IN_PROGRESS, everything else into PENDING.
    /// FAILED tasks stay failed.
    pub fn reopen(&mut self) -> Result<(), RuleViolation> {
        let next = match self.status {
            TaskStatus::Completed => TaskStatus::InProgress,
            TaskStatus::Failed => return Err(RuleViolation::ReopenFailed),
            _ => TaskStatus::Pending,
        };
        self.status = next;
        self.touch();
        Ok(())
    }

    /// Cancel the task. The only path into CANCELLED; idempotent.
    pub fn cancel(&mut self) {
        if self.status == TaskStatus::Cancelled {
            return;
        }
        self.status = TaskStatus::Cancelled;
        self.touch();
    }

    /// Replace the title.
    pub fn update_title(&mut self, title: &str) -> Result<(), ValidationError> {
        self.title = validate_title(title)?;
        self.touch();
        Ok(())
    }

    /// Replace the description (trimmed; empty clears it).
    pub fn update_description(&mut self, description: &str) {
        self.description = description.trim().to_string();
        self.touch();
    }

    /// Move the start date, keeping it at or before any deadline.
    pub fn update_start_date(&mut self, start: DateTime<Utc>) -> Result<(), ValidationError> {
        if let Some(deadline) = self.deadline {
            if start > deadline {
                return Err(ValidationError::StartAfterDeadline { start, deadline });
            }
        }
        self.start_date = start;
        self.touch();
        Ok(())
    }

    /// Set or clear the deadline, keeping it at or after the start date.
    pub fn update_deadline(
        &mut self,
        deadline: Option<DateTime<Utc>>,
    ) -> Result<(), ValidationError> {
        if let Some(deadline) = deadline {
            if deadline < self.start_date {
                return Err(ValidationError::DeadlineBeforeStart {
                    start: self.start_date,
                    deadline,
                });
            }
        }
        self.deadline = deadline;
        self.touch();
        Ok(())
    }

    /// Apply a partial update in field order: title, description, status,
    /// start date, deadline. Bumps `updated_at` even when no field is given.
    pub fn apply(&mut self, changes: TaskChanges) -> Result<(), DomainError> {
        if let Some(title) = &changes.title {
            self.title = validate_title(title)?;
        }
        if let Some(description) = &changes.description {
            self.description = description.trim().to_string();
        }
        if let Some(status) = changes.status {
            manual_change(self.status, status)?;
            self.status = status;
        }
        if let Some(start) = changes.start_date {
            if let Some(deadline) = self.deadline {
                if start > deadline {
                    return Err(ValidationError::StartAfterDeadline { start, deadline }.into());
                }
            }
            self.start_date = start;
        }
        if let Some(deadline) = changes.deadline {
            if let Some(deadline) = deadline {
                if deadline < self.start_date {
                    return Err(ValidationError::DeadlineBeforeStart {
                        start: self.start_date,
                        deadline,
                    }
                    .into());
                }
            }
            self.deadline = deadline;
        }
        self.touch();
        Ok(())
    }

    /// Sweep transition: deadline passed, mark failed.
    ///
    /// No-op when already COMPLETED or FAILED, so double application from
    /// overlapping sweeps is harmless.
    pub(crate) fn mark_failed(&mut self) {
        if matches!(self.status, TaskStatus::Completed | TaskStatus::Failed) {
            return;
        }
        self.status = TaskStatus::Failed;
        self.touch();
    }

    /// Sweep transition: start date reached, promote SCHEDULED to PENDING.
    ///
    /// No-op from any other status.
    pub(crate) fn mark_activated(&mut self) {
        if self.status != TaskStatus::Scheduled {
            return;
        }
        self.status = TaskStatus::Pending;
        self.touch();
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

/// Serializable task projection for listings and detail output.
#[derive(Debug, Clone, Serialize)]
pub struct TaskView {
    pub id: Option<String>,
    pub title: String,
    pub description: String,
    pub status: TaskStatus,
    pub owner_id: String,
    pub start_date: DateTime<Utc>,
    pub deadline: Option<DateTime<Utc>>,
    /// Linear progress toward the deadline; `None` without one
    pub progress: Option<u8>,
    pub is_overdue: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
