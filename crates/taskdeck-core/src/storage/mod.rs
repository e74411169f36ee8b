//! Storage port and adapters.
//!
//! [`TaskStore`] is the persistence seam the manager runs against; the
//! in-memory and JSON-file adapters both implement it. Adapters assign
//! identities on save and rebuild entities through
//! [`Task::restore`](crate::task::Task::restore).

mod config;
mod json;
mod memory;

pub use config::Config;
pub use json::JsonStore;
pub use memory::MemoryStore;

use std::path::PathBuf;

use crate::error::StoreError;
use crate::task::{Task, TaskStatus};

/// Synchronous persistence port for tasks.
pub trait TaskStore {
    /// Persist a new task, assigning its ID, and return the stored copy.
    fn save_task(&self, task: &Task) -> Result<Task, StoreError>;

    /// Look up a task by ID.
    fn find_task(&self, id: &str) -> Result<Option<Task>, StoreError>;

    /// Every task belonging to `owner_id`, any status, in insertion order.
    fn tasks_by_owner(&self, owner_id: &str) -> Result<Vec<Task>, StoreError>;

    /// Overwrite a stored task. Fails with [`StoreError::TaskMissing`]
    /// when the task is no longer in the store.
    fn update_task(&self, task: &Task) -> Result<Task, StoreError>;

    /// Hard-remove a task. Returns whether anything was deleted.
    fn delete_task(&self, id: &str) -> Result<bool, StoreError>;

    /// Count one owner's tasks in one status.
    fn count_by_owner_and_status(
        &self,
        owner_id: &str,
        status: TaskStatus,
    ) -> Result<usize, StoreError>;
}

fn resolve_data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("TASKDECK_DATA_DIR") {
        if !dir.is_empty() {
            return PathBuf::from(dir);
        }
    }

    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("TASKDECK_ENV").unwrap_or_else(|_| "production".to_string());

    if env == "dev" {
        base_dir.join("taskdeck-dev")
    } else {
        base_dir.join("taskdeck")
    }
}

/// Returns `~/.config/taskdeck[-dev]/` based on TASKDECK_ENV, creating it
/// if needed.
///
/// Set TASKDECK_ENV=dev to use the development data directory, or
/// TASKDECK_DATA_DIR to point somewhere else entirely (useful for tests).
pub fn data_dir() -> std::io::Result<PathBuf> {
    let dir = resolve_data_dir();
    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
