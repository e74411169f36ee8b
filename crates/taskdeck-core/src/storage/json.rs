//! JSON-file-backed task store.

use std::path::PathBuf;
use std::sync::Mutex;

use uuid::Uuid;

use super::{resolve_data_dir, TaskStore};
use crate::error::StoreError;
use crate::task::{Task, TaskRecord, TaskStatus};

/// Store file name inside the data directory.
const TASKS_FILE: &str = "tasks.json";

/// Single-document JSON store.
///
/// The whole task list is loaded at open and the file rewritten after
/// every mutation, which suits the CLI's short-lived single process. A
/// missing file means an empty store; a corrupt one is surfaced as an
/// error, never silently reset.
#[derive(Debug)]
pub struct JsonStore {
    path: PathBuf,
    records: Mutex<Vec<TaskRecord>>,
}

impl JsonStore {
    /// Open the store at `tasks.json` inside the data directory.
    pub fn open_default() -> Result<Self, StoreError> {
        let dir = resolve_data_dir();
        std::fs::create_dir_all(&dir).map_err(|source| StoreError::OpenFailed {
            path: dir.clone(),
            source,
        })?;
        Self::open(dir.join(TASKS_FILE))
    }

    /// Open the store backed by the given file.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let records = match std::fs::read_to_string(&path) {
            Ok(content) => serde_json::from_str(&content).map_err(|source| StoreError::Corrupt {
                path: path.clone(),
                source,
            })?,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Vec::new(),
            Err(source) => return Err(StoreError::OpenFailed { path, source }),
        };
        Ok(JsonStore {
            path,
            records: Mutex::new(records),
        })
    }

    fn persist(&self, records: &[TaskRecord]) -> Result<(), StoreError> {
        let content =
            serde_json::to_string_pretty(records).map_err(|source| StoreError::WriteFailed {
                path: self.path.clone(),
                source: source.into(),
            })?;
        std::fs::write(&self.path, content).map_err(|source| StoreError::WriteFailed {
            path: self.path.clone(),
            source,
        })?;
        Ok(())
    }
}

impl TaskStore for JsonStore {
    fn save_task(&self, task: &Task) -> Result<Task, StoreError> {
        let mut record = task.to_record();
        record.id = Some(Uuid::new_v4().to_string());
        let mut records = self.records.lock().map_err(|_| StoreError::Poisoned)?;
        records.push(record.clone());
        self.persist(&records)?;
        Ok(Task::restore(record))
    }

    fn find_task(&self, id: &str) -> Result<Option<Task>, StoreError> {
        let records = self.records.lock().map_err(|_| StoreError::Poisoned)?;
        Ok(records
            .iter()
            .find(|r| r.id.as_deref() == Some(id))
            .cloned()
            .map(Task::restore))
    }

    fn tasks_by_owner(&self, owner_id: &str) -> Result<Vec<Task>, StoreError> {
        let records = self.records.lock().map_err(|_| StoreError::Poisoned)?;
        Ok(records
            .iter()
            .filter(|r| r.owner_id == owner_id)
            .cloned()
            .map(Task::restore)
            .collect())
    }

    fn update_task(&self, task: &Task) -> Result<Task, StoreError> {
        let record = task.to_record();
        let id = record.id.clone().ok_or(StoreError::UnsavedTask)?;
        let mut records = self.records.lock().map_err(|_| StoreError::Poisoned)?;
        let slot = records
            .iter_mut()
            .find(|r| r.id.as_deref() == Some(id.as_str()))
            .ok_or(StoreError::TaskMissing(id))?;
        *slot = record.clone();
        self.persist(&records)?;
        Ok(Task::restore(record))
    }

    fn delete_task(&self, id: &str) -> Result<bool, StoreError> {
        let mut records = self.records.lock().map_err(|_| StoreError::Poisoned)?;
        let before = records.len();
        records.retain(|r| r.id.as_deref() != Some(id));
        let deleted = records.len() < before;
        if deleted {
            self.persist(&records)?;
        }
        Ok(deleted)
    }

    fn count_by_owner_and_status(
        &self,
        owner_id: &str,
        status: TaskStatus,
    ) -> Result<usize, StoreError> {
        let records = self.records.lock().map_err(|_| StoreError::Poisoned)?;
        Ok(records
            .iter()
            .filter(|r| r.owner_id == owner_id && r.status == status)
            .count())
    }
}
