//! In-memory task store.

use std::sync::RwLock;

use uuid::Uuid;

use super::TaskStore;
use crate::error::StoreError;
use crate::task::{Task, TaskRecord, TaskStatus};

/// Vec-backed store; insertion order doubles as listing order.
///
/// The reference [`TaskStore`] implementation. Used throughout the test
/// suites and for embedding without a data directory.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: RwLock<Vec<TaskRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored tasks across all owners.
    pub fn len(&self) -> usize {
        self.records.read().map(|r| r.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl TaskStore for MemoryStore {
    fn save_task(&self, task: &Task) -> Result<Task, StoreError> {
        let mut record = task.to_record();
        record.id = Some(Uuid::new_v4().to_string());
        let mut records = self.records.write().map_err(|_| StoreError::Poisoned)?;
        records.push(record.clone());
        Ok(Task::restore(record))
    }

    fn find_task(&self, id: &str) -> Result<Option<Task>, StoreError> {
        let records = self.records.read().map_err(|_| StoreError::Poisoned)?;
        Ok(records
            .iter()
            .find(|r| r.id.as_deref() == Some(id))
            .cloned()
            .map(Task::restore))
    }

    fn tasks_by_owner(&self, owner_id: &str) -> Result<Vec<Task>, StoreError> {
        let records = self.records.read().map_err(|_| StoreError::Poisoned)?;
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
        let mut records = self.records.write().map_err(|_| StoreError::Poisoned)?;
        let slot = records
            .iter_mut()
            .find(|r| r.id.as_deref() == Some(id.as_str()))
            .ok_or(StoreError::TaskMissing(id))?;
        *slot = record.clone();
        Ok(Task::restore(record))
    }

    fn delete_task(&self, id: &str) -> Result<bool, StoreError> {
        let mut records = self.records.write().map_err(|_| StoreError::Poisoned)?;
        let before = records.len();
        records.retain(|r| r.id.as_deref() != Some(id));
        Ok(records.len() < before)
    }

    fn count_by_owner_and_status(
        &self,
        owner_id: &str,
        status: TaskStatus,
    ) -> Result<usize, StoreError> {
        let records = self.records.read().map_err(|_| StoreError::Poisoned)?;
        Ok(records
            .iter()
            .filter(|r| r.owner_id == owner_id && r.status == status)
            .count())
    }
}
