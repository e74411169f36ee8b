//! Application-level task operations over a storage port.
//!
//! [`TaskManager`] is what callers (the CLI, tests) talk to. It owns the
//! ownership checks, runs the auto-advance sweep on every listing or
//! statistics read, and keeps the store in sync with what it returns.

use chrono::{DateTime, Utc};

use crate::error::{CoreError, Result, ValidationError};
use crate::stats::{generate_insights, StatisticsSnapshot, StatusOverview, TaskStatistics};
use crate::storage::TaskStore;
use crate::task::sweep::auto_advance;
use crate::task::{NewTask, Task, TaskChanges, TaskStatus};

/// Task use cases bound to a concrete store.
pub struct TaskManager<S: TaskStore> {
    store: S,
}

impl<S: TaskStore> TaskManager<S> {
    /// Create a manager over the given store.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Access the underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Validate and persist a new task.
    pub fn create_task(&self, input: NewTask) -> Result<Task> {
        let task = Task::create(input)?;
        Ok(self.store.save_task(&task)?)
    }

    /// Fetch one task, enforcing ownership.
    pub fn get_task(&self, id: &str, owner_id: &str) -> Result<Task> {
        let task = self
            .store
            .find_task(id)?
            .ok_or_else(|| CoreError::NotFound { id: id.to_string() })?;
        if !task.belongs_to(owner_id) {
            return Err(CoreError::Forbidden { id: id.to_string() });
        }
        Ok(task)
    }

    /// List an owner's tasks, optionally narrowed to one status.
    ///
    /// Listing is a swept read: due activations and overdue failures are
    /// applied and persisted first, so the statuses returned are current.
    pub fn list_tasks(&self, owner_id: &str, status: Option<TaskStatus>) -> Result<Vec<Task>> {
        let tasks = self.swept_tasks(owner_id, Utc::now())?;
        Ok(match status {
            Some(wanted) => tasks.into_iter().filter(|t| t.status() == wanted).collect(),
            None => tasks,
        })
    }

    /// Apply a partial update and persist the result.
    pub fn update_task(&self, id: &str, owner_id: &str, changes: TaskChanges) -> Result<Task> {
        let mut task = self.get_task(id, owner_id)?;
        task.apply(changes)?;
        Ok(self.store.update_task(&task)?)
    }

    /// Move a task to an explicitly requested status.
    pub fn change_status(&self, id: &str, owner_id: &str, status: TaskStatus) -> Result<Task> {
        let mut task = self.get_task(id, owner_id)?;
        task.change_status(status)?;
        Ok(self.store.update_task(&task)?)
    }

    /// Shortcut: put a task in progress.
    pub fn start_task(&self, id: &str, owner_id: &str) -> Result<Task> {
        self.change_status(id, owner_id, TaskStatus::InProgress)
    }

    /// Shortcut: mark a task completed.
    pub fn complete_task(&self, id: &str, owner_id: &str) -> Result<Task> {
        self.change_status(id, owner_id, TaskStatus::Completed)
    }

    /// Bring a closed task back into play.
    pub fn reopen_task(&self, id: &str, owner_id: &str) -> Result<Task> {
        let mut task = self.get_task(id, owner_id)?;
        task.reopen()?;
        Ok(self.store.update_task(&task)?)
    }

    /// Soft delete: cancel the task but keep its record for history.
    pub fn cancel_task(&self, id: &str, owner_id: &str) -> Result<Task> {
        let mut task = self.get_task(id, owner_id)?;
        task.cancel();
        Ok(self.store.update_task(&task)?)
    }

    /// Hard-remove a task from the store.
    pub fn delete_task(&self, id: &str, owner_id: &str) -> Result<()> {
        self.get_task(id, owner_id)?;
        if !self.store.delete_task(id)? {
            return Err(CoreError::NotFound { id: id.to_string() });
        }
        Ok(())
    }

    /// Aggregate statistics plus generated insights for one owner.
    ///
    /// Sweeps before aggregating; a failure to persist a swept transition
    /// aborts the call instead of reporting numbers the store disagrees
    /// with.
    pub fn statistics(&self, owner_id: &str) -> Result<TaskStatistics> {
        if owner_id.trim().is_empty() {
            return Err(ValidationError::MissingOwner.into());
        }
        let now = Utc::now();
        let tasks = self.swept_tasks(owner_id, now)?;
        let snapshot = StatisticsSnapshot::from_tasks(&tasks, now);
        let insights = generate_insights(&snapshot);
        Ok(TaskStatistics { snapshot, insights })
    }

    /// Legacy quick counts straight from the store's count queries.
    ///
    /// No sweep runs here, so these numbers can lag behind
    /// [`statistics`](Self::statistics) until the next swept read.
    pub fn status_overview(&self, owner_id: &str) -> Result<StatusOverview> {
        let pending = self
            .store
            .count_by_owner_and_status(owner_id, TaskStatus::Pending)?;
        let in_progress = self
            .store
            .count_by_owner_and_status(owner_id, TaskStatus::InProgress)?;
        let completed = self
            .store
            .count_by_owner_and_status(owner_id, TaskStatus::Completed)?;
        Ok(StatusOverview::from_counts(pending, in_progress, completed))
    }

    /// Load an owner's tasks and run one auto-advance pass, persisting
    /// every transitioned task before returning the refreshed list.
    fn swept_tasks(&self, owner_id: &str, now: DateTime<Utc>) -> Result<Vec<Task>> {
        let mut tasks = self.store.tasks_by_owner(owner_id)?;
        let summary = auto_advance(&mut tasks, now);
        if !summary.is_empty() {
            for task in &tasks {
                if let Some(id) = task.id() {
                    if summary.touched(id) {
                        self.store.update_task(task)?;
                    }
                }
            }
        }
        Ok(tasks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RuleViolation;
    use crate::storage::MemoryStore;
    use crate::task::TaskRecord;
    use chrono::Duration;

    fn manager() -> TaskManager<MemoryStore> {
        TaskManager::new(MemoryStore::new())
    }

    fn new_task(title: &str, owner: &str) -> NewTask {
        NewTask {
            title: title.to_string(),
            owner_id: owner.to_string(),
            ..NewTask::default()
        }
    }

    fn seed_record(
        store: &MemoryStore,
        status: TaskStatus,
        start: DateTime<Utc>,
        deadline: Option<DateTime<Utc>>,
    ) -> String {
        let task = Task::restore(TaskRecord {
            id: None,
            title: "Seeded".to_string(),
            description: String::new(),
            status,
            owner_id: "owner-1".to_string(),
            start_date: start,
            deadline,
            created_at: start,
            updated_at: start,
        });
        let saved = store.save_task(&task).unwrap();
        saved.id().unwrap().to_string()
    }

    #[test]
    fn create_assigns_id_and_get_returns_it() {
        let mgr = manager();
        let task = mgr.create_task(new_task("Write report", "owner-1")).unwrap();
        let id = task.id().unwrap();

        let fetched = mgr.get_task(id, "owner-1").unwrap();
        assert_eq!(fetched.title(), "Write report");
        assert_eq!(fetched.status(), TaskStatus::Pending);
    }

    #[test]
    fn create_propagates_validation_errors() {
        let mgr = manager();
        let err = mgr.create_task(new_task("   ", "owner-1")).unwrap_err();
        assert!(matches!(
            err,
            CoreError::Validation(ValidationError::EmptyTitle)
        ));
    }

    #[test]
    fn get_distinguishes_missing_from_foreign() {
        let mgr = manager();
        let task = mgr.create_task(new_task("Mine", "owner-1")).unwrap();
        let id = task.id().unwrap();

        assert!(matches!(
            mgr.get_task("no-such-id", "owner-1").unwrap_err(),
            CoreError::NotFound { .. }
        ));
        assert!(matches!(
            mgr.get_task(id, "owner-2").unwrap_err(),
            CoreError::Forbidden { .. }
        ));
    }

    #[test]
    fn list_filters_by_status_after_sweeping() {
        let mgr = manager();
        let a = mgr.create_task(new_task("A", "owner-1")).unwrap();
        mgr.create_task(new_task("B", "owner-1")).unwrap();
        mgr.create_task(new_task("Other", "owner-2")).unwrap();
        mgr.start_task(a.id().unwrap(), "owner-1").unwrap();

        let all = mgr.list_tasks("owner-1", None).unwrap();
        assert_eq!(all.len(), 2);

        let in_progress = mgr
            .list_tasks("owner-1", Some(TaskStatus::InProgress))
            .unwrap();
        assert_eq!(in_progress.len(), 1);
        assert_eq!(in_progress[0].title(), "A");
    }

    #[test]
    fn list_persists_sweep_transitions() {
        let store = MemoryStore::new();
        let now = Utc::now();
        let due = seed_record(&store, TaskStatus::Scheduled, now - Duration::minutes(5), None);
        let late = seed_record(
            &store,
            TaskStatus::InProgress,
            now - Duration::days(2),
            Some(now - Duration::hours(1)),
        );

        let mgr = TaskManager::new(store);
        mgr.list_tasks("owner-1", None).unwrap();

        // transitions are visible through the store afterwards
        let promoted = mgr.store().find_task(&due).unwrap().unwrap();
        assert_eq!(promoted.status(), TaskStatus::Pending);
        let failed = mgr.store().find_task(&late).unwrap().unwrap();
        assert_eq!(failed.status(), TaskStatus::Failed);
    }

    #[test]
    fn update_applies_changes_through_the_store() {
        let mgr = manager();
        let task = mgr.create_task(new_task("Draft", "owner-1")).unwrap();
        let id = task.id().unwrap();

        let updated = mgr
            .update_task(
                id,
                "owner-1",
                TaskChanges {
                    title: Some("Draft v2".to_string()),
                    ..TaskChanges::default()
                },
            )
            .unwrap();
        assert_eq!(updated.title(), "Draft v2");

        let stored = mgr.get_task(id, "owner-1").unwrap();
        assert_eq!(stored.title(), "Draft v2");
    }

    #[test]
    fn status_rules_surface_as_rule_violations() {
        let mgr = manager();
        let task = mgr.create_task(new_task("Strict", "owner-1")).unwrap();
        let id = task.id().unwrap();

        mgr.start_task(id, "owner-1").unwrap();
        mgr.complete_task(id, "owner-1").unwrap();

        let err = mgr
            .change_status(id, "owner-1", TaskStatus::Pending)
            .unwrap_err();
        assert!(matches!(
            err,
            CoreError::Rule(RuleViolation::CompletedToPending)
        ));
        // the refused change never reached the store
        assert_eq!(
            mgr.get_task(id, "owner-1").unwrap().status(),
            TaskStatus::Completed
        );
    }

    #[test]
    fn reopen_runs_through_the_entity_rules() {
        let mgr = manager();
        let task = mgr.create_task(new_task("Again", "owner-1")).unwrap();
        let id = task.id().unwrap();

        mgr.complete_task(id, "owner-1").unwrap();
        let reopened = mgr.reopen_task(id, "owner-1").unwrap();
        assert_eq!(reopened.status(), TaskStatus::InProgress);
    }

    #[test]
    fn cancel_keeps_the_record_delete_removes_it() {
        let mgr = manager();
        let kept = mgr.create_task(new_task("Soft", "owner-1")).unwrap();
        let gone = mgr.create_task(new_task("Hard", "owner-1")).unwrap();
        let kept_id = kept.id().unwrap();
        let gone_id = gone.id().unwrap();

        let cancelled = mgr.cancel_task(kept_id, "owner-1").unwrap();
        assert_eq!(cancelled.status(), TaskStatus::Cancelled);
        assert!(mgr.get_task(kept_id, "owner-1").is_ok());

        mgr.delete_task(gone_id, "owner-1").unwrap();
        assert!(matches!(
            mgr.get_task(gone_id, "owner-1").unwrap_err(),
            CoreError::NotFound { .. }
        ));
    }

    #[test]
    fn delete_checks_ownership_first() {
        let mgr = manager();
        let task = mgr.create_task(new_task("Protected", "owner-1")).unwrap();
        let id = task.id().unwrap();

        assert!(matches!(
            mgr.delete_task(id, "owner-2").unwrap_err(),
            CoreError::Forbidden { .. }
        ));
        assert!(mgr.get_task(id, "owner-1").is_ok());
    }

    #[test]
    fn statistics_requires_an_owner_id() {
        let mgr = manager();
        let err = mgr.statistics("  ").unwrap_err();
        assert!(matches!(
            err,
            CoreError::Validation(ValidationError::MissingOwner)
        ));
    }

    #[test]
    fn statistics_sweeps_then_aggregates() {
        let store = MemoryStore::new();
        let now = Utc::now();
        seed_record(
            &store,
            TaskStatus::Pending,
            now - Duration::days(3),
            Some(now - Duration::hours(2)),
        );
        seed_record(&store, TaskStatus::Completed, now - Duration::days(3), None);

        let mgr = TaskManager::new(store);
        let stats = mgr.statistics("owner-1").unwrap();

        // the overdue pending task was failed before counting
        assert_eq!(stats.snapshot.total, 2);
        assert_eq!(stats.snapshot.failed, 1);
        assert_eq!(stats.snapshot.pending, 0);
        assert_eq!(stats.snapshot.completed, 1);
        assert_eq!(stats.snapshot.completion_rate, 100);
        assert!(!stats.insights.is_empty());
    }

    #[test]
    fn status_overview_counts_without_sweeping() {
        let store = MemoryStore::new();
        let now = Utc::now();
        // overdue but never swept: still counted as pending
        seed_record(
            &store,
            TaskStatus::Pending,
            now - Duration::days(3),
            Some(now - Duration::hours(2)),
        );
        seed_record(&store, TaskStatus::Completed, now - Duration::days(1), None);

        let mgr = TaskManager::new(store);
        let overview = mgr.status_overview("owner-1").unwrap();
        assert_eq!(overview.pending, 1);
        assert_eq!(overview.in_progress, 0);
        assert_eq!(overview.completed, 1);
        assert_eq!(overview.total, 2);
        assert_eq!(overview.completion_rate, 50);
    }
}
