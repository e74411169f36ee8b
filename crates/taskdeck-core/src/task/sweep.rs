//! Lazy auto-advance sweep over task lists.
//!
//! No background scheduler moves tasks along; instead every statistics or
//! listing read runs one pass over the owner's tasks, promoting scheduled
//! tasks whose start date arrived and failing tasks whose deadline passed.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::Task;

/// Summary of one auto-advance pass.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SweepSummary {
    /// IDs of scheduled tasks promoted to pending
    pub activated: Vec<String>,
    /// IDs of tasks marked failed after their deadline passed
    pub failed: Vec<String>,
}

impl SweepSummary {
    /// Whether the pass changed nothing.
    pub fn is_empty(&self) -> bool {
        self.activated.is_empty() && self.failed.is_empty()
    }

    /// Number of transitions applied.
    pub fn changed_count(&self) -> usize {
        self.activated.len() + self.failed.len()
    }

    /// Whether the task with the given ID was transitioned by this pass.
    pub fn touched(&self, id: &str) -> bool {
        self.activated.iter().any(|t| t == id) || self.failed.iter().any(|t| t == id)
    }
}

/// Apply due auto-transitions to every task, in place.
///
/// Activation (SCHEDULED → PENDING) is checked before the overdue
/// auto-fail, and at most one transition applies per task per pass: a
/// scheduled task whose deadline already passed activates now and fails on
/// the next pass. Tasks without an assigned ID are transitioned but not
/// reported in the summary.
pub fn auto_advance(tasks: &mut [Task], now: DateTime<Utc>) -> SweepSummary {
    let mut summary = SweepSummary::default();
    for task in tasks.iter_mut() {
        if task.should_activate(now) {
            task.mark_activated();
            if let Some(id) = task.id() {
                summary.activated.push(id.to_string());
            }
        } else if task.should_auto_fail(now) {
            task.mark_failed();
            if let Some(id) = task.id() {
                summary.failed.push(id.to_string());
            }
        }
    }
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::{TaskRecord, TaskStatus};
    use chrono::Duration;

    fn restored(
        id: &str,
        status: TaskStatus,
        start: DateTime<Utc>,
        deadline: Option<DateTime<Utc>>,
    ) -> Task {
        Task::restore(TaskRecord {
            id: Some(id.to_string()),
            title: format!("Task {id}"),
            description: String::new(),
            status,
            owner_id: "owner-1".to_string(),
            start_date: start,
            deadline,
            created_at: start,
            updated_at: start,
        })
    }

    #[test]
    fn promotes_scheduled_tasks_whose_start_arrived() {
        let now = Utc::now();
        let mut tasks = vec![
            restored("due", TaskStatus::Scheduled, now - Duration::minutes(1), None),
            restored("early", TaskStatus::Scheduled, now + Duration::hours(1), None),
        ];

        let summary = auto_advance(&mut tasks, now);

        assert_eq!(tasks[0].status(), TaskStatus::Pending);
        assert_eq!(tasks[1].status(), TaskStatus::Scheduled);
        assert_eq!(summary.activated, vec!["due".to_string()]);
        assert!(summary.failed.is_empty());
    }

    #[test]
    fn fails_open_tasks_past_their_deadline() {
        let now = Utc::now();
        let start = now - Duration::days(2);
        let passed = Some(now - Duration::hours(1));
        let mut tasks = vec![
            restored("open", TaskStatus::Pending, start, passed),
            restored("busy", TaskStatus::InProgress, start, passed),
            restored("done", TaskStatus::Completed, start, passed),
            restored("gone", TaskStatus::Cancelled, start, passed),
            restored("lost", TaskStatus::Failed, start, passed),
        ];

        let summary = auto_advance(&mut tasks, now);

        assert_eq!(tasks[0].status(), TaskStatus::Failed);
        assert_eq!(tasks[1].status(), TaskStatus::Failed);
        assert_eq!(tasks[2].status(), TaskStatus::Completed);
        assert_eq!(tasks[3].status(), TaskStatus::Cancelled);
        assert_eq!(summary.failed, vec!["open".to_string(), "busy".to_string()]);
        assert!(summary.activated.is_empty());
        // already failed: no double report
        assert_eq!(summary.changed_count(), 2);
    }

    #[test]
    fn activation_wins_over_auto_fail_within_one_pass() {
        let now = Utc::now();
        let mut tasks = vec![restored(
            "late",
            TaskStatus::Scheduled,
            now - Duration::days(1),
            Some(now - Duration::hours(1)),
        )];

        let first = auto_advance(&mut tasks, now);
        assert_eq!(tasks[0].status(), TaskStatus::Pending);
        assert_eq!(first.activated, vec!["late".to_string()]);
        assert!(first.failed.is_empty());

        // the next pass picks up the overdue deadline
        let second = auto_advance(&mut tasks, now);
        assert_eq!(tasks[0].status(), TaskStatus::Failed);
        assert_eq!(second.failed, vec!["late".to_string()]);
    }

    #[test]
    fn clean_pass_reports_empty() {
        let now = Utc::now();
        let mut tasks = vec![
            restored("a", TaskStatus::Pending, now - Duration::days(1), None),
            restored("b", TaskStatus::Completed, now - Duration::days(1), None),
        ];
        let summary = auto_advance(&mut tasks, now);
        assert!(summary.is_empty());
        assert_eq!(summary.changed_count(), 0);
    }

    #[test]
    fn touched_covers_both_transition_kinds() {
        let now = Utc::now();
        let mut tasks = vec![
            restored("act", TaskStatus::Scheduled, now - Duration::minutes(1), None),
            restored(
                "fail",
                TaskStatus::Pending,
                now - Duration::days(1),
                Some(now - Duration::minutes(1)),
            ),
            restored("idle", TaskStatus::Pending, now - Duration::days(1), None),
        ];
        let summary = auto_advance(&mut tasks, now);
        assert!(summary.touched("act"));
        assert!(summary.touched("fail"));
        assert!(!summary.touched("idle"));
    }

    #[test]
    fn unsaved_tasks_transition_without_reporting() {
        let now = Utc::now();
        let mut record = restored("x", TaskStatus::Scheduled, now - Duration::minutes(1), None)
            .to_record();
        record.id = None;
        let mut tasks = vec![Task::restore(record)];

        let summary = auto_advance(&mut tasks, now);
        assert_eq!(tasks[0].status(), TaskStatus::Pending);
        assert!(summary.is_empty());
    }
}
