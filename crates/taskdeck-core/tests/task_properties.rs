//! Property tests for task entity invariants.

use chrono::{DateTime, Duration, TimeZone, Utc};
use proptest::prelude::*;
use taskdeck_core::{NewTask, Task, TaskChanges, TaskStatus, MAX_TITLE_LEN};

/// Fixed anchor so generated datetimes stay reproducible.
fn anchor() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 6, 1, 12, 0, 0).unwrap()
}

/// Offsets of up to about a year either side of the anchor, in minutes.
fn minute_offsets() -> impl Strategy<Value = i64> {
    -525_600i64..525_600i64
}

fn statuses() -> impl Strategy<Value = TaskStatus> {
    prop_oneof![
        Just(TaskStatus::Scheduled),
        Just(TaskStatus::Pending),
        Just(TaskStatus::InProgress),
        Just(TaskStatus::Completed),
        Just(TaskStatus::Failed),
        Just(TaskStatus::Cancelled),
    ]
}

fn valid_task() -> impl Strategy<Value = Task> {
    (minute_offsets(), 0i64..525_600i64, "[a-zA-Z0-9][a-zA-Z0-9 ]{0,39}").prop_map(
        |(start_off, span, title)| {
            let start = anchor() + Duration::minutes(start_off);
            Task::create(NewTask {
                title,
                owner_id: "owner-1".to_string(),
                start_date: Some(start),
                deadline: Some(start + Duration::minutes(span)),
                ..NewTask::default()
            })
            .unwrap()
        },
    )
}

proptest! {
    /// Property: whenever construction succeeds, the dates are ordered and
    /// the title fits the documented bounds.
    #[test]
    fn successful_creation_upholds_field_invariants(
        title in "[a-zA-Z0-9 ]{0,220}",
        start_off in minute_offsets(),
        deadline_off in minute_offsets(),
    ) {
        let input = NewTask {
            title: title.clone(),
            owner_id: "owner-1".to_string(),
            start_date: Some(anchor() + Duration::minutes(start_off)),
            deadline: Some(anchor() + Duration::minutes(deadline_off)),
            ..NewTask::default()
        };
        if let Ok(task) = Task::create(input) {
            prop_assert!(!task.title().is_empty());
            prop_assert!(task.title().chars().count() <= MAX_TITLE_LEN);
            prop_assert!(task.deadline().unwrap() >= task.start_date());
            prop_assert_eq!(task.created_at(), task.updated_at());
        }
    }

    /// Property: progress is always a whole percentage in 0..=100.
    #[test]
    fn progress_stays_within_percent_bounds(
        task in valid_task(),
        now_off in minute_offsets(),
    ) {
        let now = anchor() + Duration::minutes(now_off);
        if let Some(progress) = task.progress_percentage(now) {
            prop_assert!(progress <= 100);
        }
    }

    /// Property: no sequence of requested status changes ever lands on
    /// FAILED or CANCELLED; those stay reserved for the sweep and cancel.
    #[test]
    fn requested_changes_never_reach_reserved_statuses(
        task in valid_task(),
        requests in prop::collection::vec(statuses(), 1..12),
    ) {
        let mut task = task;
        for request in requests {
            let _ = task.change_status(request);
            prop_assert_ne!(task.status(), TaskStatus::Failed);
            prop_assert_ne!(task.status(), TaskStatus::Cancelled);
        }
    }

    /// Property: updates only ever move `updated_at` forward.
    #[test]
    fn updated_at_is_monotone_across_mutations(
        task in valid_task(),
        new_title in "[a-zA-Z0-9 ]{1,40}",
        deadline_bump in 0i64..10_000i64,
    ) {
        let mut task = task;
        let mut last = task.updated_at();

        if task.apply(TaskChanges {
            title: Some(new_title),
            ..TaskChanges::default()
        }).is_ok() {
            prop_assert!(task.updated_at() >= last);
            last = task.updated_at();
        }

        let new_deadline = task.start_date() + Duration::minutes(deadline_bump);
        if task.update_deadline(Some(new_deadline)).is_ok() {
            prop_assert!(task.updated_at() >= last);
            last = task.updated_at();
        }

        task.cancel();
        prop_assert!(task.updated_at() >= last);
    }

    /// Property: repeated cancellation is indistinguishable from one.
    #[test]
    fn cancel_is_idempotent(task in valid_task(), repeats in 1usize..6) {
        let mut task = task;
        task.cancel();
        let after_first = task.updated_at();
        for _ in 1..repeats {
            task.cancel();
        }
        prop_assert_eq!(task.status(), TaskStatus::Cancelled);
        prop_assert_eq!(task.updated_at(), after_first);
    }
}
