//! Aggregated task statistics for a single owner.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::insight::Insight;
use crate::task::{Task, TaskStatus};

/// Aggregated counts over one owner's tasks at a point in time.
///
/// Built from the post-sweep task list, so scheduled tasks whose start
/// date arrived are already counted as pending and overdue open tasks as
/// failed.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct StatisticsSnapshot {
    /// Tasks counted; cancelled tasks are excluded
    pub total: usize,
    pub scheduled: usize,
    pub pending: usize,
    /// Raw IN_PROGRESS count; see [`StatisticsSnapshot::active`] for the
    /// combined reporting figure
    pub in_progress: usize,
    pub completed: usize,
    pub failed: usize,
    /// Cancelled tasks, kept outside `total`
    pub cancelled: usize,
    /// Tasks whose deadline passed without completion
    pub overdue: usize,
    /// `round(completed / (total - failed) * 100)`; 0 when nothing counts
    pub completion_rate: u8,
}

impl StatisticsSnapshot {
    /// Aggregate a snapshot from a task list.
    ///
    /// `now` must be the same instant the preceding sweep used, so the
    /// overdue count and the swept statuses agree.
    pub fn from_tasks(tasks: &[Task], now: DateTime<Utc>) -> Self {
        let mut snapshot = StatisticsSnapshot::default();
        for task in tasks {
            match task.status() {
                TaskStatus::Scheduled => snapshot.scheduled += 1,
                TaskStatus::Pending => snapshot.pending += 1,
                TaskStatus::InProgress => snapshot.in_progress += 1,
                TaskStatus::Completed => snapshot.completed += 1,
                TaskStatus::Failed => snapshot.failed += 1,
                TaskStatus::Cancelled => snapshot.cancelled += 1,
            }
            if task.is_overdue(now) {
                snapshot.overdue += 1;
            }
        }
        snapshot.total = tasks.len() - snapshot.cancelled;
        snapshot.completion_rate = completion_rate(snapshot.completed, snapshot.total - snapshot.failed);
        snapshot
    }

    /// Pending and in-progress combined.
    ///
    /// The legacy overview feed reported this combination as its
    /// "in progress" figure; the snapshot keeps the raw per-status fields
    /// and exposes the combination separately so callers can pick either.
    pub fn active(&self) -> usize {
        self.pending + self.in_progress
    }
}

/// Quick per-status counts, served from count queries without a sweep.
///
/// The legacy overview shape: cheaper than [`StatisticsSnapshot`] but may
/// lag it, since no auto-advance pass runs first.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct StatusOverview {
    pub total: usize,
    pub pending: usize,
    pub in_progress: usize,
    pub completed: usize,
    /// `round(completed / total * 100)`; 0 when there are no tasks
    pub completion_rate: u8,
}

impl StatusOverview {
    /// Build the overview from raw per-status counts.
    pub fn from_counts(pending: usize, in_progress: usize, completed: usize) -> Self {
        let total = pending + in_progress + completed;
        StatusOverview {
            total,
            pending,
            in_progress,
            completed,
            completion_rate: completion_rate(completed, total),
        }
    }
}

/// Snapshot plus derived insights, as returned by a statistics read.
#[derive(Debug, Clone, Serialize)]
pub struct TaskStatistics {
    pub snapshot: StatisticsSnapshot,
    pub insights: Vec<Insight>,
}

fn completion_rate(completed: usize, denominator: usize) -> u8 {
    if denominator == 0 {
        return 0;
    }
    (completed as f64 / denominator as f64 * 100.0).round() as u8
}
