//! Statistics and insight engine.
//!
//! Aggregates per-owner snapshots from post-sweep task lists and derives
//! prioritized, human-readable insights from the aggregates.

mod insight;
mod snapshot;

pub use insight::{generate_insights, Insight, InsightKind};
pub use snapshot::{StatisticsSnapshot, StatusOverview, TaskStatistics};
