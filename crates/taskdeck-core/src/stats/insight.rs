//! Prioritized display insights derived from a statistics snapshot.
//!
//! Each rule reads the aggregated counts only; none of them touch tasks or
//! storage. Rules fire independently and the result is sorted by priority,
//! highest first, keeping evaluation order for ties.

use serde::Serialize;

use super::snapshot::StatisticsSnapshot;

/// Severity class of an insight.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum InsightKind {
    Success,
    Warning,
    Danger,
    Info,
}

impl InsightKind {
    /// Default display glyph for the kind.
    pub fn icon(&self) -> &'static str {
        match self {
            InsightKind::Success => "✅",
            InsightKind::Warning => "⚠️",
            InsightKind::Danger => "🚨",
            InsightKind::Info => "ℹ️",
        }
    }
}

/// One human-readable insight line.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Insight {
    pub kind: InsightKind,
    pub message: String,
    /// Display glyph, defaulted from the kind
    pub icon: String,
    /// Higher sorts first
    pub priority: u8,
}

impl Insight {
    fn new(kind: InsightKind, message: impl Into<String>, priority: u8) -> Self {
        Insight {
            kind,
            message: message.into(),
            icon: kind.icon().to_string(),
            priority,
        }
    }

    pub fn success(message: impl Into<String>, priority: u8) -> Self {
        Self::new(InsightKind::Success, message, priority)
    }

    pub fn warning(message: impl Into<String>, priority: u8) -> Self {
        Self::new(InsightKind::Warning, message, priority)
    }

    pub fn danger(message: impl Into<String>, priority: u8) -> Self {
        Self::new(InsightKind::Danger, message, priority)
    }

    pub fn info(message: impl Into<String>, priority: u8) -> Self {
        Self::new(InsightKind::Info, message, priority)
    }
}

/// Derive display insights from a snapshot.
pub fn generate_insights(snapshot: &StatisticsSnapshot) -> Vec<Insight> {
    let mut insights = Vec::new();

    if snapshot.total == 0 {
        insights.push(Insight::info(
            "No tasks yet. Create your first task to get started!",
            0,
        ));
        return insights;
    }

    if snapshot.overdue > 0 {
        let message = if snapshot.overdue == 1 {
            "You have 1 overdue task. Deal with it as soon as you can!".to_string()
        } else {
            format!(
                "You have {} overdue tasks. They need attention now!",
                snapshot.overdue
            )
        };
        insights.push(Insight::danger(message, 10));
    }

    if snapshot.pending > 10 {
        insights.push(Insight::warning(
            format!(
                "You have {} pending tasks piling up. Time to prioritize!",
                snapshot.pending
            ),
            8,
        ));
    } else if snapshot.pending >= 5 {
        insights.push(Insight::info(
            format!("You have {} tasks waiting to be started.", snapshot.pending),
            3,
        ));
    }

    if snapshot.total >= 5 && snapshot.completion_rate >= 80 {
        insights.push(Insight::success(
            format!(
                "Excellent! You have completed {}% of your tasks.",
                snapshot.completion_rate
            ),
            7,
        ));
    } else if snapshot.total >= 5 && snapshot.completion_rate >= 50 {
        insights.push(Insight::success(
            format!(
                "Good progress: {}% of your tasks are completed.",
                snapshot.completion_rate
            ),
            6,
        ));
    }

    if snapshot.total >= 5 && snapshot.completion_rate < 30 {
        insights.push(Insight::warning(
            format!(
                "Completion rate is low ({}%). Try finishing what you started.",
                snapshot.completion_rate
            ),
            5,
        ));
    }

    if snapshot.active() > 5 {
        insights.push(Insight::info(
            format!("You have {} tasks on the go. Stay focused!", snapshot.active()),
            4,
        ));
    }

    if snapshot.completed == snapshot.total {
        insights.push(Insight::success("🎉 Perfect! All of your tasks are completed!", 9));
    }

    if snapshot.overdue == 0 && snapshot.total >= 3 && snapshot.active() + snapshot.completed > 0 {
        insights.push(Insight::success("Everything is on track. Keep it up!", 2));
    }

    insights.sort_by(|a, b| b.priority.cmp(&a.priority));
    insights
}
