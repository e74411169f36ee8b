//! Core error types for taskdeck-core.
//!
//! Client-input problems (`ValidationError`) and state-dependent refusals
//! (`RuleViolation`) are kept distinct so callers can map them to different
//! failure classes. Persistence failures carry their own type and are
//! propagated, never swallowed.

use std::path::PathBuf;
use thiserror::Error;

/// Top-level error type for taskdeck-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Malformed client input
    #[error("Invalid input: {0}")]
    Validation(#[from] ValidationError),

    /// A state-dependent rule refused the operation
    #[error("Business rule violation: {0}")]
    Rule(#[from] RuleViolation),

    /// The requested task does not exist
    #[error("Task with ID {id} not found")]
    NotFound { id: String },

    /// The task exists but belongs to someone else
    #[error("Task {id} belongs to a different owner")]
    Forbidden { id: String },

    /// Persistence failure
    #[error("Storage error: {0}")]
    Store(#[from] StoreError),

    /// Configuration failure
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Validation errors raised for malformed input.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Title absent or blank after trimming
    #[error("Task title is required")]
    EmptyTitle,

    /// Title longer than the allowed maximum
    #[error("Task title must not exceed 200 characters (got {len})")]
    TitleTooLong { len: usize },

    /// Owner identifier absent or blank
    #[error("Owner ID is required")]
    MissingOwner,

    /// Deadline set before the task starts
    #[error("Deadline ({deadline}) must not be earlier than the start date ({start})")]
    DeadlineBeforeStart {
        start: chrono::DateTime<chrono::Utc>,
        deadline: chrono::DateTime<chrono::Utc>,
    },

    /// Start date moved past the existing deadline
    #[error("Start date ({start}) must not be later than the deadline ({deadline})")]
    StartAfterDeadline {
        start: chrono::DateTime<chrono::Utc>,
        deadline: chrono::DateTime<chrono::Utc>,
    },

    /// Status string not in the recognized set
    #[error("Unknown task status '{0}' (expected SCHEDULED, PENDING, IN_PROGRESS, COMPLETED, FAILED or CANCELLED)")]
    UnknownStatus(String),
}

/// Rule violations raised when the current state forbids an operation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RuleViolation {
    /// Completed tasks must pass through IN_PROGRESS before pending again
    #[error("Cannot change a completed task back to pending; set it to in progress first")]
    CompletedToPending,

    /// FAILED is applied by the deadline sweep, never by callers
    #[error("Tasks cannot be marked as failed manually; failure is applied automatically once the deadline has passed")]
    ManualFail,

    /// CANCELLED is only reachable through cancellation
    #[error("Tasks cannot be cancelled through a status change; use cancel instead")]
    ManualCancel,

    /// Failure is terminal
    #[error("A failed task cannot be reopened; create a new task instead")]
    ReopenFailed,
}

/// Union of the two entity-level error kinds.
///
/// Returned by task operations that can fail either way, such as a partial
/// update carrying both new field values and a status change.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Rule(#[from] RuleViolation),
}

/// Storage-adapter errors.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Failed to read the backing file
    #[error("Failed to read task store at {path}: {source}")]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to write the backing file
    #[error("Failed to write task store at {path}: {source}")]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Backing file exists but does not parse
    #[error("Task store at {path} is corrupt: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Update or delete aimed at a task the store no longer holds
    #[error("Task {0} does not exist in the store")]
    TaskMissing(String),

    /// Task handed to an update without an assigned identity
    #[error("Task has no assigned ID; save it first")]
    UnsavedTask,

    /// A panic in another thread left the store lock unusable
    #[error("Task store lock poisoned")]
    Poisoned,
}

/// Configuration errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// `set` aimed at a key the configuration does not have
    #[error("Unknown configuration key '{0}'")]
    UnknownKey(String),
}

// Helper implementations for converting from other error types

impl From<DomainError> for CoreError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::Validation(e) => CoreError::Validation(e),
            DomainError::Rule(e) => CoreError::Rule(e),
        }
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
