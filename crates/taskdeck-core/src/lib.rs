//! # Taskdeck Core Library
//!
//! This library provides the core business logic for Taskdeck, a
//! task-management backend. It implements a CLI-first philosophy where all
//! operations are available via a standalone CLI binary, with any outer
//! service layer being a thin shell over the same core library.
//!
//! ## Architecture
//!
//! - **Task Entity**: Validated construction and a constrained status
//!   machine; every time-derived query takes `now` as a parameter
//! - **Auto-Advance Sweep**: No background scheduler; statistics and
//!   listing reads move scheduled tasks along and fail overdue ones
//! - **Statistics**: Per-status aggregates plus rule-generated insight
//!   messages, computed over swept task lists
//! - **Storage**: JSON-file task store for the CLI and an in-memory store
//!   for tests, behind one persistence trait
//!
//! ## Key Components
//!
//! - [`Task`]: The task entity and its status machine
//! - [`TaskManager`]: Use-case layer tying the entity to a store
//! - [`TaskStore`]: Persistence trait implemented by both stores
//! - [`Config`]: Application configuration management

pub mod error;
pub mod manager;
pub mod stats;
pub mod storage;
pub mod task;

pub use error::{
    ConfigError, CoreError, DomainError, Result, RuleViolation, StoreError, ValidationError,
};
pub use manager::TaskManager;
pub use stats::{
    generate_insights, Insight, InsightKind, StatisticsSnapshot, StatusOverview, TaskStatistics,
};
pub use storage::{data_dir, Config, JsonStore, MemoryStore, TaskStore};
pub use task::sweep::{auto_advance, SweepSummary};
pub use task::{NewTask, Task, TaskChanges, TaskRecord, TaskStatus, TaskView, MAX_TITLE_LEN};
