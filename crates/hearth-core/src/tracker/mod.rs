//! High-level tracker API for tasks and recurrence rules.
//!
//! This module provides the main [`Tracker`] interface for interacting
//! with the Hearth core. The tracker is the boundary outer layers (CLI,
//! a future HTTP layer) call into; it owns no state beyond the database
//! path and delegates each operation to a short-lived [`Database`]
//! handle on a blocking thread.
//!
//! ```text
//! ┌─────────────────┐    ┌──────────────────┐    ┌─────────────────┐
//! │    Tracker      │    │     Database     │    │  SQLite file    │
//! │ (task_ops,      │───▶│ (task_queries,   │───▶│ tasks, rules,   │
//! │  rule_ops,      │    │  rule_queries,   │    │ month buckets   │
//! │  engine_ops)    │    │  month_index)    │    │                 │
//! └─────────────────┘    └──────────────────┘    └─────────────────┘
//!    Async facade          Sync storage ops        Data persistence
//! ```
//!
//! ## Submodules
//!
//! - [`builder`]: Factory for creating [`Tracker`] instances
//! - [`task_ops`]: Task instance operations (create, query, status, media)
//! - [`rule_ops`]: Recurrence rule operations (CRUD, stats)
//! - [`engine_ops`]: Generation triggers (single date, catch-up, backfill)
//!
//! Every operation opens its own connection and runs its read-modify-write
//! sequence inside one SQLite transaction, so concurrent callers racing
//! the same task or rule serialize at the storage layer rather than
//! relying on caller discipline.
//!
//! [`Database`]: crate::db::Database

use std::path::PathBuf;

// Module declarations
pub mod builder;
pub mod engine_ops;
pub mod rule_ops;
pub mod task_ops;

#[cfg(test)]
mod tests;

// Re-export the main types
pub use builder::TrackerBuilder;

/// Main tracker interface for managing tasks and recurrence rules.
pub struct Tracker {
    pub(crate) db_path: PathBuf,
}

impl Tracker {
    /// Creates a new tracker with the specified database path.
    pub(crate) fn new(db_path: PathBuf) -> Self {
        Self { db_path }
    }
}
