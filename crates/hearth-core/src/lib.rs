//! Core library for the Hearth family task tracker.
//!
//! This crate provides the two cooperating pieces at the heart of Hearth:
//! a date-indexed **task store** (concrete, assignable, completable task
//! instances, queryable by day, month, and family member without full
//! scans) and a **recurrence engine** (rules that materialize task
//! instances on their scheduled dates, exactly once per date).
//!
//! # Quick Start
//!
//! ```rust
//! use hearth_core::{TrackerBuilder, params::CreateTask};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let tracker = TrackerBuilder::new()
//!     .with_database_path(Some("hearth.db"))
//!     .build()
//!     .await?;
//!
//! let params = CreateTask {
//!     title: "Water the plants".to_string(),
//!     start_date: "2024-05-01".parse()?,
//!     end_date: "2024-05-01".parse()?,
//!     executor_ids: vec!["alice".to_string()],
//!     description: None,
//!     detail: None,
//! };
//! let task = tracker.create_task(&params).await?;
//! println!("Created: {}", task.title);
//!
//! // Everything on today's plate
//! let today = tracker.tasks_by_date("2024-05-01".parse()?).await?;
//! for task in &today {
//!     println!("- {}", task.title);
//! }
//! # Ok(())
//! # }
//! ```

pub mod db;
pub mod display;
pub mod error;
pub mod models;
pub mod params;
pub mod tracker;

// Re-export commonly used types
pub use db::Database;
pub use display::{CreateResult, DeleteResult, GenerateResult, OperationStatus, Rules, Tasks, UpdateResult};
pub use error::{Result, TrackerError};
pub use models::{
    ExecutorStatus, MonthKey, PeriodicTask, Recurrence, RuleStats, TaskStatus, TodoTask,
    UpdateRuleRequest, UpdateTaskRequest,
};
pub use tracker::{Tracker, TrackerBuilder};
