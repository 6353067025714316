//! Data models for task instances and recurrence rules.
//!
//! This module contains the core domain models of the Hearth tracker:
//! concrete task instances ([`TodoTask`]), the recurrence rules that
//! produce them ([`PeriodicTask`] with its [`Recurrence`] schedule), and
//! the calendar-month keys ([`MonthKey`]) the store's index buckets by.
//! Display implementations live in [`crate::display::models`] to keep
//! data structures and presentation separate.
//!
//! Serialized field names follow the tracker's document shape: camelCase
//! keys, `"YYYY-MM-DD"` dates, ISO-8601 timestamps, and a `periodicType`
//! tag whose payload field (`weekDays`/`monthDays`) is present only for
//! the matching schedule kind.

pub mod month;
pub mod requests;
pub mod rule;
pub mod status;
pub mod summary;
pub mod task;

#[cfg(test)]
mod tests;

// Re-export all public types at the models level
pub use month::{months_spanned, MonthKey};
pub use requests::{UpdateRuleRequest, UpdateTaskRequest};
pub use rule::{PeriodicTask, Recurrence};
pub use status::TaskStatus;
pub use summary::RuleStats;
pub use task::{ExecutorStatus, TodoTask};
