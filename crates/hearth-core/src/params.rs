//! Parameter structures for tracker operations.
//!
//! Shared parameter structures usable across interfaces (CLI, future HTTP
//! layer) without framework-specific derives. Interface layers wrap these
//! with their own derives (clap, etc.) and convert via `From`/`TryFrom`,
//! keeping framework concerns out of the core.
//!
//! Loose, stringly-typed fields (a status name, a schedule kind plus
//! optional payload lists) are validated here at the boundary and turned
//! into the typed shapes the models use, so illegal combinations are
//! rejected before any mutation.

use jiff::civil::Date;
use serde::{Deserialize, Serialize};

use crate::error::{Result, TrackerError};
use crate::models::{Recurrence, TaskStatus};

/// Generic parameters for operations requiring just an ID.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Id {
    /// The ID of the resource to operate on
    pub id: u64,
}

/// Parameters for creating a new task instance.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTask {
    /// Title of the task (required, non-empty)
    pub title: String,
    /// First day of the task's span
    pub start_date: Date,
    /// Last day of the task's span (inclusive)
    pub end_date: Date,
    /// Assigned family members; empty means everyone
    #[serde(default)]
    pub executor_ids: Vec<String>,
    /// Optional one-line summary
    pub description: Option<String>,
    /// Optional long-form detail
    pub detail: Option<String>,
}

/// Parameters for updating a task. `None` fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTask {
    /// The ID of the task to update
    pub id: u64,
    pub title: Option<String>,
    pub start_date: Option<Date>,
    pub end_date: Option<Date>,
    pub executor_ids: Option<Vec<String>>,
    pub description: Option<String>,
    pub detail: Option<String>,
    /// New overall status as a string ("pending" / "completed")
    pub status: Option<String>,
}

impl UpdateTask {
    /// Parse the optional status string into a typed status.
    pub fn validate_status(&self) -> Result<Option<TaskStatus>> {
        match self.status.as_deref() {
            None => Ok(None),
            Some(s) => s
                .parse::<TaskStatus>()
                .map(Some)
                .map_err(|reason| TrackerError::invalid_input("status", reason)),
        }
    }
}

/// Parameters for setting a single assignee's status on a task.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetExecutorStatus {
    /// The ID of the task
    pub id: u64,
    /// The family member whose record to upsert
    pub member_id: String,
    /// New status for that member
    pub status: TaskStatus,
}

/// Parameters for the month-scoped task query.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TasksByMonth {
    pub year: i16,
    /// Month number 1–12
    pub month: i8,
}

/// Parameters for the member-scoped task query.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TasksByExecutor {
    /// The family member the query is scoped to
    pub member_id: String,
    /// Restrict to tasks spanning this date; None means all tasks
    pub date: Option<Date>,
}

/// Parameters for creating a recurrence rule.
///
/// The schedule arrives in its loose interface shape (a kind string plus
/// optional payload lists) and [`CreateRule::validate_recurrence`] turns
/// it into the typed [`Recurrence`] sum, rejecting mismatched payloads.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRule {
    /// Title copied into each generated task (required, non-empty)
    pub title: String,
    /// Schedule kind: "daily", "weekly", or "monthly"
    pub periodic_type: String,
    /// Weekdays for weekly rules (0 = Monday … 6 = Sunday)
    #[serde(default)]
    pub week_days: Vec<i8>,
    /// Days of the month for monthly rules (1–31)
    #[serde(default)]
    pub month_days: Vec<i8>,
    /// Days each generated instance spans
    pub task_duration: i64,
    /// Assignees copied into each generated task
    #[serde(default)]
    pub executor_ids: Vec<String>,
    pub description: Option<String>,
    pub detail: Option<String>,
    /// Cap on generated instances; None or 0 means unbounded
    pub max_repeat_count: Option<u32>,
    /// First date the rule is eligible to fire
    pub start_date: Date,
    /// Last eligible date, when bounded
    pub end_date: Option<Date>,
}

impl CreateRule {
    /// Build the typed schedule from the loose kind/payload fields.
    pub fn validate_recurrence(&self) -> Result<Recurrence> {
        let recurrence = build_recurrence(&self.periodic_type, &self.week_days, &self.month_days)?;
        recurrence
            .validate()
            .map_err(|(field, reason)| TrackerError::invalid_input(field, reason))?;
        Ok(recurrence)
    }
}

/// Parameters for updating a recurrence rule. `None` fields are left
/// unchanged; a new schedule requires `periodic_type` plus its payload.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRule {
    /// The ID of the rule to update
    pub id: u64,
    pub title: Option<String>,
    /// New schedule kind; when set, the schedule is rebuilt from
    /// `week_days`/`month_days`
    pub periodic_type: Option<String>,
    #[serde(default)]
    pub week_days: Vec<i8>,
    #[serde(default)]
    pub month_days: Vec<i8>,
    pub task_duration: Option<i64>,
    pub executor_ids: Option<Vec<String>>,
    pub description: Option<String>,
    pub detail: Option<String>,
    /// New repeat cap; 0 removes the bound
    pub max_repeat_count: Option<u32>,
    pub start_date: Option<Date>,
    pub end_date: Option<Date>,
    pub is_active: Option<bool>,
}

impl UpdateRule {
    /// Build the replacement schedule, if one was requested.
    pub fn validate_recurrence(&self) -> Result<Option<Recurrence>> {
        let Some(kind) = self.periodic_type.as_deref() else {
            return Ok(None);
        };
        let recurrence = build_recurrence(kind, &self.week_days, &self.month_days)?;
        recurrence
            .validate()
            .map_err(|(field, reason)| TrackerError::invalid_input(field, reason))?;
        Ok(Some(recurrence))
    }
}

/// Parameters for generating instances from one rule on one date.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateForDate {
    /// The ID of the rule to evaluate
    pub id: u64,
    /// The target calendar date
    pub date: Date,
}

/// Parameters for backfilling a span of dates, walked in ascending order.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRange {
    pub start_date: Date,
    pub end_date: Date,
}

fn build_recurrence(kind: &str, week_days: &[i8], month_days: &[i8]) -> Result<Recurrence> {
    match kind {
        "daily" => Ok(Recurrence::Daily),
        "weekly" => Ok(Recurrence::Weekly {
            week_days: week_days.to_vec(),
        }),
        "monthly" => Ok(Recurrence::Monthly {
            month_days: month_days.to_vec(),
        }),
        other => Err(TrackerError::invalid_input(
            "periodicType",
            format!("unknown schedule kind: {other}"),
        )),
    }
}
