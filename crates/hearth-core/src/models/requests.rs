//! Request types for updating models.

use jiff::civil::Date;

use super::{Recurrence, TaskStatus};
use crate::error::TrackerError;

/// Parameters for updating a task to reduce function argument count.
///
/// `None` fields are left unchanged.
#[derive(Debug, Default)]
pub struct UpdateTaskRequest {
    pub title: Option<String>,
    pub start_date: Option<Date>,
    pub end_date: Option<Date>,
    pub executor_ids: Option<Vec<String>>,
    pub description: Option<String>,
    pub detail: Option<String>,
    pub status: Option<TaskStatus>,
}

impl TryFrom<crate::params::UpdateTask> for UpdateTaskRequest {
    type Error = TrackerError;

    /// Convert loose update parameters into a validated request.
    ///
    /// The status arrives as a string at the interface boundary and is
    /// parsed here; span ordering is validated later against the merged
    /// task, since either end may be absent from the request.
    fn try_from(params: crate::params::UpdateTask) -> Result<Self, Self::Error> {
        let status = params.validate_status()?;

        Ok(Self {
            title: params.title,
            start_date: params.start_date,
            end_date: params.end_date,
            executor_ids: params.executor_ids,
            description: params.description,
            detail: params.detail,
            status,
        })
    }
}

/// Parameters for updating a recurrence rule.
///
/// `None` fields are left unchanged. Generation state
/// (`current_repeat_count`, `last_generated_date`) is deliberately not
/// representable here; only the engine advances it.
#[derive(Debug, Default)]
pub struct UpdateRuleRequest {
    pub title: Option<String>,
    pub recurrence: Option<Recurrence>,
    pub task_duration: Option<i64>,
    pub executor_ids: Option<Vec<String>>,
    pub description: Option<String>,
    pub detail: Option<String>,
    pub max_repeat_count: Option<u32>,
    pub start_date: Option<Date>,
    pub end_date: Option<Date>,
    pub is_active: Option<bool>,
}

impl TryFrom<crate::params::UpdateRule> for UpdateRuleRequest {
    type Error = TrackerError;

    fn try_from(params: crate::params::UpdateRule) -> Result<Self, Self::Error> {
        let recurrence = params.validate_recurrence()?;

        if let Some(duration) = params.task_duration {
            if !(1..=3653).contains(&duration) {
                return Err(TrackerError::invalid_input(
                    "taskDuration",
                    "duration must be between 1 and 3653 days",
                ));
            }
        }

        Ok(Self {
            title: params.title,
            recurrence,
            task_duration: params.task_duration,
            executor_ids: params.executor_ids,
            description: params.description,
            detail: params.detail,
            max_repeat_count: params.max_repeat_count,
            start_date: params.start_date,
            end_date: params.end_date,
            is_active: params.is_active,
        })
    }
}
