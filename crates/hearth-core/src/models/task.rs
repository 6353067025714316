//! Task instance model definition and related functionality.

use jiff::civil::Date;
use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use super::{month, MonthKey, TaskStatus};

/// Per-assignee completion record on a task.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ExecutorStatus {
    /// Family member this record tracks
    pub member_id: String,

    /// The member's own status, independent of the overall task status
    pub status: TaskStatus,

    /// When the member finished, set on the transition to completed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<Timestamp>,
}

/// Represents one concrete, schedulable task instance.
///
/// Tasks are created directly by a family member or materialized by a
/// recurrence rule (in which case `periodic_task_id` points back at it).
/// The `[start_date, end_date]` span is inclusive on both ends.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TodoTask {
    /// Unique identifier for the task
    pub id: u64,

    /// Title of the task
    pub title: String,

    /// First day the task is on the calendar
    pub start_date: Date,

    /// Last day the task is on the calendar (inclusive, >= start_date)
    pub end_date: Date,

    /// Assigned family members; empty means the task applies to everyone
    #[serde(default)]
    pub executor_ids: Vec<String>,

    /// One-line summary
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Long-form detail (markdown)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,

    /// Attached image paths, relative to the task's media directory
    #[serde(default)]
    pub images: Vec<String>,

    /// Attached voice memo path, relative to the task's media directory
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio_path: Option<String>,

    /// Overall status of the task
    #[serde(default)]
    pub status: TaskStatus,

    /// Per-assignee completion records
    #[serde(default)]
    pub executor_statuses: Vec<ExecutorStatus>,

    /// Rule that generated this instance; absent for manual tasks
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub periodic_task_id: Option<u64>,

    /// Timestamp when the task was created (UTC)
    pub created_at: Timestamp,

    /// Timestamp when the task was last modified (UTC)
    pub updated_at: Timestamp,
}

impl TodoTask {
    /// Whether the given date falls within the task's inclusive span.
    pub fn contains_date(&self, date: Date) -> bool {
        self.start_date <= date && date <= self.end_date
    }

    /// Every month bucket this task's span overlaps.
    pub fn months(&self) -> Vec<MonthKey> {
        month::months_spanned(self.start_date, self.end_date)
    }

    /// Whether the task shows up in a member-scoped query.
    ///
    /// Unassigned tasks (empty executor list) are visible to everyone.
    pub fn visible_to(&self, member_id: &str) -> bool {
        self.executor_ids.is_empty() || self.executor_ids.iter().any(|id| id == member_id)
    }

    /// Whether every listed assignee has a completed record.
    ///
    /// False when there are no assignees; the aggregate status of an
    /// unassigned task is only ever set directly.
    pub fn all_executors_completed(&self) -> bool {
        !self.executor_ids.is_empty()
            && self.executor_ids.iter().all(|member| {
                self.executor_statuses
                    .iter()
                    .any(|es| es.member_id == *member && es.status == TaskStatus::Completed)
            })
    }
}
