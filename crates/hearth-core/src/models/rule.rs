//! Recurrence rule model and the firing predicate.

use jiff::civil::Date;
use jiff::Timestamp;
use serde::{Deserialize, Serialize};

/// The schedule shape of a recurrence rule.
///
/// Modeled as a sum type so a daily rule cannot carry weekday or
/// day-of-month payloads; the serialized form keeps the original wire
/// shape (`periodicType` tag, payload field only for the matching kind).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "periodicType", rename_all = "lowercase")]
pub enum Recurrence {
    /// Fires every eligible day
    Daily,

    /// Fires on the listed weekdays (0 = Monday … 6 = Sunday)
    Weekly {
        #[serde(rename = "weekDays")]
        week_days: Vec<i8>,
    },

    /// Fires on the listed days of the month (1–31)
    Monthly {
        #[serde(rename = "monthDays")]
        month_days: Vec<i8>,
    },
}

impl Recurrence {
    /// Storage/display tag for the schedule kind.
    pub fn kind(&self) -> &'static str {
        match self {
            Recurrence::Daily => "daily",
            Recurrence::Weekly { .. } => "weekly",
            Recurrence::Monthly { .. } => "monthly",
        }
    }

    /// Whether the schedule shape matches the given date, ignoring the
    /// rule's window, budget, and generation state.
    pub fn matches(&self, date: Date) -> bool {
        match self {
            Recurrence::Daily => true,
            Recurrence::Weekly { week_days } => {
                let weekday = date.weekday().to_monday_zero_offset();
                week_days.contains(&weekday)
            }
            Recurrence::Monthly { month_days } => month_days.contains(&date.day()),
        }
    }

    /// Validate the schedule payload, returning a field/reason pair on
    /// failure (mapped to `TrackerError::InvalidInput` by callers).
    pub fn validate(&self) -> Result<(), (&'static str, String)> {
        match self {
            Recurrence::Daily => Ok(()),
            Recurrence::Weekly { week_days } => {
                if week_days.is_empty() {
                    return Err(("weekDays", "weekly rules need at least one weekday".into()));
                }
                if let Some(day) = week_days.iter().find(|d| !(0..=6).contains(*d)) {
                    return Err(("weekDays", format!("weekday {day} is out of range 0-6")));
                }
                Ok(())
            }
            Recurrence::Monthly { month_days } => {
                if month_days.is_empty() {
                    return Err((
                        "monthDays",
                        "monthly rules need at least one day of the month".into(),
                    ));
                }
                if let Some(day) = month_days.iter().find(|d| !(1..=31).contains(*d)) {
                    return Err(("monthDays", format!("day of month {day} is out of range 1-31")));
                }
                Ok(())
            }
        }
    }
}

/// A recurrence rule that materializes [`TodoTask`] instances.
///
/// `current_repeat_count` and `last_generated_date` are engine-owned
/// generation state: they only advance as a side effect of a successful
/// generation, never through the user-facing update path.
///
/// [`TodoTask`]: super::TodoTask
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PeriodicTask {
    /// Unique identifier for the rule
    pub id: u64,

    /// Title copied into each generated task
    pub title: String,

    /// The schedule shape (daily / weekly / monthly)
    #[serde(flatten)]
    pub recurrence: Recurrence,

    /// Days each generated instance spans, starting at the fire date
    pub task_duration: i64,

    /// Assignees copied into each generated task
    #[serde(default)]
    pub executor_ids: Vec<String>,

    /// Summary copied into each generated task
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Detail copied into each generated task
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,

    /// Cap on generated instances; None or 0 means unbounded
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_repeat_count: Option<u32>,

    /// Instances generated so far (monotonic)
    pub current_repeat_count: u32,

    /// First date the rule is eligible to fire
    pub start_date: Date,

    /// Last eligible date, when bounded
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<Date>,

    /// Inactive rules never fire
    pub is_active: bool,

    /// Most recent date a generation succeeded; forecloses re-firing for
    /// that date and any earlier one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_generated_date: Option<Date>,

    /// Timestamp when the rule was created (UTC)
    pub created_at: Timestamp,

    /// Timestamp when the rule was last modified (UTC)
    pub updated_at: Timestamp,
}

impl PeriodicTask {
    /// The firing predicate: should this rule produce an instance for
    /// `date`?
    ///
    /// Pure: evaluating eligibility never advances generation state.
    /// Callers walk dates in non-decreasing order, which is what makes
    /// the single `last_generated_date` guard sufficient to give
    /// at-most-once generation per calendar date.
    pub fn is_due(&self, date: Date) -> bool {
        if !self.is_active {
            return false;
        }
        if date < self.start_date {
            return false;
        }
        if let Some(end) = self.end_date {
            if date > end {
                return false;
            }
        }
        if let Some(max) = self.max_repeat_count {
            if max > 0 && self.current_repeat_count >= max {
                return false;
            }
        }
        if let Some(last) = self.last_generated_date {
            if date <= last {
                return false;
            }
        }
        self.recurrence.matches(date)
    }

    /// Whether a bounded rule has used up its repeat budget.
    pub fn is_exhausted(&self) -> bool {
        self.max_repeat_count
            .is_some_and(|max| max > 0 && self.current_repeat_count >= max)
    }
}
