//! Display implementations for domain models.
//!
//! Markdown-formatted output with status icons and structured sections,
//! kept out of the model definitions to separate data from presentation.

use std::fmt;

use super::datetime::{DateSpan, LocalDateTime};
use crate::models::{PeriodicTask, Recurrence, RuleStats, TaskStatus, TodoTask};

const WEEKDAY_NAMES: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl fmt::Display for TodoTask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "# {}. {} ({})", self.id, self.title, self.status.with_icon())?;
        writeln!(f)?;

        // Metadata section
        writeln!(f, "- When: {}", DateSpan(&self.start_date, &self.end_date))?;
        if self.executor_ids.is_empty() {
            writeln!(f, "- Assigned: everyone")?;
        } else {
            writeln!(f, "- Assigned: {}", self.executor_ids.join(", "))?;
        }
        if let Some(rule_id) = self.periodic_task_id {
            writeln!(f, "- Generated by rule {rule_id}")?;
        }
        writeln!(f, "- Created: {}", LocalDateTime(&self.created_at))?;
        writeln!(f, "- Updated: {}", LocalDateTime(&self.updated_at))?;

        if let Some(desc) = &self.description {
            writeln!(f)?;
            writeln!(f, "{desc}")?;
        }
        if let Some(detail) = &self.detail {
            writeln!(f)?;
            writeln!(f, "{detail}")?;
        }

        if !self.executor_statuses.is_empty() {
            writeln!(f, "\n## Assignees")?;
            writeln!(f)?;
            for record in &self.executor_statuses {
                match &record.completed_at {
                    Some(at) => writeln!(
                        f,
                        "- {}: {} ({})",
                        record.member_id,
                        record.status.with_icon(),
                        LocalDateTime(at)
                    )?,
                    None => writeln!(
                        f,
                        "- {}: {}",
                        record.member_id,
                        record.status.with_icon()
                    )?,
                }
            }
        }

        if !self.images.is_empty() || self.audio_path.is_some() {
            writeln!(f, "\n## Attachments")?;
            writeln!(f)?;
            for image in &self.images {
                writeln!(f, "- image: {image}")?;
            }
            if let Some(audio) = &self.audio_path {
                writeln!(f, "- voice memo: {audio}")?;
            }
        }

        Ok(())
    }
}

/// Human-readable schedule line for a rule.
fn schedule_summary(recurrence: &Recurrence) -> String {
    match recurrence {
        Recurrence::Daily => "every day".to_string(),
        Recurrence::Weekly { week_days } => {
            let names: Vec<&str> = week_days
                .iter()
                .filter_map(|d| WEEKDAY_NAMES.get(*d as usize).copied())
                .collect();
            format!("weekly on {}", names.join(", "))
        }
        Recurrence::Monthly { month_days } => {
            let days: Vec<String> = month_days.iter().map(|d| d.to_string()).collect();
            format!("monthly on day {}", days.join(", "))
        }
    }
}

impl fmt::Display for PeriodicTask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = if !self.is_active {
            "inactive"
        } else if self.is_exhausted() {
            "exhausted"
        } else {
            "active"
        };
        writeln!(f, "# {}. {} ({state})", self.id, self.title)?;
        writeln!(f)?;

        writeln!(f, "- Schedule: {}", schedule_summary(&self.recurrence))?;
        writeln!(f, "- Duration: {} day(s) per instance", self.task_duration)?;
        match self.end_date {
            Some(end) => writeln!(f, "- Window: {}", DateSpan(&self.start_date, &end))?,
            None => writeln!(f, "- Window: from {}", self.start_date)?,
        }
        match self.max_repeat_count {
            Some(max) => writeln!(f, "- Fired: {} of {max}", self.current_repeat_count)?,
            None => writeln!(f, "- Fired: {} (unbounded)", self.current_repeat_count)?,
        }
        if let Some(last) = self.last_generated_date {
            writeln!(f, "- Last fired: {last}")?;
        }
        if self.executor_ids.is_empty() {
            writeln!(f, "- Assigned: everyone")?;
        } else {
            writeln!(f, "- Assigned: {}", self.executor_ids.join(", "))?;
        }
        writeln!(f, "- Created: {}", LocalDateTime(&self.created_at))?;
        writeln!(f, "- Updated: {}", LocalDateTime(&self.updated_at))?;

        if let Some(desc) = &self.description {
            writeln!(f)?;
            writeln!(f, "{desc}")?;
        }

        Ok(())
    }
}

impl fmt::Display for RuleStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "- Generated: {}", self.total_generated)?;
        writeln!(f, "- Completed: {}", self.completed)?;
        writeln!(f, "- Pending: {}", self.pending)
    }
}
