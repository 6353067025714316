//! Reporting summaries derived from stored data.

use serde::{Deserialize, Serialize};

/// Counts of the task instances a recurrence rule has produced.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct RuleStats {
    /// All instances generated by the rule, regardless of status
    pub total_generated: i64,

    /// Generated instances now completed
    pub completed: i64,

    /// Generated instances still pending
    pub pending: i64,
}
