//! Recurrence rule CRUD and the generation path.
//!
//! `generate_for_date` is the heart of the engine: one transaction wraps
//! the eligibility check, the instance insert (with its index entries),
//! and the rule-state advance, so two callers racing the same rule and
//! date cannot both fire it.

use jiff::civil::Date;
use jiff::{Span, Timestamp};
use rusqlite::{params, types::Type, Connection, OptionalExtension};

use crate::{
    error::{DatabaseResultExt, Result, TrackerError},
    models::{PeriodicTask, Recurrence, RuleStats, TodoTask, UpdateRuleRequest},
    params::{CreateRule, CreateTask},
};

// Optimized SQL queries as const strings for compile-time optimization
const INSERT_RULE_SQL: &str = "INSERT INTO periodic_tasks (title, periodic_type, week_days, month_days, task_duration, executor_ids, description, detail, max_repeat_count, current_repeat_count, start_date, end_date, is_active, last_generated_date, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16)";
const SELECT_RULE_SQL: &str = "SELECT id, title, periodic_type, week_days, month_days, task_duration, executor_ids, description, detail, max_repeat_count, current_repeat_count, start_date, end_date, is_active, last_generated_date, created_at, updated_at FROM periodic_tasks WHERE id = ?1";
const SELECT_ALL_RULES_SQL: &str = "SELECT id, title, periodic_type, week_days, month_days, task_duration, executor_ids, description, detail, max_repeat_count, current_repeat_count, start_date, end_date, is_active, last_generated_date, created_at, updated_at FROM periodic_tasks ORDER BY created_at DESC, id DESC";
const SELECT_ACTIVE_RULE_IDS_SQL: &str =
    "SELECT id FROM periodic_tasks WHERE is_active = 1 ORDER BY id";
const UPDATE_RULE_SQL: &str = "UPDATE periodic_tasks SET title = ?1, periodic_type = ?2, week_days = ?3, month_days = ?4, task_duration = ?5, executor_ids = ?6, description = ?7, detail = ?8, max_repeat_count = ?9, start_date = ?10, end_date = ?11, is_active = ?12, updated_at = ?13 WHERE id = ?14";
const ADVANCE_RULE_SQL: &str = "UPDATE periodic_tasks SET current_repeat_count = ?1, last_generated_date = ?2, updated_at = ?3 WHERE id = ?4";
const DELETE_RULE_SQL: &str = "DELETE FROM periodic_tasks WHERE id = ?1";
const RULE_STATS_SQL: &str = "SELECT COUNT(*), COALESCE(SUM(CASE WHEN status = 'completed' THEN 1 ELSE 0 END), 0) FROM tasks WHERE periodic_task_id = ?1";

impl super::Database {
    /// Helper function to construct a PeriodicTask from a database row.
    fn build_rule_from_row(row: &rusqlite::Row) -> rusqlite::Result<PeriodicTask> {
        let kind: String = row.get(2)?;
        let week_days: Option<String> = row.get(3)?;
        let month_days: Option<String> = row.get(4)?;

        let recurrence = match kind.as_str() {
            "daily" => Recurrence::Daily,
            "weekly" => Recurrence::Weekly {
                week_days: parse_day_list(3, week_days)?,
            },
            "monthly" => Recurrence::Monthly {
                month_days: parse_day_list(4, month_days)?,
            },
            other => {
                return Err(rusqlite::Error::FromSqlConversionFailure(
                    2,
                    Type::Text,
                    format!("Invalid schedule kind: {other}").into(),
                ))
            }
        };

        let executor_ids: String = row.get(6)?;
        let executor_ids: Vec<String> = serde_json::from_str(&executor_ids)
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(6, Type::Text, Box::new(e)))?;

        Ok(PeriodicTask {
            id: row.get::<_, i64>(0)? as u64,
            title: row.get(1)?,
            recurrence,
            task_duration: row.get(5)?,
            executor_ids,
            description: row.get(7)?,
            detail: row.get(8)?,
            max_repeat_count: row.get::<_, Option<i64>>(9)?.map(|n| n as u32),
            current_repeat_count: row.get::<_, i64>(10)? as u32,
            start_date: row.get::<_, String>(11)?.parse::<Date>().map_err(|e| {
                rusqlite::Error::FromSqlConversionFailure(11, Type::Text, Box::new(e))
            })?,
            end_date: parse_optional_date(12, row.get(12)?)?,
            is_active: row.get(13)?,
            last_generated_date: parse_optional_date(14, row.get(14)?)?,
            created_at: row.get::<_, String>(15)?.parse::<Timestamp>().map_err(|e| {
                rusqlite::Error::FromSqlConversionFailure(15, Type::Text, Box::new(e))
            })?,
            updated_at: row.get::<_, String>(16)?.parse::<Timestamp>().map_err(|e| {
                rusqlite::Error::FromSqlConversionFailure(16, Type::Text, Box::new(e))
            })?,
        })
    }

    /// Loads a single rule by id on a borrowed connection.
    pub(super) fn query_rule(conn: &Connection, id: u64) -> Result<Option<PeriodicTask>> {
        let mut stmt = conn
            .prepare(SELECT_RULE_SQL)
            .map_err(|e| TrackerError::database_error("Failed to prepare rule query", e))?;

        stmt.query_row(params![id as i64], Self::build_rule_from_row)
            .optional()
            .map_err(|e| TrackerError::database_error("Failed to query rule", e))
    }

    /// Creates a new recurrence rule.
    pub fn create_rule(&mut self, create: &CreateRule) -> Result<PeriodicTask> {
        if create.title.trim().is_empty() {
            return Err(TrackerError::invalid_input("title", "title must not be empty"));
        }
        if !(1..=3653).contains(&create.task_duration) {
            return Err(TrackerError::invalid_input(
                "taskDuration",
                "duration must be between 1 and 3653 days",
            ));
        }
        let recurrence = create.validate_recurrence()?;
        if let Some(end) = create.end_date {
            if end < create.start_date {
                return Err(TrackerError::invalid_input(
                    "endDate",
                    "endDate must not precede startDate",
                ));
            }
        }
        // A cap of zero means unbounded; normalize it away
        let max_repeat_count = create.max_repeat_count.filter(|&max| max > 0);

        let now = Timestamp::now();
        let now_str = now.to_string();
        let (week_days_json, month_days_json) = recurrence_columns(&recurrence)?;

        self.connection
            .execute(
                INSERT_RULE_SQL,
                params![
                    create.title,
                    recurrence.kind(),
                    week_days_json,
                    month_days_json,
                    create.task_duration,
                    serde_json::to_string(&create.executor_ids)?,
                    create.description,
                    create.detail,
                    max_repeat_count.map(i64::from),
                    0i64,
                    create.start_date.to_string(),
                    create.end_date.map(|d| d.to_string()),
                    true,
                    None::<String>,
                    &now_str,
                    &now_str
                ],
            )
            .map_err(|e| TrackerError::database_error("Failed to insert rule", e))?;

        let id = self.connection.last_insert_rowid() as u64;

        Ok(PeriodicTask {
            id,
            title: create.title.clone(),
            recurrence,
            task_duration: create.task_duration,
            executor_ids: create.executor_ids.clone(),
            description: create.description.clone(),
            detail: create.detail.clone(),
            max_repeat_count,
            current_repeat_count: 0,
            start_date: create.start_date,
            end_date: create.end_date,
            is_active: true,
            last_generated_date: None,
            created_at: now,
            updated_at: now,
        })
    }

    /// Retrieves a rule by its ID.
    pub fn get_rule(&self, id: u64) -> Result<Option<PeriodicTask>> {
        Self::query_rule(&self.connection, id)
    }

    /// All rules, newest first.
    pub fn list_rules(&self) -> Result<Vec<PeriodicTask>> {
        let mut stmt = self
            .connection
            .prepare(SELECT_ALL_RULES_SQL)
            .map_err(|e| TrackerError::database_error("Failed to prepare rule listing", e))?;

        let rows = stmt
            .query_map([], Self::build_rule_from_row)
            .map_err(|e| TrackerError::database_error("Failed to query rules", e))?;

        let mut rules = Vec::new();
        for row in rows {
            match row {
                Ok(rule) => rules.push(rule),
                Err(e) => log::warn!("skipping unreadable rule row: {e}"),
            }
        }
        Ok(rules)
    }

    /// Merges user-editable fields into the rule. Generation state is
    /// not reachable from here; only a successful generation advances it.
    pub fn update_rule(&mut self, id: u64, request: UpdateRuleRequest) -> Result<PeriodicTask> {
        let tx = self
            .connection
            .transaction()
            .db_context("Failed to begin transaction")?;

        let mut rule = Self::query_rule(&tx, id)?.ok_or(TrackerError::RuleNotFound { id })?;

        if let Some(title) = request.title {
            if title.trim().is_empty() {
                return Err(TrackerError::invalid_input("title", "title must not be empty"));
            }
            rule.title = title;
        }
        if let Some(recurrence) = request.recurrence {
            rule.recurrence = recurrence;
        }
        if let Some(duration) = request.task_duration {
            rule.task_duration = duration;
        }
        if let Some(executor_ids) = request.executor_ids {
            rule.executor_ids = executor_ids;
        }
        if let Some(description) = request.description {
            rule.description = Some(description);
        }
        if let Some(detail) = request.detail {
            rule.detail = Some(detail);
        }
        if let Some(max) = request.max_repeat_count {
            rule.max_repeat_count = if max > 0 { Some(max) } else { None };
        }
        if let Some(start) = request.start_date {
            rule.start_date = start;
        }
        if let Some(end) = request.end_date {
            rule.end_date = Some(end);
        }
        if let Some(end) = rule.end_date {
            if end < rule.start_date {
                return Err(TrackerError::invalid_input(
                    "endDate",
                    "endDate must not precede startDate",
                ));
            }
        }
        if let Some(is_active) = request.is_active {
            rule.is_active = is_active;
        }

        rule.updated_at = Timestamp::now();
        let (week_days_json, month_days_json) = recurrence_columns(&rule.recurrence)?;

        tx.execute(
            UPDATE_RULE_SQL,
            params![
                rule.title,
                rule.recurrence.kind(),
                week_days_json,
                month_days_json,
                rule.task_duration,
                serde_json::to_string(&rule.executor_ids)?,
                rule.description,
                rule.detail,
                rule.max_repeat_count.map(i64::from),
                rule.start_date.to_string(),
                rule.end_date.map(|d| d.to_string()),
                rule.is_active,
                rule.updated_at.to_string(),
                id as i64
            ],
        )
        .map_err(|e| TrackerError::database_error("Failed to update rule", e))?;

        tx.commit().db_context("Failed to commit transaction")?;

        Ok(rule)
    }

    /// Deletes a rule. Instances it already generated keep their
    /// back-reference and stay in the store.
    pub fn delete_rule(&mut self, id: u64) -> Result<PeriodicTask> {
        let tx = self
            .connection
            .transaction()
            .db_context("Failed to begin transaction")?;

        let rule = Self::query_rule(&tx, id)?.ok_or(TrackerError::RuleNotFound { id })?;

        tx.execute(DELETE_RULE_SQL, params![id as i64])
            .map_err(|e| TrackerError::database_error("Failed to delete rule", e))?;

        tx.commit().db_context("Failed to commit transaction")?;

        Ok(rule)
    }

    /// Fires one rule for one date, at most once.
    ///
    /// Returns the materialized instance, or None (with no side effects)
    /// when the rule is absent or not due. On success the
    /// instance insert, its index entries, and the rule-state advance
    /// (`current_repeat_count`, `last_generated_date`) commit atomically;
    /// this is the only path that advances a rule's generation state.
    pub fn generate_for_date(&mut self, rule_id: u64, date: Date) -> Result<Option<TodoTask>> {
        let tx = self
            .connection
            .transaction()
            .db_context("Failed to begin transaction")?;

        let Some(rule) = Self::query_rule(&tx, rule_id)? else {
            return Ok(None);
        };
        if !rule.is_due(date) {
            return Ok(None);
        }

        let end_date = date
            .checked_add(Span::new().days(rule.task_duration - 1))
            .map_err(|e| TrackerError::invalid_input("taskDuration", e.to_string()))?;

        let create = CreateTask {
            title: rule.title.clone(),
            start_date: date,
            end_date,
            executor_ids: rule.executor_ids.clone(),
            description: rule.description.clone(),
            detail: rule.detail.clone(),
        };
        let task = Self::insert_task_tx(&tx, &create, Some(rule.id))?;

        let now = Timestamp::now();
        tx.execute(
            ADVANCE_RULE_SQL,
            params![
                i64::from(rule.current_repeat_count + 1),
                date.to_string(),
                now.to_string(),
                rule_id as i64
            ],
        )
        .map_err(|e| TrackerError::database_error("Failed to advance rule state", e))?;

        tx.commit().db_context("Failed to commit transaction")?;

        log::debug!("rule {rule_id} fired for {date}: task {}", task.id);

        Ok(Some(task))
    }

    /// Evaluates every active rule against the date; returns how many
    /// fired.
    pub fn generate_all_for_date(&mut self, date: Date) -> Result<u32> {
        let ids: Vec<u64> = {
            let mut stmt = self
                .connection
                .prepare(SELECT_ACTIVE_RULE_IDS_SQL)
                .map_err(|e| TrackerError::database_error("Failed to prepare rule id query", e))?;
            let rows = stmt
                .query_map([], |row| row.get::<_, i64>(0).map(|id| id as u64))
                .map_err(|e| TrackerError::database_error("Failed to query active rules", e))?;
            rows.collect::<std::result::Result<Vec<_>, _>>()
                .map_err(|e| TrackerError::database_error("Failed to fetch active rules", e))?
        };

        let mut generated = 0;
        for id in ids {
            if self.generate_for_date(id, date)?.is_some() {
                generated += 1;
            }
        }
        Ok(generated)
    }

    /// Backfills every date in `[start, end]`, walking days in ascending
    /// order. The ascending walk is required: the single
    /// `last_generated_date` guard only gives at-most-once firing when
    /// no later call revisits an earlier date, so an inverted range is
    /// rejected instead of walked backwards.
    pub fn generate_for_range(&mut self, start: Date, end: Date) -> Result<u32> {
        if start > end {
            return Err(TrackerError::invalid_input(
                "endDate",
                "range end must not precede range start",
            ));
        }

        let mut generated = 0;
        let mut day = start;
        loop {
            generated += self.generate_all_for_date(day)?;
            if day >= end {
                break;
            }
            let Ok(next) = day.tomorrow() else {
                break;
            };
            day = next;
        }
        Ok(generated)
    }

    /// Counts of the instances a rule has generated.
    pub fn rule_stats(&self, rule_id: u64) -> Result<RuleStats> {
        if Self::query_rule(&self.connection, rule_id)?.is_none() {
            return Err(TrackerError::RuleNotFound { id: rule_id });
        }

        let (total, completed): (i64, i64) = self
            .connection
            .query_row(RULE_STATS_SQL, params![rule_id as i64], |row| {
                Ok((row.get(0)?, row.get(1)?))
            })
            .map_err(|e| TrackerError::database_error("Failed to query rule stats", e))?;

        Ok(RuleStats {
            total_generated: total,
            completed,
            pending: total - completed,
        })
    }
}

/// Serialized payload columns for a schedule; only the matching kind's
/// column is populated.
fn recurrence_columns(recurrence: &Recurrence) -> Result<(Option<String>, Option<String>)> {
    Ok(match recurrence {
        Recurrence::Daily => (None, None),
        Recurrence::Weekly { week_days } => (Some(serde_json::to_string(week_days)?), None),
        Recurrence::Monthly { month_days } => (None, Some(serde_json::to_string(month_days)?)),
    })
}

fn parse_day_list(column: usize, raw: Option<String>) -> rusqlite::Result<Vec<i8>> {
    let raw = raw.ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            column,
            Type::Text,
            "missing schedule payload".into(),
        )
    })?;
    serde_json::from_str(&raw)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(column, Type::Text, Box::new(e)))
}

fn parse_optional_date(column: usize, raw: Option<String>) -> rusqlite::Result<Option<Date>> {
    raw.map(|s| {
        s.parse::<Date>()
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(column, Type::Text, Box::new(e)))
    })
    .transpose()
}
