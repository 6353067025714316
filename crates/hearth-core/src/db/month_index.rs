//! Monthly index maintenance and lookups.
//!
//! The index maps month keys (`"YYYY-MM"`) to the ids of tasks whose
//! inclusive span overlaps that month. The helpers here operate on a
//! borrowed connection so task mutations can keep their index updates
//! inside the same transaction as the row change.

use jiff::civil::Date;
use rusqlite::{params, Connection};

use crate::error::{Result, TrackerError};
use crate::models::{months_spanned, MonthKey};

const INSERT_BUCKET_SQL: &str =
    "INSERT OR IGNORE INTO task_months (month_key, task_id) VALUES (?1, ?2)";
const DELETE_TASK_BUCKETS_SQL: &str = "DELETE FROM task_months WHERE task_id = ?1";
const SELECT_BUCKET_SQL: &str =
    "SELECT task_id FROM task_months WHERE month_key = ?1 ORDER BY task_id";

/// Index a task under every month its span overlaps.
pub(super) fn insert_task(conn: &Connection, task_id: u64, start: Date, end: Date) -> Result<()> {
    for month in months_spanned(start, end) {
        conn.execute(INSERT_BUCKET_SQL, params![month.to_string(), task_id as i64])
            .map_err(|e| TrackerError::database_error("Failed to insert month bucket entry", e))?;
    }
    Ok(())
}

/// Drop a task from every bucket referencing it.
pub(super) fn remove_task(conn: &Connection, task_id: u64) -> Result<()> {
    conn.execute(DELETE_TASK_BUCKETS_SQL, params![task_id as i64])
        .map_err(|e| TrackerError::database_error("Failed to remove month bucket entries", e))?;
    Ok(())
}

/// The task ids indexed under one month.
pub(super) fn bucket(conn: &Connection, month: &MonthKey) -> Result<Vec<u64>> {
    let mut stmt = conn
        .prepare(SELECT_BUCKET_SQL)
        .map_err(|e| TrackerError::database_error("Failed to prepare bucket query", e))?;

    let ids = stmt
        .query_map(params![month.to_string()], |row| {
            row.get::<_, i64>(0).map(|id| id as u64)
        })
        .map_err(|e| TrackerError::database_error("Failed to query month bucket", e))?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| TrackerError::database_error("Failed to fetch month bucket", e))?;

    Ok(ids)
}

impl super::Database {
    /// Task ids currently indexed under the given month.
    ///
    /// The bucket is a superset of the month's tasks by construction: a
    /// task spanning into a neighboring month is listed in both. Exposed
    /// for diagnostics and invariant checks; queries go through
    /// [`tasks_by_date`](super::Database::tasks_by_date) and
    /// [`tasks_by_month`](super::Database::tasks_by_month).
    pub fn month_bucket(&self, month: &MonthKey) -> Result<Vec<u64>> {
        bucket(&self.connection, month)
    }
}
