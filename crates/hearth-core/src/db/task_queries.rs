//! Task CRUD operations and the month-bucketed queries.

use std::collections::HashSet;

use jiff::civil::Date;
use jiff::Timestamp;
use rusqlite::{params, types::Type, Connection, OptionalExtension, Transaction};

use super::month_index;
use crate::{
    error::{DatabaseResultExt, Result, TrackerError},
    models::{ExecutorStatus, MonthKey, TaskStatus, TodoTask, UpdateTaskRequest},
    params::CreateTask,
};

// Optimized SQL queries as const strings for compile-time optimization
const INSERT_TASK_SQL: &str = "INSERT INTO tasks (title, start_date, end_date, executor_ids, description, detail, images, audio_path, status, executor_statuses, periodic_task_id, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)";
const SELECT_TASK_SQL: &str = "SELECT id, title, start_date, end_date, executor_ids, description, detail, images, audio_path, status, executor_statuses, periodic_task_id, created_at, updated_at FROM tasks WHERE id = ?1";
const SELECT_ALL_TASKS_SQL: &str = "SELECT id, title, start_date, end_date, executor_ids, description, detail, images, audio_path, status, executor_statuses, periodic_task_id, created_at, updated_at FROM tasks ORDER BY created_at DESC, id DESC";
const SELECT_TASKS_FOR_RULE_SQL: &str = "SELECT id, title, start_date, end_date, executor_ids, description, detail, images, audio_path, status, executor_statuses, periodic_task_id, created_at, updated_at FROM tasks WHERE periodic_task_id = ?1 ORDER BY start_date, id";
const UPDATE_TASK_SQL: &str = "UPDATE tasks SET title = ?1, start_date = ?2, end_date = ?3, executor_ids = ?4, description = ?5, detail = ?6, images = ?7, audio_path = ?8, status = ?9, executor_statuses = ?10, updated_at = ?11 WHERE id = ?12";
const DELETE_TASK_SQL: &str = "DELETE FROM tasks WHERE id = ?1";

impl super::Database {
    /// Helper function to construct a TodoTask from a database row.
    ///
    /// Malformed JSON or date text surfaces as a conversion failure so
    /// listing paths can log and skip the record instead of aborting the
    /// whole query.
    fn build_task_from_row(row: &rusqlite::Row) -> rusqlite::Result<TodoTask> {
        let status_str: String = row.get(9)?;
        let status = status_str.parse::<TaskStatus>().map_err(|_| {
            rusqlite::Error::FromSqlConversionFailure(
                9,
                Type::Text,
                format!("Invalid status: {status_str}").into(),
            )
        })?;

        let executor_ids: String = row.get(4)?;
        let executor_ids: Vec<String> = serde_json::from_str(&executor_ids)
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(4, Type::Text, Box::new(e)))?;

        let images: String = row.get(7)?;
        let images: Vec<String> = serde_json::from_str(&images)
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(7, Type::Text, Box::new(e)))?;

        let executor_statuses: String = row.get(10)?;
        let executor_statuses: Vec<ExecutorStatus> = serde_json::from_str(&executor_statuses)
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(10, Type::Text, Box::new(e)))?;

        Ok(TodoTask {
            id: row.get::<_, i64>(0)? as u64,
            title: row.get(1)?,
            start_date: row.get::<_, String>(2)?.parse::<Date>().map_err(|e| {
                rusqlite::Error::FromSqlConversionFailure(2, Type::Text, Box::new(e))
            })?,
            end_date: row.get::<_, String>(3)?.parse::<Date>().map_err(|e| {
                rusqlite::Error::FromSqlConversionFailure(3, Type::Text, Box::new(e))
            })?,
            executor_ids,
            description: row.get(5)?,
            detail: row.get(6)?,
            images,
            audio_path: row.get(8)?,
            status,
            executor_statuses,
            periodic_task_id: row.get::<_, Option<i64>>(11)?.map(|id| id as u64),
            created_at: row.get::<_, String>(12)?.parse::<Timestamp>().map_err(|e| {
                rusqlite::Error::FromSqlConversionFailure(12, Type::Text, Box::new(e))
            })?,
            updated_at: row.get::<_, String>(13)?.parse::<Timestamp>().map_err(|e| {
                rusqlite::Error::FromSqlConversionFailure(13, Type::Text, Box::new(e))
            })?,
        })
    }

    /// Loads a single task by id on a borrowed connection, so mutation
    /// paths can read within their own transaction.
    pub(super) fn query_task(conn: &Connection, id: u64) -> Result<Option<TodoTask>> {
        let mut stmt = conn
            .prepare(SELECT_TASK_SQL)
            .map_err(|e| TrackerError::database_error("Failed to prepare task query", e))?;

        stmt.query_row(params![id as i64], Self::build_task_from_row)
            .optional()
            .map_err(|e| TrackerError::database_error("Failed to query task", e))
    }

    /// Inserts a task row and its month bucket entries inside the
    /// caller's transaction. Shared by direct creation and the
    /// recurrence engine's generation path.
    pub(super) fn insert_task_tx(
        tx: &Transaction<'_>,
        create: &CreateTask,
        periodic_task_id: Option<u64>,
    ) -> Result<TodoTask> {
        let now = Timestamp::now();
        let now_str = now.to_string();

        // Seed one pending record per assignee
        let executor_statuses: Vec<ExecutorStatus> = create
            .executor_ids
            .iter()
            .map(|member| ExecutorStatus {
                member_id: member.clone(),
                status: TaskStatus::Pending,
                completed_at: None,
            })
            .collect();

        tx.execute(
            INSERT_TASK_SQL,
            params![
                create.title,
                create.start_date.to_string(),
                create.end_date.to_string(),
                serde_json::to_string(&create.executor_ids)?,
                create.description,
                create.detail,
                "[]",
                None::<String>,
                TaskStatus::Pending.as_str(),
                serde_json::to_string(&executor_statuses)?,
                periodic_task_id.map(|id| id as i64),
                &now_str,
                &now_str
            ],
        )
        .map_err(|e| TrackerError::database_error("Failed to insert task", e))?;

        let id = tx.last_insert_rowid() as u64;

        month_index::insert_task(tx, id, create.start_date, create.end_date)?;

        Ok(TodoTask {
            id,
            title: create.title.clone(),
            start_date: create.start_date,
            end_date: create.end_date,
            executor_ids: create.executor_ids.clone(),
            description: create.description.clone(),
            detail: create.detail.clone(),
            images: Vec::new(),
            audio_path: None,
            status: TaskStatus::Pending,
            executor_statuses,
            periodic_task_id,
            created_at: now,
            updated_at: now,
        })
    }

    /// Rewrites a task's mutable columns. Callers bump `updated_at` on
    /// the model before storing.
    pub(super) fn store_task_tx(conn: &Connection, task: &TodoTask) -> Result<()> {
        conn.execute(
            UPDATE_TASK_SQL,
            params![
                task.title,
                task.start_date.to_string(),
                task.end_date.to_string(),
                serde_json::to_string(&task.executor_ids)?,
                task.description,
                task.detail,
                serde_json::to_string(&task.images)?,
                task.audio_path,
                task.status.as_str(),
                serde_json::to_string(&task.executor_statuses)?,
                task.updated_at.to_string(),
                task.id as i64
            ],
        )
        .map_err(|e| TrackerError::database_error("Failed to update task", e))?;
        Ok(())
    }

    /// Creates a new task instance and indexes it under every month its
    /// span overlaps, in a single transaction.
    pub fn create_task(
        &mut self,
        create: &CreateTask,
        periodic_task_id: Option<u64>,
    ) -> Result<TodoTask> {
        if create.title.trim().is_empty() {
            return Err(TrackerError::invalid_input("title", "title must not be empty"));
        }
        if create.start_date > create.end_date {
            return Err(TrackerError::invalid_input(
                "endDate",
                "endDate must not precede startDate",
            ));
        }

        let tx = self
            .connection
            .transaction()
            .db_context("Failed to begin transaction")?;

        let task = Self::insert_task_tx(&tx, create, periodic_task_id)?;

        tx.commit().db_context("Failed to commit transaction")?;

        Ok(task)
    }

    /// Retrieves a task by its ID.
    pub fn get_task(&self, id: u64) -> Result<Option<TodoTask>> {
        Self::query_task(&self.connection, id)
    }

    /// Merges the requested fields into the task and re-indexes it when
    /// the date span changed. A same-span update leaves the monthly
    /// index untouched.
    pub fn update_task(&mut self, id: u64, request: UpdateTaskRequest) -> Result<TodoTask> {
        let tx = self
            .connection
            .transaction()
            .db_context("Failed to begin transaction")?;

        let mut task = Self::query_task(&tx, id)?.ok_or(TrackerError::TaskNotFound { id })?;
        let old_span = (task.start_date, task.end_date);

        if let Some(title) = request.title {
            if title.trim().is_empty() {
                return Err(TrackerError::invalid_input("title", "title must not be empty"));
            }
            task.title = title;
        }
        if let Some(start) = request.start_date {
            task.start_date = start;
        }
        if let Some(end) = request.end_date {
            task.end_date = end;
        }
        if task.start_date > task.end_date {
            return Err(TrackerError::invalid_input(
                "endDate",
                "endDate must not precede startDate",
            ));
        }
        if let Some(executor_ids) = request.executor_ids {
            // Keep records for retained members, seed pending for new ones
            task.executor_statuses
                .retain(|es| executor_ids.contains(&es.member_id));
            for member in &executor_ids {
                if !task
                    .executor_statuses
                    .iter()
                    .any(|es| es.member_id == *member)
                {
                    task.executor_statuses.push(ExecutorStatus {
                        member_id: member.clone(),
                        status: TaskStatus::Pending,
                        completed_at: None,
                    });
                }
            }
            task.executor_ids = executor_ids;
        }
        if let Some(description) = request.description {
            task.description = Some(description);
        }
        if let Some(detail) = request.detail {
            task.detail = Some(detail);
        }
        if let Some(status) = request.status {
            task.status = status;
        }

        task.updated_at = Timestamp::now();
        Self::store_task_tx(&tx, &task)?;

        if (task.start_date, task.end_date) != old_span {
            month_index::remove_task(&tx, id)?;
            month_index::insert_task(&tx, id, task.start_date, task.end_date)?;
        }

        tx.commit().db_context("Failed to commit transaction")?;

        Ok(task)
    }

    /// Deletes a task, drops it from every month bucket, and removes its
    /// media directory. Returns the deleted task for confirmation.
    pub fn delete_task(&mut self, id: u64) -> Result<TodoTask> {
        let tx = self
            .connection
            .transaction()
            .db_context("Failed to begin transaction")?;

        let task = Self::query_task(&tx, id)?.ok_or(TrackerError::TaskNotFound { id })?;

        tx.execute(DELETE_TASK_SQL, params![id as i64])
            .map_err(|e| TrackerError::database_error("Failed to delete task", e))?;

        month_index::remove_task(&tx, id)?;

        tx.commit().db_context("Failed to commit transaction")?;

        // Media cleanup is best-effort once the row is gone
        self.remove_media_files(id);

        Ok(task)
    }

    /// Tasks whose span contains the given date.
    ///
    /// Resolved through the date's month bucket, then narrowed: the
    /// bucket is a superset since a task can overlap the month without
    /// containing the day.
    pub fn tasks_by_date(&self, date: Date) -> Result<Vec<TodoTask>> {
        let ids = month_index::bucket(&self.connection, &MonthKey::of(date))?;
        let tasks = self
            .load_indexed_tasks(&ids)
            .into_iter()
            .filter(|task| task.contains_date(date))
            .collect();
        Ok(tasks)
    }

    /// All tasks overlapping the given month.
    pub fn tasks_by_month(&self, year: i16, month: i8) -> Result<Vec<TodoTask>> {
        let key = MonthKey::new(year, month)
            .map_err(|reason| TrackerError::invalid_input("month", reason))?;
        let mut ids = month_index::bucket(&self.connection, &key)?;

        // The bucket's primary key already forbids duplicates; dedupe
        // anyway so a drifted index cannot produce repeated rows.
        let mut seen = HashSet::new();
        ids.retain(|id| seen.insert(*id));

        Ok(self.load_indexed_tasks(&ids))
    }

    /// Tasks visible to a family member, optionally narrowed to a date.
    ///
    /// Unassigned tasks are visible to every member.
    pub fn tasks_by_executor(&self, member_id: &str, date: Option<Date>) -> Result<Vec<TodoTask>> {
        let tasks = match date {
            Some(date) => self.tasks_by_date(date)?,
            None => self.list_tasks()?,
        };
        Ok(tasks
            .into_iter()
            .filter(|task| task.visible_to(member_id))
            .collect())
    }

    /// All tasks, newest first.
    pub fn list_tasks(&self) -> Result<Vec<TodoTask>> {
        let mut stmt = self
            .connection
            .prepare(SELECT_ALL_TASKS_SQL)
            .map_err(|e| TrackerError::database_error("Failed to prepare task listing", e))?;

        let rows = stmt
            .query_map([], Self::build_task_from_row)
            .map_err(|e| TrackerError::database_error("Failed to query tasks", e))?;

        Ok(Self::collect_skipping_corrupt(rows))
    }

    /// The instances a recurrence rule has generated, in calendar order.
    pub fn tasks_for_rule(&self, rule_id: u64) -> Result<Vec<TodoTask>> {
        let mut stmt = self
            .connection
            .prepare(SELECT_TASKS_FOR_RULE_SQL)
            .map_err(|e| TrackerError::database_error("Failed to prepare rule task query", e))?;

        let rows = stmt
            .query_map(params![rule_id as i64], Self::build_task_from_row)
            .map_err(|e| TrackerError::database_error("Failed to query rule tasks", e))?;

        Ok(Self::collect_skipping_corrupt(rows))
    }

    /// Sets the overall task status directly, bypassing per-assignee
    /// records. Used when no per-assignee tracking is wanted, and to
    /// force a task back to pending.
    pub fn set_task_status(&mut self, id: u64, status: TaskStatus) -> Result<TodoTask> {
        let tx = self
            .connection
            .transaction()
            .db_context("Failed to begin transaction")?;

        let mut task = Self::query_task(&tx, id)?.ok_or(TrackerError::TaskNotFound { id })?;
        task.status = status;
        task.updated_at = Timestamp::now();
        Self::store_task_tx(&tx, &task)?;

        tx.commit().db_context("Failed to commit transaction")?;

        Ok(task)
    }

    /// Upserts one assignee's status record, then recomputes the
    /// aggregate: the overall status flips to completed only when every
    /// listed assignee has completed. No other transition is automatic,
    /// so a task manually forced back to pending stays pending until the
    /// last outstanding assignee finishes.
    pub fn set_executor_status(
        &mut self,
        id: u64,
        member_id: &str,
        status: TaskStatus,
    ) -> Result<TodoTask> {
        let tx = self
            .connection
            .transaction()
            .db_context("Failed to begin transaction")?;

        let mut task = Self::query_task(&tx, id)?.ok_or(TrackerError::TaskNotFound { id })?;

        let now = Timestamp::now();
        let completed_at = match status {
            TaskStatus::Completed => Some(now),
            TaskStatus::Pending => None,
        };
        let record = ExecutorStatus {
            member_id: member_id.to_string(),
            status,
            completed_at,
        };

        match task
            .executor_statuses
            .iter_mut()
            .find(|es| es.member_id == member_id)
        {
            Some(existing) => *existing = record,
            None => task.executor_statuses.push(record),
        }

        if task.all_executors_completed() {
            task.status = TaskStatus::Completed;
        }

        task.updated_at = now;
        Self::store_task_tx(&tx, &task)?;

        tx.commit().db_context("Failed to commit transaction")?;

        Ok(task)
    }

    /// Loads tasks for a list of indexed ids, skipping entries the store
    /// can no longer account for: an id with no row (index drift) or a
    /// row that fails to decode (corrupt record). Both are logged rather
    /// than failing the query.
    fn load_indexed_tasks(&self, ids: &[u64]) -> Vec<TodoTask> {
        let mut tasks = Vec::with_capacity(ids.len());
        for &id in ids {
            match Self::query_task(&self.connection, id) {
                Ok(Some(task)) => tasks.push(task),
                Ok(None) => log::warn!("monthly index references missing task {id}"),
                Err(e) => log::warn!("skipping unreadable task {id}: {e}"),
            }
        }
        tasks
    }

    /// Drains a row iterator, logging and skipping rows that fail to
    /// decode so one corrupt record cannot take down a listing.
    fn collect_skipping_corrupt<I>(rows: I) -> Vec<TodoTask>
    where
        I: Iterator<Item = rusqlite::Result<TodoTask>>,
    {
        let mut tasks = Vec::new();
        for row in rows {
            match row {
                Ok(task) => tasks.push(task),
                Err(e) => log::warn!("skipping unreadable task row: {e}"),
            }
        }
        tasks
    }
}
