//! Task operations for the Tracker.

use jiff::civil::Date;
use tokio::task;

use super::Tracker;
use crate::{
    db::Database,
    error::{Result, TrackerError},
    models::{TaskStatus, TodoTask, UpdateTaskRequest},
    params::{CreateTask, Id, SetExecutorStatus, TasksByExecutor, TasksByMonth, UpdateTask},
};

impl Tracker {
    /// Creates a new task instance and indexes it by month.
    pub async fn create_task(&self, params: &CreateTask) -> Result<TodoTask> {
        let db_path = self.db_path.clone();
        let params = params.clone();

        task::spawn_blocking(move || {
            let mut db = Database::new(&db_path)?;
            db.create_task(&params, None)
        })
        .await
        .map_err(|e| TrackerError::Configuration {
            message: format!("Task join error: {e}"),
        })?
    }

    /// Retrieves a task by its ID.
    pub async fn get_task(&self, params: &Id) -> Result<Option<TodoTask>> {
        let db_path = self.db_path.clone();
        let task_id = params.id;

        task::spawn_blocking(move || {
            let db = Database::new(&db_path)?;
            db.get_task(task_id)
        })
        .await
        .map_err(|e| TrackerError::Configuration {
            message: format!("Task join error: {e}"),
        })?
    }

    /// Updates a task, re-indexing it when the date span changed.
    pub async fn update_task(&self, params: UpdateTask) -> Result<TodoTask> {
        let db_path = self.db_path.clone();
        let task_id = params.id;
        let request = UpdateTaskRequest::try_from(params)?;

        task::spawn_blocking(move || {
            let mut db = Database::new(&db_path)?;
            db.update_task(task_id, request)
        })
        .await
        .map_err(|e| TrackerError::Configuration {
            message: format!("Task join error: {e}"),
        })?
    }

    /// Permanently deletes a task, its index entries, and its media.
    /// Returns the deleted task for confirmation.
    pub async fn delete_task(&self, params: &Id) -> Result<TodoTask> {
        let db_path = self.db_path.clone();
        let task_id = params.id;

        task::spawn_blocking(move || {
            let mut db = Database::new(&db_path)?;
            db.delete_task(task_id)
        })
        .await
        .map_err(|e| TrackerError::Configuration {
            message: format!("Task join error: {e}"),
        })?
    }

    /// Tasks whose span contains the given date.
    pub async fn tasks_by_date(&self, date: Date) -> Result<Vec<TodoTask>> {
        let db_path = self.db_path.clone();

        task::spawn_blocking(move || {
            let db = Database::new(&db_path)?;
            db.tasks_by_date(date)
        })
        .await
        .map_err(|e| TrackerError::Configuration {
            message: format!("Task join error: {e}"),
        })?
    }

    /// All tasks overlapping the given month.
    pub async fn tasks_by_month(&self, params: &TasksByMonth) -> Result<Vec<TodoTask>> {
        let db_path = self.db_path.clone();
        let (year, month) = (params.year, params.month);

        task::spawn_blocking(move || {
            let db = Database::new(&db_path)?;
            db.tasks_by_month(year, month)
        })
        .await
        .map_err(|e| TrackerError::Configuration {
            message: format!("Task join error: {e}"),
        })?
    }

    /// Tasks visible to a family member, optionally narrowed to a date.
    pub async fn tasks_by_executor(&self, params: &TasksByExecutor) -> Result<Vec<TodoTask>> {
        let db_path = self.db_path.clone();
        let member_id = params.member_id.clone();
        let date = params.date;

        task::spawn_blocking(move || {
            let db = Database::new(&db_path)?;
            db.tasks_by_executor(&member_id, date)
        })
        .await
        .map_err(|e| TrackerError::Configuration {
            message: format!("Task join error: {e}"),
        })?
    }

    /// All tasks, newest first.
    pub async fn list_tasks(&self) -> Result<Vec<TodoTask>> {
        let db_path = self.db_path.clone();

        task::spawn_blocking(move || {
            let db = Database::new(&db_path)?;
            db.list_tasks()
        })
        .await
        .map_err(|e| TrackerError::Configuration {
            message: format!("Task join error: {e}"),
        })?
    }

    /// Sets the overall task status directly.
    pub async fn set_task_status(&self, id: u64, status: TaskStatus) -> Result<TodoTask> {
        let db_path = self.db_path.clone();

        task::spawn_blocking(move || {
            let mut db = Database::new(&db_path)?;
            db.set_task_status(id, status)
        })
        .await
        .map_err(|e| TrackerError::Configuration {
            message: format!("Task join error: {e}"),
        })?
    }

    /// Upserts one assignee's status record and recomputes the aggregate.
    pub async fn set_executor_status(&self, params: &SetExecutorStatus) -> Result<TodoTask> {
        let db_path = self.db_path.clone();
        let task_id = params.id;
        let member_id = params.member_id.clone();
        let status = params.status;

        task::spawn_blocking(move || {
            let mut db = Database::new(&db_path)?;
            db.set_executor_status(task_id, &member_id, status)
        })
        .await
        .map_err(|e| TrackerError::Configuration {
            message: format!("Task join error: {e}"),
        })?
    }

    /// Records an image attachment on a task.
    pub async fn add_image(&self, id: u64, image_path: String) -> Result<TodoTask> {
        let db_path = self.db_path.clone();

        task::spawn_blocking(move || {
            let mut db = Database::new(&db_path)?;
            db.add_image(id, &image_path)
        })
        .await
        .map_err(|e| TrackerError::Configuration {
            message: format!("Task join error: {e}"),
        })?
    }

    /// Removes an image attachment from a task.
    pub async fn remove_image(&self, id: u64, image_path: String) -> Result<TodoTask> {
        let db_path = self.db_path.clone();

        task::spawn_blocking(move || {
            let mut db = Database::new(&db_path)?;
            db.remove_image(id, &image_path)
        })
        .await
        .map_err(|e| TrackerError::Configuration {
            message: format!("Task join error: {e}"),
        })?
    }

    /// Sets or clears a task's voice memo path.
    pub async fn set_audio(&self, id: u64, audio_path: Option<String>) -> Result<TodoTask> {
        let db_path = self.db_path.clone();

        task::spawn_blocking(move || {
            let mut db = Database::new(&db_path)?;
            db.set_audio(id, audio_path.as_deref())
        })
        .await
        .map_err(|e| TrackerError::Configuration {
            message: format!("Task join error: {e}"),
        })?
    }
}
