//! Per-task media attachments (images and voice memos).
//!
//! Media files live under `<data dir>/uploads/<task id>/`; the task row
//! stores paths relative to that directory. Deleting a task removes the
//! whole directory.

use std::fs;
use std::path::PathBuf;

use jiff::Timestamp;

use crate::error::{DatabaseResultExt, Result, TrackerError};
use crate::models::TodoTask;

impl super::Database {
    /// The media directory for a task, if the store has a media root.
    pub fn media_dir(&self, task_id: u64) -> Option<PathBuf> {
        self.media_root
            .as_ref()
            .map(|root| root.join(task_id.to_string()))
    }

    /// Creates the task's media directory if needed and returns it.
    pub fn ensure_media_dir(&self, task_id: u64) -> Result<PathBuf> {
        let dir = self.media_dir(task_id).ok_or(TrackerError::Configuration {
            message: "store has no media root".to_string(),
        })?;
        fs::create_dir_all(&dir).map_err(|e| TrackerError::FileSystem {
            path: dir.clone(),
            source: e,
        })?;
        Ok(dir)
    }

    /// Records an image attachment on the task.
    pub fn add_image(&mut self, task_id: u64, image_path: &str) -> Result<TodoTask> {
        self.mutate_task_media(task_id, |task| {
            task.images.push(image_path.to_string());
        })
    }

    /// Removes an image attachment and unlinks the file (best-effort).
    pub fn remove_image(&mut self, task_id: u64, image_path: &str) -> Result<TodoTask> {
        let task = self.mutate_task_media(task_id, |task| {
            task.images.retain(|p| p != image_path);
        })?;

        if let Some(dir) = self.media_dir(task_id) {
            let file = dir.join(image_path);
            if file.exists() {
                if let Err(e) = fs::remove_file(&file) {
                    log::warn!("could not remove image {}: {e}", file.display());
                }
            }
        }

        Ok(task)
    }

    /// Sets or clears the task's voice memo path.
    pub fn set_audio(&mut self, task_id: u64, audio_path: Option<&str>) -> Result<TodoTask> {
        self.mutate_task_media(task_id, |task| {
            task.audio_path = audio_path.map(String::from);
        })
    }

    /// Removes a task's media directory, logging instead of failing:
    /// the row is already gone by the time this runs.
    pub(super) fn remove_media_files(&self, task_id: u64) {
        let Some(dir) = self.media_dir(task_id) else {
            return;
        };
        if dir.exists() {
            if let Err(e) = fs::remove_dir_all(&dir) {
                log::warn!("could not remove media for task {task_id}: {e}");
            }
        }
    }

    fn mutate_task_media<F>(&mut self, task_id: u64, mutate: F) -> Result<TodoTask>
    where
        F: FnOnce(&mut TodoTask),
    {
        let tx = self
            .connection
            .transaction()
            .db_context("Failed to begin transaction")?;

        let mut task =
            Self::query_task(&tx, task_id)?.ok_or(TrackerError::TaskNotFound { id: task_id })?;
        mutate(&mut task);
        task.updated_at = Timestamp::now();
        Self::store_task_tx(&tx, &task)?;

        tx.commit().db_context("Failed to commit transaction")?;

        Ok(task)
    }
}
