//! Database operations and SQLite management for tasks and rules.
//!
//! This module provides the low-level storage layer of the Hearth
//! tracker: SQLite connection handling, schema management, the monthly
//! index, and the query interfaces for task instances and recurrence
//! rules. Every read-modify-write sequence runs inside a single
//! transaction, which is what keeps the index and rule generation state
//! consistent under concurrent callers.

use std::path::{Path, PathBuf};

use rusqlite::Connection;

use crate::error::{DatabaseResultExt, Result};

pub mod media;
pub mod migrations;
pub mod month_index;
pub mod rule_queries;
pub mod task_queries;

/// Database connection and operations handler.
pub struct Database {
    connection: Connection,
    media_root: Option<PathBuf>,
}

impl Database {
    /// Creates a new database connection and initializes the schema.
    ///
    /// Task media lives in an `uploads/` directory next to the database
    /// file, one subdirectory per task id.
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let media_root = path.as_ref().parent().map(|dir| dir.join("uploads"));
        let connection =
            Connection::open(path).db_context("Failed to open database connection")?;

        let db = Self {
            connection,
            media_root,
        };
        db.initialize_schema()?;
        Ok(db)
    }
}
