//! Collection wrapper types for displaying groups of domain objects.

use std::fmt;

use crate::models::{PeriodicTask, TodoTask};

/// Newtype wrapper for displaying collections of tasks.
///
/// Formats each task with its own Display implementation and handles
/// empty collections gracefully.
pub struct Tasks(pub Vec<TodoTask>);

impl Tasks {
    /// Check if the collection is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Get the number of tasks in the collection.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Get an iterator over the tasks.
    pub fn iter(&self) -> std::slice::Iter<'_, TodoTask> {
        self.0.iter()
    }
}

impl fmt::Display for Tasks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            writeln!(f, "No tasks found.")
        } else {
            for task in &self.0 {
                write!(f, "{task}")?;
                writeln!(f)?;
            }
            Ok(())
        }
    }
}

/// Newtype wrapper for displaying collections of recurrence rules.
pub struct Rules(pub Vec<PeriodicTask>);

impl Rules {
    /// Check if the collection is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Get the number of rules in the collection.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Get an iterator over the rules.
    pub fn iter(&self) -> std::slice::Iter<'_, PeriodicTask> {
        self.0.iter()
    }
}

impl fmt::Display for Rules {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            writeln!(f, "No rules found.")
        } else {
            for rule in &self.0 {
                write!(f, "{rule}")?;
                writeln!(f)?;
            }
            Ok(())
        }
    }
}
