//! Recurrence rule operations for the Tracker.

use tokio::task;

use super::Tracker;
use crate::{
    db::Database,
    error::{Result, TrackerError},
    models::{PeriodicTask, RuleStats, TodoTask, UpdateRuleRequest},
    params::{CreateRule, Id, UpdateRule},
};

impl Tracker {
    /// Creates a new recurrence rule.
    pub async fn create_rule(&self, params: &CreateRule) -> Result<PeriodicTask> {
        let db_path = self.db_path.clone();
        let params = params.clone();

        task::spawn_blocking(move || {
            let mut db = Database::new(&db_path)?;
            db.create_rule(&params)
        })
        .await
        .map_err(|e| TrackerError::Configuration {
            message: format!("Task join error: {e}"),
        })?
    }

    /// Retrieves a rule by its ID.
    pub async fn get_rule(&self, params: &Id) -> Result<Option<PeriodicTask>> {
        let db_path = self.db_path.clone();
        let rule_id = params.id;

        task::spawn_blocking(move || {
            let db = Database::new(&db_path)?;
            db.get_rule(rule_id)
        })
        .await
        .map_err(|e| TrackerError::Configuration {
            message: format!("Task join error: {e}"),
        })?
    }

    /// All rules, newest first.
    pub async fn list_rules(&self) -> Result<Vec<PeriodicTask>> {
        let db_path = self.db_path.clone();

        task::spawn_blocking(move || {
            let db = Database::new(&db_path)?;
            db.list_rules()
        })
        .await
        .map_err(|e| TrackerError::Configuration {
            message: format!("Task join error: {e}"),
        })?
    }

    /// Updates a rule's user-editable fields.
    pub async fn update_rule(&self, params: UpdateRule) -> Result<PeriodicTask> {
        let db_path = self.db_path.clone();
        let rule_id = params.id;
        let request = UpdateRuleRequest::try_from(params)?;

        task::spawn_blocking(move || {
            let mut db = Database::new(&db_path)?;
            db.update_rule(rule_id, request)
        })
        .await
        .map_err(|e| TrackerError::Configuration {
            message: format!("Task join error: {e}"),
        })?
    }

    /// Toggles whether a rule is eligible to fire.
    pub async fn set_rule_active(&self, id: u64, is_active: bool) -> Result<PeriodicTask> {
        self.update_rule(UpdateRule {
            id,
            is_active: Some(is_active),
            ..Default::default()
        })
        .await
    }

    /// Permanently deletes a rule. Returns the deleted rule for
    /// confirmation; already-generated instances are left in the store.
    pub async fn delete_rule(&self, params: &Id) -> Result<PeriodicTask> {
        let db_path = self.db_path.clone();
        let rule_id = params.id;

        task::spawn_blocking(move || {
            let mut db = Database::new(&db_path)?;
            db.delete_rule(rule_id)
        })
        .await
        .map_err(|e| TrackerError::Configuration {
            message: format!("Task join error: {e}"),
        })?
    }

    /// Counts of the instances a rule has generated.
    pub async fn rule_stats(&self, params: &Id) -> Result<RuleStats> {
        let db_path = self.db_path.clone();
        let rule_id = params.id;

        task::spawn_blocking(move || {
            let db = Database::new(&db_path)?;
            db.rule_stats(rule_id)
        })
        .await
        .map_err(|e| TrackerError::Configuration {
            message: format!("Task join error: {e}"),
        })?
    }

    /// The instances a rule has generated, in calendar order.
    pub async fn tasks_for_rule(&self, params: &Id) -> Result<Vec<TodoTask>> {
        let db_path = self.db_path.clone();
        let rule_id = params.id;

        task::spawn_blocking(move || {
            let db = Database::new(&db_path)?;
            db.tasks_for_rule(rule_id)
        })
        .await
        .map_err(|e| TrackerError::Configuration {
            message: format!("Task join error: {e}"),
        })?
    }
}
