//! Generation triggers for the Tracker.
//!
//! Generation is on-demand: the CLI (or any outer layer) calls one of
//! these when it wants the schedule caught up. There is no background
//! clock; backfilling a missed stretch is `generate_range`.

use jiff::civil::Date;
use jiff::Zoned;
use tokio::task;

use super::Tracker;
use crate::{
    db::Database,
    error::{Result, TrackerError},
    params::{GenerateForDate, GenerateRange},
};

impl Tracker {
    /// Fires one rule for one date. Returns whether an instance was
    /// generated; calling again for the same date returns false.
    pub async fn generate_for_date(&self, params: &GenerateForDate) -> Result<bool> {
        let db_path = self.db_path.clone();
        let (rule_id, date) = (params.id, params.date);

        task::spawn_blocking(move || {
            let mut db = Database::new(&db_path)?;
            Ok(db.generate_for_date(rule_id, date)?.is_some())
        })
        .await
        .map_err(|e| TrackerError::Configuration {
            message: format!("Task join error: {e}"),
        })?
    }

    /// Evaluates every active rule against the date; returns how many
    /// fired.
    pub async fn generate_all_for_date(&self, date: Date) -> Result<u32> {
        let db_path = self.db_path.clone();

        task::spawn_blocking(move || {
            let mut db = Database::new(&db_path)?;
            db.generate_all_for_date(date)
        })
        .await
        .map_err(|e| TrackerError::Configuration {
            message: format!("Task join error: {e}"),
        })?
    }

    /// Backfills every date in the range, walking days in ascending
    /// order; returns the total number of instances generated.
    pub async fn generate_range(&self, params: &GenerateRange) -> Result<u32> {
        let db_path = self.db_path.clone();
        let (start, end) = (params.start_date, params.end_date);

        task::spawn_blocking(move || {
            let mut db = Database::new(&db_path)?;
            db.generate_for_range(start, end)
        })
        .await
        .map_err(|e| TrackerError::Configuration {
            message: format!("Task join error: {e}"),
        })?
    }

    /// Catches the schedule up for today (system timezone).
    pub async fn generate_today(&self) -> Result<u32> {
        self.generate_all_for_date(Zoned::now().date()).await
    }
}
