use jiff::civil::Date;
use tempfile::TempDir;

use super::TrackerBuilder;
use crate::params::{CreateRule, CreateTask, GenerateForDate, Id};

fn d(s: &str) -> Date {
    s.parse().expect("valid test date")
}

async fn create_test_tracker() -> (TempDir, super::Tracker) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let db_path = temp_dir.path().join("test.db");
    let tracker = TrackerBuilder::new()
        .with_database_path(Some(&db_path))
        .build()
        .await
        .expect("Failed to create tracker");
    (temp_dir, tracker)
}

fn daily_rule(title: &str, start: &str) -> CreateRule {
    CreateRule {
        title: title.to_string(),
        periodic_type: "daily".to_string(),
        week_days: Vec::new(),
        month_days: Vec::new(),
        task_duration: 1,
        executor_ids: Vec::new(),
        description: None,
        detail: None,
        max_repeat_count: None,
        start_date: d(start),
        end_date: None,
    }
}

#[tokio::test]
async fn test_create_and_fetch_task() {
    let (_temp_dir, tracker) = create_test_tracker().await;

    let created = tracker
        .create_task(&CreateTask {
            title: "Feed the cat".to_string(),
            start_date: d("2024-05-01"),
            end_date: d("2024-05-01"),
            executor_ids: vec!["alice".to_string()],
            description: None,
            detail: None,
        })
        .await
        .expect("Failed to create task");

    let fetched = tracker
        .get_task(&Id { id: created.id })
        .await
        .expect("Failed to get task")
        .expect("Task should exist");

    assert_eq!(fetched.title, "Feed the cat");
    assert_eq!(fetched.executor_statuses.len(), 1);
}

#[tokio::test]
async fn test_generate_for_date_is_idempotent_through_facade() {
    let (_temp_dir, tracker) = create_test_tracker().await;

    let rule = tracker
        .create_rule(&daily_rule("Dishes", "2024-05-01"))
        .await
        .expect("Failed to create rule");

    let params = GenerateForDate {
        id: rule.id,
        date: d("2024-05-01"),
    };
    assert!(tracker.generate_for_date(&params).await.unwrap());
    assert!(!tracker.generate_for_date(&params).await.unwrap());

    let refreshed = tracker
        .get_rule(&Id { id: rule.id })
        .await
        .unwrap()
        .expect("Rule should exist");
    assert_eq!(refreshed.current_repeat_count, 1);
    assert_eq!(refreshed.last_generated_date, Some(d("2024-05-01")));
}

#[tokio::test]
async fn test_disabled_rule_does_not_fire() {
    let (_temp_dir, tracker) = create_test_tracker().await;

    let rule = tracker
        .create_rule(&daily_rule("Vacuum", "2024-05-01"))
        .await
        .expect("Failed to create rule");

    tracker
        .set_rule_active(rule.id, false)
        .await
        .expect("Failed to disable rule");

    let generated = tracker
        .generate_all_for_date(d("2024-05-02"))
        .await
        .expect("Failed to generate");
    assert_eq!(generated, 0);
}

#[tokio::test]
async fn test_generate_today_uses_system_date() {
    let (_temp_dir, tracker) = create_test_tracker().await;

    // Rule window opened long ago, so today is always eligible
    tracker
        .create_rule(&daily_rule("Tidy up", "2000-01-01"))
        .await
        .expect("Failed to create rule");

    assert_eq!(tracker.generate_today().await.unwrap(), 1);
    assert_eq!(tracker.generate_today().await.unwrap(), 0);
}
