use std::path::PathBuf;

use hearth_core::params::{
    CreateRule, CreateTask, GenerateRange, Id, SetExecutorStatus, TasksByExecutor, TasksByMonth,
    UpdateTask,
};
use hearth_core::{TaskStatus, TrackerBuilder, TrackerError};
use jiff::civil::Date;
use tempfile::TempDir;

/// Helper function to create a temporary directory and database path
fn create_test_environment() -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().expect("Failed to create temporary directory");
    let db_path = temp_dir.path().join("test_hearth.db");
    (temp_dir, db_path)
}

fn d(s: &str) -> Date {
    s.parse().expect("valid test date")
}

#[tokio::test]
async fn test_complete_family_workflow() {
    let (_temp_dir, db_path) = create_test_environment();

    let tracker = TrackerBuilder::new()
        .with_database_path(Some(db_path))
        .build()
        .await
        .expect("Failed to create tracker");

    // A manual task shared by two family members
    let homework = tracker
        .create_task(&CreateTask {
            title: "Science project".to_string(),
            start_date: d("2024-01-28"),
            end_date: d("2024-02-03"),
            executor_ids: vec!["alice".to_string(), "bob".to_string()],
            description: Some("Volcano model".to_string()),
            detail: None,
        })
        .await
        .expect("Failed to create task");

    // A weekly chore rule: Mondays and Wednesdays
    let bins = tracker
        .create_rule(&CreateRule {
            title: "Bins out".to_string(),
            periodic_type: "weekly".to_string(),
            week_days: vec![0, 2],
            month_days: Vec::new(),
            task_duration: 1,
            executor_ids: vec!["bob".to_string()],
            description: None,
            detail: None,
            max_repeat_count: None,
            start_date: d("2024-01-01"),
            end_date: None,
        })
        .await
        .expect("Failed to create rule");

    // Backfill the first week of January: Mon 1st and Wed 3rd fire
    let generated = tracker
        .generate_range(&GenerateRange {
            start_date: d("2024-01-01"),
            end_date: d("2024-01-07"),
        })
        .await
        .expect("Failed to backfill");
    assert_eq!(generated, 2);

    let instances = tracker
        .tasks_for_rule(&Id { id: bins.id })
        .await
        .expect("Failed to list instances");
    assert_eq!(instances.len(), 2);
    assert_eq!(instances[0].start_date, d("2024-01-01"));
    assert_eq!(instances[1].start_date, d("2024-01-03"));

    // Day query: the manual task spans the month boundary
    let on_first_of_feb = tracker
        .tasks_by_date(d("2024-02-01"))
        .await
        .expect("Failed to query by date");
    assert_eq!(on_first_of_feb.len(), 1);
    assert_eq!(on_first_of_feb[0].id, homework.id);

    // Month query: January holds the homework and both chore instances
    let january = tracker
        .tasks_by_month(&TasksByMonth { year: 2024, month: 1 })
        .await
        .expect("Failed to query by month");
    assert_eq!(january.len(), 3);

    // Member-scoped query: alice sees her task but not bob's chores
    let for_alice = tracker
        .tasks_by_executor(&TasksByExecutor {
            member_id: "alice".to_string(),
            date: None,
        })
        .await
        .expect("Failed to query by executor");
    let alice_ids: Vec<u64> = for_alice.iter().map(|t| t.id).collect();
    assert!(alice_ids.contains(&homework.id));
    assert!(!alice_ids.contains(&instances[0].id));

    // Both kids finish; the aggregate flips
    tracker
        .set_executor_status(&SetExecutorStatus {
            id: homework.id,
            member_id: "alice".to_string(),
            status: TaskStatus::Completed,
        })
        .await
        .unwrap();
    let after_both = tracker
        .set_executor_status(&SetExecutorStatus {
            id: homework.id,
            member_id: "bob".to_string(),
            status: TaskStatus::Completed,
        })
        .await
        .unwrap();
    assert_eq!(after_both.status, TaskStatus::Completed);

    // Shrink the homework span out of February; the month query follows
    tracker
        .update_task(UpdateTask {
            id: homework.id,
            end_date: Some(d("2024-01-31")),
            ..Default::default()
        })
        .await
        .expect("Failed to update task");

    let february = tracker
        .tasks_by_month(&TasksByMonth { year: 2024, month: 2 })
        .await
        .unwrap();
    assert!(february.is_empty());

    // Stats for the chore rule
    let stats = tracker.rule_stats(&Id { id: bins.id }).await.unwrap();
    assert_eq!(stats.total_generated, 2);
    assert_eq!(stats.pending, 2);

    // Deleting the homework clears it from every query shape
    tracker.delete_task(&Id { id: homework.id }).await.unwrap();
    let january = tracker
        .tasks_by_month(&TasksByMonth { year: 2024, month: 1 })
        .await
        .unwrap();
    assert_eq!(january.len(), 2);
}

#[tokio::test]
async fn test_update_task_validation_through_facade() {
    let (_temp_dir, db_path) = create_test_environment();
    let tracker = TrackerBuilder::new()
        .with_database_path(Some(db_path))
        .build()
        .await
        .unwrap();

    let err = tracker
        .update_task(UpdateTask {
            id: 1,
            status: Some("finished".to_string()),
            ..Default::default()
        })
        .await
        .unwrap_err();
    assert!(matches!(err, TrackerError::InvalidInput { .. }));

    let err = tracker
        .update_task(UpdateTask {
            id: 99,
            title: Some("Ghost".to_string()),
            ..Default::default()
        })
        .await
        .unwrap_err();
    assert!(matches!(err, TrackerError::TaskNotFound { id: 99 }));
}

#[tokio::test]
async fn test_media_through_facade() {
    let (_temp_dir, db_path) = create_test_environment();
    let tracker = TrackerBuilder::new()
        .with_database_path(Some(db_path))
        .build()
        .await
        .unwrap();

    let task = tracker
        .create_task(&CreateTask {
            title: "Garden photos".to_string(),
            start_date: d("2024-06-01"),
            end_date: d("2024-06-01"),
            executor_ids: Vec::new(),
            description: None,
            detail: None,
        })
        .await
        .unwrap();

    let with_image = tracker
        .add_image(task.id, "sprouts.jpg".to_string())
        .await
        .unwrap();
    assert_eq!(with_image.images, vec!["sprouts.jpg".to_string()]);

    let with_audio = tracker
        .set_audio(task.id, Some("notes.ogg".to_string()))
        .await
        .unwrap();
    assert_eq!(with_audio.audio_path.as_deref(), Some("notes.ogg"));

    let cleared = tracker
        .remove_image(task.id, "sprouts.jpg".to_string())
        .await
        .unwrap();
    assert!(cleared.images.is_empty());
}

#[tokio::test]
async fn test_rule_update_reshapes_schedule() {
    let (_temp_dir, db_path) = create_test_environment();
    let tracker = TrackerBuilder::new()
        .with_database_path(Some(db_path))
        .build()
        .await
        .unwrap();

    let rule = tracker
        .create_rule(&CreateRule {
            title: "Laundry".to_string(),
            periodic_type: "weekly".to_string(),
            week_days: vec![5],
            month_days: Vec::new(),
            task_duration: 1,
            executor_ids: Vec::new(),
            description: None,
            detail: None,
            max_repeat_count: None,
            start_date: d("2024-01-01"),
            end_date: None,
        })
        .await
        .unwrap();

    // Move laundry day from Saturday to Sunday
    let updated = tracker
        .update_rule(hearth_core::params::UpdateRule {
            id: rule.id,
            periodic_type: Some("weekly".to_string()),
            week_days: vec![6],
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(
        updated.recurrence,
        hearth_core::Recurrence::Weekly { week_days: vec![6] }
    );

    // 2024-01-06 is a Saturday, 2024-01-07 a Sunday
    assert!(!tracker
        .generate_for_date(&hearth_core::params::GenerateForDate {
            id: rule.id,
            date: d("2024-01-06"),
        })
        .await
        .unwrap());
    assert!(tracker
        .generate_for_date(&hearth_core::params::GenerateForDate {
            id: rule.id,
            date: d("2024-01-07"),
        })
        .await
        .unwrap());
}
