#[cfg(test)]
mod model_tests {
    use jiff::civil::Date;
    use jiff::Timestamp;

    use crate::models::{
        months_spanned, ExecutorStatus, MonthKey, PeriodicTask, Recurrence, TaskStatus, TodoTask,
    };
    use crate::params::{CreateRule, UpdateTask};

    fn d(s: &str) -> Date {
        s.parse().expect("valid test date")
    }

    fn create_test_task() -> TodoTask {
        TodoTask {
            id: 42,
            title: "Water the plants".to_string(),
            start_date: d("2024-01-28"),
            end_date: d("2024-02-03"),
            executor_ids: vec!["alice".to_string(), "bob".to_string()],
            description: Some("Front porch and kitchen".to_string()),
            detail: None,
            images: Vec::new(),
            audio_path: None,
            status: TaskStatus::Pending,
            executor_statuses: vec![
                ExecutorStatus {
                    member_id: "alice".to_string(),
                    status: TaskStatus::Pending,
                    completed_at: None,
                },
                ExecutorStatus {
                    member_id: "bob".to_string(),
                    status: TaskStatus::Pending,
                    completed_at: None,
                },
            ],
            periodic_task_id: None,
            created_at: Timestamp::from_second(1_640_995_200).unwrap(),
            updated_at: Timestamp::from_second(1_641_081_600).unwrap(),
        }
    }

    fn create_test_rule(recurrence: Recurrence) -> PeriodicTask {
        PeriodicTask {
            id: 7,
            title: "Take out the trash".to_string(),
            recurrence,
            task_duration: 1,
            executor_ids: vec!["bob".to_string()],
            description: None,
            detail: None,
            max_repeat_count: None,
            current_repeat_count: 0,
            start_date: d("2024-01-01"),
            end_date: None,
            is_active: true,
            last_generated_date: None,
            created_at: Timestamp::from_second(1_640_995_200).unwrap(),
            updated_at: Timestamp::from_second(1_640_995_200).unwrap(),
        }
    }

    #[test]
    fn test_month_key_display_and_parse() {
        let key = MonthKey::new(2024, 2).unwrap();
        assert_eq!(key.to_string(), "2024-02");
        assert_eq!("2024-02".parse::<MonthKey>().unwrap(), key);
        assert!("2024-13".parse::<MonthKey>().is_err());
        assert!("garbage".parse::<MonthKey>().is_err());
    }

    #[test]
    fn test_month_key_ordering_and_next() {
        let dec = MonthKey::new(2023, 12).unwrap();
        let jan = MonthKey::new(2024, 1).unwrap();
        assert!(dec < jan);
        assert_eq!(dec.next(), jan);
        assert_eq!(jan.next(), MonthKey::new(2024, 2).unwrap());
    }

    #[test]
    fn test_months_spanned_within_one_month() {
        let months = months_spanned(d("2024-03-05"), d("2024-03-20"));
        assert_eq!(months, vec![MonthKey::new(2024, 3).unwrap()]);
    }

    #[test]
    fn test_months_spanned_across_months_and_years() {
        let months = months_spanned(d("2023-11-20"), d("2024-01-10"));
        assert_eq!(
            months,
            vec![
                MonthKey::new(2023, 11).unwrap(),
                MonthKey::new(2023, 12).unwrap(),
                MonthKey::new(2024, 1).unwrap(),
            ]
        );
    }

    #[test]
    fn test_task_contains_date_is_inclusive() {
        let task = create_test_task();
        assert!(task.contains_date(d("2024-01-28")));
        assert!(task.contains_date(d("2024-02-01")));
        assert!(task.contains_date(d("2024-02-03")));
        assert!(!task.contains_date(d("2024-01-27")));
        assert!(!task.contains_date(d("2024-02-04")));

        assert_eq!(
            task.months(),
            vec![MonthKey::new(2024, 1).unwrap(), MonthKey::new(2024, 2).unwrap()]
        );
    }

    #[test]
    fn test_task_visibility() {
        let task = create_test_task();
        assert!(task.visible_to("alice"));
        assert!(!task.visible_to("carol"));

        let mut unassigned = create_test_task();
        unassigned.executor_ids.clear();
        assert!(unassigned.visible_to("carol"));
    }

    #[test]
    fn test_all_executors_completed() {
        let mut task = create_test_task();
        assert!(!task.all_executors_completed());

        task.executor_statuses[0].status = TaskStatus::Completed;
        assert!(!task.all_executors_completed());

        task.executor_statuses[1].status = TaskStatus::Completed;
        assert!(task.all_executors_completed());

        // An unassigned task never auto-completes
        task.executor_ids.clear();
        assert!(!task.all_executors_completed());
    }

    #[test]
    fn test_weekly_recurrence_matches_monday_zero_weekdays() {
        // 2024-01-01 is a Monday
        let weekly = Recurrence::Weekly {
            week_days: vec![0, 2],
        };
        assert!(weekly.matches(d("2024-01-01"))); // Monday
        assert!(!weekly.matches(d("2024-01-02"))); // Tuesday
        assert!(weekly.matches(d("2024-01-03"))); // Wednesday
        assert!(!weekly.matches(d("2024-01-07"))); // Sunday

        let sunday_only = Recurrence::Weekly { week_days: vec![6] };
        assert!(sunday_only.matches(d("2024-01-07")));
    }

    #[test]
    fn test_monthly_recurrence_matches_days_of_month() {
        let monthly = Recurrence::Monthly {
            month_days: vec![1, 15],
        };
        assert!(monthly.matches(d("2024-04-01")));
        assert!(monthly.matches(d("2024-04-15")));
        assert!(!monthly.matches(d("2024-04-16")));
    }

    #[test]
    fn test_is_due_respects_window_and_activity() {
        let mut rule = create_test_rule(Recurrence::Daily);
        rule.end_date = Some(d("2024-01-31"));

        assert!(rule.is_due(d("2024-01-01")));
        assert!(!rule.is_due(d("2023-12-31"))); // before window
        assert!(!rule.is_due(d("2024-02-01"))); // after window

        rule.is_active = false;
        assert!(!rule.is_due(d("2024-01-15")));
    }

    #[test]
    fn test_is_due_last_generated_guard() {
        let mut rule = create_test_rule(Recurrence::Daily);
        rule.last_generated_date = Some(d("2024-01-10"));

        assert!(!rule.is_due(d("2024-01-09")));
        assert!(!rule.is_due(d("2024-01-10")));
        assert!(rule.is_due(d("2024-01-11")));
    }

    #[test]
    fn test_is_due_repeat_budget() {
        let mut rule = create_test_rule(Recurrence::Daily);
        rule.max_repeat_count = Some(2);
        rule.current_repeat_count = 1;
        assert!(rule.is_due(d("2024-01-05")));
        assert!(!rule.is_exhausted());

        rule.current_repeat_count = 2;
        assert!(!rule.is_due(d("2024-01-05")));
        assert!(rule.is_exhausted());

        // A zero cap means unbounded
        rule.max_repeat_count = Some(0);
        assert!(rule.is_due(d("2024-01-05")));
        assert!(!rule.is_exhausted());
    }

    #[test]
    fn test_recurrence_payload_validation() {
        let empty_weekly = Recurrence::Weekly {
            week_days: Vec::new(),
        };
        assert!(empty_weekly.validate().is_err());

        let bad_weekday = Recurrence::Weekly { week_days: vec![7] };
        assert!(bad_weekday.validate().is_err());

        let bad_month_day = Recurrence::Monthly {
            month_days: vec![0],
        };
        assert!(bad_month_day.validate().is_err());

        let ok = Recurrence::Monthly {
            month_days: vec![1, 31],
        };
        assert!(ok.validate().is_ok());
    }

    #[test]
    fn test_rule_wire_shape_carries_only_matching_payload() {
        let weekly = create_test_rule(Recurrence::Weekly {
            week_days: vec![0, 2],
        });
        let value = serde_json::to_value(&weekly).unwrap();
        assert_eq!(value["periodicType"], "weekly");
        assert_eq!(value["weekDays"], serde_json::json!([0, 2]));
        assert!(value.get("monthDays").is_none());
        assert_eq!(value["startDate"], "2024-01-01");

        let daily = create_test_rule(Recurrence::Daily);
        let value = serde_json::to_value(&daily).unwrap();
        assert_eq!(value["periodicType"], "daily");
        assert!(value.get("weekDays").is_none());
        assert!(value.get("monthDays").is_none());
    }

    #[test]
    fn test_task_wire_shape_uses_camel_case_dates() {
        let task = create_test_task();
        let value = serde_json::to_value(&task).unwrap();
        assert_eq!(value["startDate"], "2024-01-28");
        assert_eq!(value["endDate"], "2024-02-03");
        assert_eq!(value["status"], "pending");
        assert_eq!(value["executorIds"], serde_json::json!(["alice", "bob"]));
        assert!(value.get("periodicTaskId").is_none());

        let round_trip: TodoTask = serde_json::from_value(value).unwrap();
        assert_eq!(round_trip, task);
    }

    #[test]
    fn test_task_status_parsing() {
        assert_eq!("pending".parse::<TaskStatus>().unwrap(), TaskStatus::Pending);
        assert_eq!(
            "Completed".parse::<TaskStatus>().unwrap(),
            TaskStatus::Completed
        );
        assert!("done".parse::<TaskStatus>().is_err());
        assert_eq!(TaskStatus::Completed.with_icon(), "✓ Completed");
    }

    #[test]
    fn test_update_task_status_validation() {
        let params = UpdateTask {
            id: 1,
            status: Some("finished".to_string()),
            ..Default::default()
        };
        assert!(params.validate_status().is_err());

        let params = UpdateTask {
            id: 1,
            status: Some("completed".to_string()),
            ..Default::default()
        };
        assert_eq!(
            params.validate_status().unwrap(),
            Some(TaskStatus::Completed)
        );
    }

    #[test]
    fn test_create_rule_recurrence_validation() {
        let mut params = CreateRule {
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
        };
        assert!(params.validate_recurrence().is_ok());

        params.week_days.clear();
        assert!(params.validate_recurrence().is_err());

        params.periodic_type = "yearly".to_string();
        assert!(params.validate_recurrence().is_err());
    }
}
