//! Command definitions and handlers using clap's derive API.
//!
//! Argument structs here are thin wrappers over the core parameter types:
//! clap-specific attributes (flags, help text, defaults) stay on this
//! side, and each wrapper converts into its `hearth_core::params`
//! counterpart via `From`, keeping the core free of CLI concerns.

use anyhow::Result;
use clap::{Args, Subcommand};
use hearth_core::params::{
    CreateRule, CreateTask, GenerateForDate, GenerateRange, Id, SetExecutorStatus,
    TasksByExecutor, TasksByMonth, UpdateRule, UpdateTask,
};
use hearth_core::{
    CreateResult, DeleteResult, GenerateResult, OperationStatus, Rules, TaskStatus, Tasks,
    Tracker, UpdateResult,
};
use jiff::civil::Date;
use jiff::Zoned;

use crate::renderer::TerminalRenderer;

/// Command handlers bridging parsed arguments and the core tracker.
pub struct Cli {
    tracker: Tracker,
    renderer: TerminalRenderer,
}

/// Task subcommands
#[derive(Subcommand)]
pub enum TaskCommands {
    /// Add a new task
    #[command(alias = "a")]
    Add(AddTaskArgs),
    /// List every task, newest first
    #[command(alias = "ls")]
    List,
    /// Show one task in full
    Show(TaskIdArgs),
    /// Edit a task's fields
    Update(UpdateTaskArgs),
    /// Permanently delete a task and its attachments
    Delete(TaskIdArgs),
    /// Mark a task (or one member's share of it) completed
    Done(MemberStatusArgs),
    /// Put a task (or one member's share of it) back to pending
    Reopen(MemberStatusArgs),
    /// Tasks on a given day (defaults to today)
    Day(DayArgs),
    /// Tasks overlapping a given month
    Month(MonthArgs),
    /// Tasks visible to a family member
    For(ForMemberArgs),
}

/// Rule subcommands
#[derive(Subcommand)]
pub enum RuleCommands {
    /// Add a recurring chore rule
    #[command(alias = "a")]
    Add(AddRuleArgs),
    /// List every rule, newest first
    #[command(alias = "ls")]
    List,
    /// Show one rule in full
    Show(RuleIdArgs),
    /// Edit a rule's fields or schedule
    Update(UpdateRuleArgs),
    /// Permanently delete a rule (generated tasks are kept)
    Delete(RuleIdArgs),
    /// Let the rule fire again
    Enable(RuleIdArgs),
    /// Stop the rule from firing
    Disable(RuleIdArgs),
    /// Completion counts for the rule's generated tasks
    Stats(RuleIdArgs),
    /// List the tasks a rule has generated
    Tasks(RuleIdArgs),
}

/// Generation subcommands
#[derive(Subcommand)]
pub enum GenerateCommands {
    /// Catch the schedule up for today
    Today,
    /// Evaluate rules for one date
    Date(GenerateDateArgs),
    /// Backfill a date range, oldest day first
    Range(GenerateRangeArgs),
}

/// Add a new task to the calendar
#[derive(Args)]
pub struct AddTaskArgs {
    /// Title of the task
    pub title: String,
    /// First day of the task
    #[arg(long)]
    pub start: Date,
    /// Last day of the task; defaults to the start day
    #[arg(long)]
    pub end: Option<Date>,
    /// Family members responsible (repeatable); none means everyone
    #[arg(long = "executor")]
    pub executors: Vec<String>,
    /// One-line summary
    #[arg(short, long)]
    pub description: Option<String>,
    /// Long-form detail (markdown)
    #[arg(long)]
    pub detail: Option<String>,
}

impl From<AddTaskArgs> for CreateTask {
    fn from(val: AddTaskArgs) -> Self {
        CreateTask {
            title: val.title,
            start_date: val.start,
            end_date: val.end.unwrap_or(val.start),
            executor_ids: val.executors,
            description: val.description,
            detail: val.detail,
        }
    }
}

/// Identify a task by ID
#[derive(Args)]
pub struct TaskIdArgs {
    /// ID of the task
    pub id: u64,
}

impl From<TaskIdArgs> for Id {
    fn from(val: TaskIdArgs) -> Self {
        Id { id: val.id }
    }
}

/// Edit fields on an existing task
#[derive(Args)]
pub struct UpdateTaskArgs {
    /// ID of the task to update
    pub id: u64,
    /// New title
    #[arg(long)]
    pub title: Option<String>,
    /// New first day
    #[arg(long)]
    pub start: Option<Date>,
    /// New last day
    #[arg(long)]
    pub end: Option<Date>,
    /// Replace the assignee list (repeatable)
    #[arg(long = "executor")]
    pub executors: Vec<String>,
    /// New one-line summary
    #[arg(short, long)]
    pub description: Option<String>,
    /// New long-form detail
    #[arg(long)]
    pub detail: Option<String>,
}

impl From<UpdateTaskArgs> for UpdateTask {
    fn from(val: UpdateTaskArgs) -> Self {
        UpdateTask {
            id: val.id,
            title: val.title,
            start_date: val.start,
            end_date: val.end,
            executor_ids: if val.executors.is_empty() {
                None
            } else {
                Some(val.executors)
            },
            description: val.description,
            detail: val.detail,
            status: None,
        }
    }
}

/// Complete or reopen a task, optionally for one member only
#[derive(Args)]
pub struct MemberStatusArgs {
    /// ID of the task
    pub id: u64,
    /// Only change this family member's share
    #[arg(long)]
    pub member: Option<String>,
}

/// Tasks on a given day
#[derive(Args)]
pub struct DayArgs {
    /// Calendar date; defaults to today
    pub date: Option<Date>,
}

/// Tasks overlapping a given month
#[derive(Args)]
pub struct MonthArgs {
    pub year: i16,
    /// Month number 1-12
    pub month: i8,
}

impl From<MonthArgs> for TasksByMonth {
    fn from(val: MonthArgs) -> Self {
        TasksByMonth {
            year: val.year,
            month: val.month,
        }
    }
}

/// Tasks visible to one family member
#[derive(Args)]
pub struct ForMemberArgs {
    /// The family member
    pub member: String,
    /// Restrict to tasks spanning this date
    #[arg(long)]
    pub date: Option<Date>,
}

impl From<ForMemberArgs> for TasksByExecutor {
    fn from(val: ForMemberArgs) -> Self {
        TasksByExecutor {
            member_id: val.member,
            date: val.date,
        }
    }
}

/// Add a recurring chore rule
#[derive(Args)]
pub struct AddRuleArgs {
    /// Title copied into each generated task
    pub title: String,
    /// Schedule kind: daily, weekly, or monthly
    #[arg(long)]
    pub every: String,
    /// Weekday the rule fires on, 0=Monday..6=Sunday (repeatable)
    #[arg(long = "weekday")]
    pub weekdays: Vec<i8>,
    /// Day of the month the rule fires on, 1-31 (repeatable)
    #[arg(long = "monthday")]
    pub monthdays: Vec<i8>,
    /// Days each generated task spans
    #[arg(long, default_value_t = 1)]
    pub duration: i64,
    /// Family members responsible (repeatable)
    #[arg(long = "executor")]
    pub executors: Vec<String>,
    /// One-line summary copied into each generated task
    #[arg(short, long)]
    pub description: Option<String>,
    /// Long-form detail copied into each generated task
    #[arg(long)]
    pub detail: Option<String>,
    /// Stop after this many tasks have been generated
    #[arg(long)]
    pub max_repeats: Option<u32>,
    /// First date the rule may fire
    #[arg(long)]
    pub start: Date,
    /// Last date the rule may fire
    #[arg(long)]
    pub end: Option<Date>,
}

impl From<AddRuleArgs> for CreateRule {
    fn from(val: AddRuleArgs) -> Self {
        CreateRule {
            title: val.title,
            periodic_type: val.every,
            week_days: val.weekdays,
            month_days: val.monthdays,
            task_duration: val.duration,
            executor_ids: val.executors,
            description: val.description,
            detail: val.detail,
            max_repeat_count: val.max_repeats,
            start_date: val.start,
            end_date: val.end,
        }
    }
}

/// Identify a rule by ID
#[derive(Args)]
pub struct RuleIdArgs {
    /// ID of the rule
    pub id: u64,
}

impl From<RuleIdArgs> for Id {
    fn from(val: RuleIdArgs) -> Self {
        Id { id: val.id }
    }
}

/// Edit fields on an existing rule
#[derive(Args)]
pub struct UpdateRuleArgs {
    /// ID of the rule to update
    pub id: u64,
    /// New title
    #[arg(long)]
    pub title: Option<String>,
    /// New schedule kind; give --weekday/--monthday alongside it
    #[arg(long)]
    pub every: Option<String>,
    #[arg(long = "weekday")]
    pub weekdays: Vec<i8>,
    #[arg(long = "monthday")]
    pub monthdays: Vec<i8>,
    /// New instance duration in days
    #[arg(long)]
    pub duration: Option<i64>,
    /// Replace the assignee list (repeatable)
    #[arg(long = "executor")]
    pub executors: Vec<String>,
    #[arg(short, long)]
    pub description: Option<String>,
    #[arg(long)]
    pub detail: Option<String>,
    /// New repeat cap; 0 removes the bound
    #[arg(long)]
    pub max_repeats: Option<u32>,
    /// New first eligible date
    #[arg(long)]
    pub start: Option<Date>,
    /// New last eligible date
    #[arg(long)]
    pub end: Option<Date>,
}

impl From<UpdateRuleArgs> for UpdateRule {
    fn from(val: UpdateRuleArgs) -> Self {
        UpdateRule {
            id: val.id,
            title: val.title,
            periodic_type: val.every,
            week_days: val.weekdays,
            month_days: val.monthdays,
            task_duration: val.duration,
            executor_ids: if val.executors.is_empty() {
                None
            } else {
                Some(val.executors)
            },
            description: val.description,
            detail: val.detail,
            max_repeat_count: val.max_repeats,
            start_date: val.start,
            end_date: val.end,
            is_active: None,
        }
    }
}

/// Evaluate rules for one date
#[derive(Args)]
pub struct GenerateDateArgs {
    /// The target calendar date
    pub date: Date,
    /// Only evaluate this rule
    #[arg(long)]
    pub rule: Option<u64>,
}

/// Backfill a date range
#[derive(Args)]
pub struct GenerateRangeArgs {
    /// First date of the range
    pub start: Date,
    /// Last date of the range (inclusive)
    pub end: Date,
}

impl From<GenerateRangeArgs> for GenerateRange {
    fn from(val: GenerateRangeArgs) -> Self {
        GenerateRange {
            start_date: val.start,
            end_date: val.end,
        }
    }
}

impl Cli {
    /// Create a new command handler.
    pub fn new(tracker: Tracker, renderer: TerminalRenderer) -> Self {
        Self { tracker, renderer }
    }

    /// Today's agenda: generate due tasks, then show the day.
    pub async fn today(&self) -> Result<()> {
        let today = Zoned::now().date();
        let generated = self.tracker.generate_today().await?;
        if generated > 0 {
            self.renderer.render(&GenerateResult::new(generated).to_string());
        }
        let tasks = self.tracker.tasks_by_date(today).await?;
        self.renderer
            .render(&format!("# Today ({today})\n\n{}", Tasks(tasks)));
        Ok(())
    }

    /// Handle task subcommands.
    pub async fn handle_task_command(&self, command: TaskCommands) -> Result<()> {
        match command {
            TaskCommands::Add(args) => {
                let task = self.tracker.create_task(&args.into()).await?;
                self.renderer.render(&CreateResult::new(task).to_string());
            }
            TaskCommands::List => {
                let tasks = self.tracker.list_tasks().await?;
                self.renderer
                    .render(&format!("# All Tasks\n\n{}", Tasks(tasks)));
            }
            TaskCommands::Show(args) => match self.tracker.get_task(&args.into()).await? {
                Some(task) => self.renderer.render(&task.to_string()),
                None => self
                    .renderer
                    .render(&OperationStatus::failure("Task not found".to_string()).to_string()),
            },
            TaskCommands::Update(args) => {
                let task = self.tracker.update_task(args.into()).await?;
                self.renderer.render(&UpdateResult::new(task).to_string());
            }
            TaskCommands::Delete(args) => {
                let task = self.tracker.delete_task(&args.into()).await?;
                self.renderer.render(&DeleteResult::new(task).to_string());
            }
            TaskCommands::Done(args) => {
                self.set_status(args, TaskStatus::Completed).await?;
            }
            TaskCommands::Reopen(args) => {
                self.set_status(args, TaskStatus::Pending).await?;
            }
            TaskCommands::Day(args) => {
                let date = args.date.unwrap_or_else(|| Zoned::now().date());
                let tasks = self.tracker.tasks_by_date(date).await?;
                self.renderer
                    .render(&format!("# Tasks on {date}\n\n{}", Tasks(tasks)));
            }
            TaskCommands::Month(args) => {
                let params: TasksByMonth = args.into();
                let tasks = self.tracker.tasks_by_month(&params).await?;
                self.renderer.render(&format!(
                    "# Tasks in {:04}-{:02}\n\n{}",
                    params.year,
                    params.month,
                    Tasks(tasks)
                ));
            }
            TaskCommands::For(args) => {
                let params: TasksByExecutor = args.into();
                let tasks = self.tracker.tasks_by_executor(&params).await?;
                self.renderer.render(&format!(
                    "# Tasks for {}\n\n{}",
                    params.member_id,
                    Tasks(tasks)
                ));
            }
        }
        Ok(())
    }

    /// Handle rule subcommands.
    pub async fn handle_rule_command(&self, command: RuleCommands) -> Result<()> {
        match command {
            RuleCommands::Add(args) => {
                let rule = self.tracker.create_rule(&args.into()).await?;
                self.renderer.render(&CreateResult::new(rule).to_string());
            }
            RuleCommands::List => {
                let rules = self.tracker.list_rules().await?;
                self.renderer
                    .render(&format!("# Chore Rules\n\n{}", Rules(rules)));
            }
            RuleCommands::Show(args) => match self.tracker.get_rule(&args.into()).await? {
                Some(rule) => self.renderer.render(&rule.to_string()),
                None => self
                    .renderer
                    .render(&OperationStatus::failure("Rule not found".to_string()).to_string()),
            },
            RuleCommands::Update(args) => {
                let rule = self.tracker.update_rule(args.into()).await?;
                self.renderer.render(&UpdateResult::new(rule).to_string());
            }
            RuleCommands::Delete(args) => {
                let rule = self.tracker.delete_rule(&args.into()).await?;
                self.renderer.render(&DeleteResult::new(rule).to_string());
            }
            RuleCommands::Enable(args) => {
                let rule = self.tracker.set_rule_active(args.id, true).await?;
                self.renderer.render(
                    &OperationStatus::success(format!("Rule '{}' enabled", rule.title))
                        .to_string(),
                );
            }
            RuleCommands::Disable(args) => {
                let rule = self.tracker.set_rule_active(args.id, false).await?;
                self.renderer.render(
                    &OperationStatus::success(format!("Rule '{}' disabled", rule.title))
                        .to_string(),
                );
            }
            RuleCommands::Stats(args) => {
                let id: Id = args.into();
                let stats = self.tracker.rule_stats(&id).await?;
                self.renderer
                    .render(&format!("# Rule {} Stats\n\n{stats}", id.id));
            }
            RuleCommands::Tasks(args) => {
                let id: Id = args.into();
                let tasks = self.tracker.tasks_for_rule(&id).await?;
                self.renderer.render(&format!(
                    "# Tasks generated by rule {}\n\n{}",
                    id.id,
                    Tasks(tasks)
                ));
            }
        }
        Ok(())
    }

    /// Handle generation subcommands.
    pub async fn handle_generate_command(&self, command: GenerateCommands) -> Result<()> {
        match command {
            GenerateCommands::Today => {
                let generated = self.tracker.generate_today().await?;
                self.renderer
                    .render(&GenerateResult::new(generated).to_string());
            }
            GenerateCommands::Date(args) => {
                let generated = match args.rule {
                    Some(rule_id) => {
                        let fired = self
                            .tracker
                            .generate_for_date(&GenerateForDate {
                                id: rule_id,
                                date: args.date,
                            })
                            .await?;
                        u32::from(fired)
                    }
                    None => self.tracker.generate_all_for_date(args.date).await?,
                };
                self.renderer
                    .render(&GenerateResult::new(generated).to_string());
            }
            GenerateCommands::Range(args) => {
                let generated = self.tracker.generate_range(&args.into()).await?;
                self.renderer
                    .render(&GenerateResult::new(generated).to_string());
            }
        }
        Ok(())
    }

    async fn set_status(&self, args: MemberStatusArgs, status: TaskStatus) -> Result<()> {
        let task = match args.member {
            Some(member) => {
                self.tracker
                    .set_executor_status(&SetExecutorStatus {
                        id: args.id,
                        member_id: member,
                        status,
                    })
                    .await?
            }
            None => self.tracker.set_task_status(args.id, status).await?,
        };
        self.renderer.render(&UpdateResult::new(task).to_string());
        Ok(())
    }
}
