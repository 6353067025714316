use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::cli::{GenerateCommands, RuleCommands, TaskCommands};

/// Main command-line interface for the Hearth family task tracker
///
/// Hearth keeps a household's tasks on a shared calendar: one-off tasks
/// with a date span and assignees, plus recurring chore rules (daily,
/// weekly, monthly) that materialize concrete tasks on their scheduled
/// days. Running with no command shows today's agenda.
#[derive(Parser)]
#[command(version, about, name = "hearth")]
pub struct Args {
    /// Path to the SQLite database file. Defaults to
    /// $XDG_DATA_HOME/hearth/hearth.db
    #[arg(long, global = true)]
    pub database_file: Option<PathBuf>,

    /// Disable colored output and use plain text
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands for the Hearth CLI
///
/// The CLI is organized into three main command categories:
/// - `task`: Operations on concrete task instances (create, query, complete)
/// - `rule`: Operations on recurring chore rules
/// - `generate`: Triggers that materialize scheduled tasks
#[derive(Subcommand)]
pub enum Commands {
    /// Manage tasks
    #[command(alias = "t")]
    Task {
        #[command(subcommand)]
        command: TaskCommands,
    },
    /// Manage recurring chore rules
    #[command(alias = "r")]
    Rule {
        #[command(subcommand)]
        command: RuleCommands,
    },
    /// Materialize scheduled tasks
    #[command(alias = "g")]
    Generate {
        #[command(subcommand)]
        command: GenerateCommands,
    },
}
