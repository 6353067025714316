//! Hearth CLI Application
//!
//! Command-line interface for the Hearth family task tracker.

mod args;
mod cli;
mod renderer;

use anyhow::{Context, Result};
use args::{Args, Commands};
use clap::Parser;
use cli::Cli;
use hearth_core::TrackerBuilder;
use log::info;
use renderer::TerminalRenderer;
use Commands::*;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let Args {
        database_file,
        no_color,
        command,
    } = Args::parse();

    let tracker = TrackerBuilder::new()
        .with_database_path(database_file)
        .build()
        .await
        .context("Failed to initialize tracker")?;

    let renderer = TerminalRenderer::new(!no_color);

    info!("Hearth started");

    match command {
        Some(Task { command }) => {
            Cli::new(tracker, renderer)
                .handle_task_command(command)
                .await
        }
        Some(Rule { command }) => {
            Cli::new(tracker, renderer)
                .handle_rule_command(command)
                .await
        }
        Some(Generate { command }) => {
            Cli::new(tracker, renderer)
                .handle_generate_command(command)
                .await
        }
        None => Cli::new(tracker, renderer).today().await,
    }
}
