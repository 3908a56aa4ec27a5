//! kinlist CLI application
//!
//! Command-line front end for the kinlist social to-do core.

mod args;
mod cli;
mod renderer;

use anyhow::{Context, Result};
use args::{Args, Commands};
use clap::Parser;
use cli::Cli;
use kinlist_core::HubBuilder;
use log::info;
use renderer::{OutputMode, TerminalRenderer};

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let Args {
        database_file,
        no_color,
        json,
        acting_as,
        command,
    } = Args::parse();

    let hub = HubBuilder::new()
        .with_database_path(database_file)
        .build()
        .await
        .context("Failed to open the kinlist database")?;

    let renderer = TerminalRenderer::new(OutputMode::from_flags(json, no_color));
    let cli = Cli::new(hub, renderer, acting_as);

    info!("kinlist started");

    match command {
        Some(Commands::User { command }) => cli.handle_user_command(command).await,
        Some(Commands::Friend { command }) => cli.handle_friend_command(command).await,
        Some(Commands::Perm { command }) => cli.handle_perm_command(command).await,
        Some(Commands::Pin { command }) => cli.handle_pin_command(command).await,
        Some(Commands::Task { command }) => cli.handle_task_command(command).await,
        Some(Commands::Audit { repair }) => cli.audit(repair).await,
        Some(Commands::Dashboard) | None => cli.show_dashboard().await,
    }
}
