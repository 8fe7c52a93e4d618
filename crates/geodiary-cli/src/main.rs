use anyhow::Result;
use clap::Parser;
use tracing::warn;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;
mod config;
mod format;

use cli::{Cli, Commands};
use config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    // When quiet mode is enabled, suppress info-level logging
    let filter = if cli.quiet {
        EnvFilter::new("warn")
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = Config::load();

    // Surface a missing endpoint at startup rather than on first sync.
    if config.resolve_diary_api_url().is_none() {
        warn!(
            "No API URL configured; 'geodiary sync' will fail until api_url is set in {} or GEODIARY_API_URL",
            Config::path().display()
        );
    }

    match cli.command {
        Commands::Record { sensor_command } => commands::cmd_record(sensor_command, &config).await,
        Commands::List { format } => commands::cmd_list(format),
        Commands::Delete { index } => commands::cmd_delete(index),
        Commands::Clear => commands::cmd_clear(),
        Commands::Sync { mode } => commands::cmd_sync(mode, &config).await,
        Commands::Link { date } => commands::cmd_link(date, &config),
        Commands::Status => commands::cmd_status(&config),
    }
}
