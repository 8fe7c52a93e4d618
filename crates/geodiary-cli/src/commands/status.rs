//! Status command - device identity, queue length, configuration.

use anyhow::{Context, Result};

use geodiary_store::Store;

use crate::config::Config;

/// Execute the status command.
pub fn cmd_status(config: &Config) -> Result<()> {
    let store = Store::open_default().context("Failed to open database")?;

    println!("Device id:      {}", store.device_id()?);
    println!("Queued points:  {}", store.len()?);
    println!("Database:       {}", geodiary_store::default_db_path().display());
    println!("Config file:    {}", Config::path().display());

    match config.resolve_diary_api_url() {
        Some(url) => println!("Sync endpoint:  {}", url),
        None => println!("Sync endpoint:  (not configured)"),
    }
    match config.resolve_viewer_url() {
        Some(url) => println!("Viewer:         {}", url),
        None => println!("Viewer:         (not configured)"),
    }
    match config.resolve_sensor_command() {
        Some(command) => println!("Sensor command: {}", command),
        None => println!("Sensor command: (not configured)"),
    }

    Ok(())
}
