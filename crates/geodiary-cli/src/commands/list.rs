//! List command - show the queued locations.

use anyhow::{Context, Result};

use geodiary_store::Store;

use crate::cli::OutputFormat;
use crate::format::format_point_line;

/// Execute the list command.
pub fn cmd_list(format: OutputFormat) -> Result<()> {
    let store = Store::open_default().context("Failed to open database")?;
    let points = store.all()?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&points)?);
        }
        OutputFormat::Text => {
            if points.is_empty() {
                println!("No locations recorded yet.");
                return Ok(());
            }
            for (index, point) in points.iter().enumerate() {
                println!("{}", format_point_line(index, point));
            }
            println!();
            println!("{} location(s) queued.", points.len());
        }
    }

    Ok(())
}
