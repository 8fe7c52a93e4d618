//! Record command - capture the current location into the queue.

use std::time::Duration;

use anyhow::{Context, Result};

use geodiary_core::{CAPTURE_TIMEOUT, CaptureError, CommandSensor, LocationCapture};
use geodiary_store::Store;

use crate::config::Config;
use crate::format::format_point_line;

/// Execute the record command.
pub async fn cmd_record(sensor_command: Option<String>, config: &Config) -> Result<()> {
    let command_line = sensor_command
        .or_else(|| config.resolve_sensor_command())
        .unwrap_or_default();
    let sensor = CommandSensor::new(&command_line);

    let timeout = config
        .timeout
        .map(Duration::from_secs)
        .unwrap_or(CAPTURE_TIMEOUT);
    let capture = LocationCapture::with_timeout(sensor, timeout);

    println!("Acquiring current position...");
    let point = match capture.capture().await {
        Ok(point) => point,
        Err(e) => {
            print_capture_hint(&e);
            return Err(e.into());
        }
    };

    let store = Store::open_default().context("Failed to open database")?;
    store.append(&point)?;
    let len = store.len()?;

    println!("Saved: {}", format_point_line(len - 1, &point));
    println!("{} location(s) queued.", len);
    Ok(())
}

fn print_capture_hint(error: &CaptureError) {
    match error {
        CaptureError::Unsupported => eprintln!(
            "Hint: set sensor_command in {} (or GEODIARY_SENSOR_COMMAND) to a helper \
             that prints a JSON position, e.g. 'termux-location' or 'CoreLocationCLI -json'.",
            Config::path().display()
        ),
        CaptureError::PermissionDenied => {
            eprintln!("Hint: grant the sensor helper access to location services.");
        }
        _ => {}
    }
}
