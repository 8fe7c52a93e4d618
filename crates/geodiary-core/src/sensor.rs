//! The seam over the platform location source.
//!
//! There is no portable desktop geolocation API, so the production sensor
//! shells out to a configurable helper command (`termux-location` on
//! Android/Termux, `CoreLocationCLI -json` on macOS, a GPSD wrapper, ...)
//! that prints one JSON position object. Tests use [`crate::MockSensor`].

use std::io::ErrorKind;
use std::process::Stdio;

use async_trait::async_trait;
use serde::Deserialize;
use tokio::process::Command;
use tracing::debug;

use crate::error::CaptureError;

/// One raw position fix as reported by the sensor, before it becomes a
/// validated [`geodiary_types::Point`].
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SensorFix {
    /// Latitude in degrees.
    #[serde(alias = "lat")]
    pub latitude: f64,

    /// Longitude in degrees.
    #[serde(alias = "lon")]
    pub longitude: f64,

    /// Reported radius in meters, when the source supplies one.
    #[serde(default)]
    pub accuracy: Option<f64>,
}

/// Trait abstracting the platform location source.
///
/// Implementations provide exactly one fresh fix per call; callers own the
/// bounded wait and any serialization of concurrent requests.
#[async_trait]
pub trait LocationSensor: Send + Sync {
    /// Whether a location capability exists at all.
    ///
    /// Checked before requesting; a `false` here surfaces as
    /// [`CaptureError::Unsupported`] without any acquisition attempt.
    fn is_supported(&self) -> bool;

    /// Acquire one fresh fix.
    async fn current_fix(&self) -> Result<SensorFix, CaptureError>;
}

/// Sensor backed by an external helper command printing one JSON object
/// of the form `{"latitude": .., "longitude": .., "accuracy"?: ..}`
/// (`lat`/`lon` accepted as aliases).
#[derive(Debug, Clone)]
pub struct CommandSensor {
    program: String,
    args: Vec<String>,
}

impl CommandSensor {
    /// Build from a whitespace-separated command line.
    pub fn new(command_line: &str) -> Self {
        let mut parts = command_line.split_whitespace().map(String::from);
        let program = parts.next().unwrap_or_default();
        Self {
            program,
            args: parts.collect(),
        }
    }
}

#[async_trait]
impl LocationSensor for CommandSensor {
    fn is_supported(&self) -> bool {
        !self.program.is_empty()
    }

    async fn current_fix(&self) -> Result<SensorFix, CaptureError> {
        debug!("Requesting fix from '{}'", self.program);

        let output = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|e| match e.kind() {
                ErrorKind::NotFound => CaptureError::Unsupported,
                ErrorKind::PermissionDenied => CaptureError::PermissionDenied,
                _ => CaptureError::PositionUnavailable(e.to_string()),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            if stderr.to_lowercase().contains("permission") {
                return Err(CaptureError::PermissionDenied);
            }
            return Err(CaptureError::PositionUnavailable(format!(
                "sensor command exited with {}: {}",
                output.status,
                stderr.trim()
            )));
        }

        serde_json::from_slice(&output.stdout)
            .map_err(|e| CaptureError::PositionUnavailable(format!("unreadable sensor output: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fix_decodes_short_keys_and_optional_accuracy() {
        let fix: SensorFix =
            serde_json::from_str(r#"{"lat": 35.6812, "lon": 139.7671}"#).unwrap();
        assert_eq!(fix.latitude, 35.6812);
        assert_eq!(fix.accuracy, None);

        let fix: SensorFix = serde_json::from_str(
            r#"{"latitude": 35.6812, "longitude": 139.7671, "accuracy": 12.0}"#,
        )
        .unwrap();
        assert_eq!(fix.accuracy, Some(12.0));
    }

    #[test]
    fn empty_command_is_unsupported() {
        let sensor = CommandSensor::new("   ");
        assert!(!sensor.is_supported());
    }

    #[test]
    fn command_line_is_split_into_program_and_args() {
        let sensor = CommandSensor::new("CoreLocationCLI -json -once");
        assert!(sensor.is_supported());
        assert_eq!(sensor.program, "CoreLocationCLI");
        assert_eq!(sensor.args, vec!["-json", "-once"]);
    }

    #[tokio::test]
    async fn missing_binary_maps_to_unsupported() {
        let sensor = CommandSensor::new("geodiary-no-such-sensor-binary");
        let err = sensor.current_fix().await.unwrap_err();
        assert!(matches!(err, CaptureError::Unsupported));
    }
}
