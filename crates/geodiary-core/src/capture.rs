//! The capture pipeline: one sensor reading to one validated point.

use std::time::Duration;

use tracing::{debug, warn};

use geodiary_types::{Point, now_timestamp_ms};

use crate::error::CaptureError;
use crate::sensor::LocationSensor;

/// Bounded wait for one position fix.
pub const CAPTURE_TIMEOUT: Duration = Duration::from_secs(10);

/// Drives one location acquisition and normalizes the result.
///
/// Each call to [`LocationCapture::capture`] requests exactly one fresh fix
/// (no cached positions) and suspends the caller until the sensor responds
/// or the timeout elapses. Concurrent `capture` calls are not coordinated
/// here; a caller that must not overlap requests serializes them itself.
pub struct LocationCapture<S: LocationSensor> {
    sensor: S,
    timeout: Duration,
}

impl<S: LocationSensor> LocationCapture<S> {
    /// Wrap a sensor with the default 10-second bounded wait.
    pub fn new(sensor: S) -> Self {
        Self::with_timeout(sensor, CAPTURE_TIMEOUT)
    }

    /// Wrap a sensor with a custom bounded wait.
    pub fn with_timeout(sensor: S, timeout: Duration) -> Self {
        Self { sensor, timeout }
    }

    /// Acquire one reading and build a validated [`Point`].
    ///
    /// The point's timestamp is the capture instant (taken here, not from
    /// the sensor); accuracy is carried through when the sensor reports one.
    ///
    /// # Errors
    ///
    /// One of the [`CaptureError`] variants; none are retried automatically.
    pub async fn capture(&self) -> Result<Point, CaptureError> {
        if !self.sensor.is_supported() {
            return Err(CaptureError::Unsupported);
        }

        let fix = tokio::time::timeout(self.timeout, self.sensor.current_fix())
            .await
            .map_err(|_| {
                warn!("No fix within {:?}", self.timeout);
                CaptureError::Timeout {
                    duration: self.timeout,
                }
            })??;

        let point = Point::new(now_timestamp_ms(), fix.latitude, fix.longitude, fix.accuracy)
            .map_err(|e| CaptureError::PositionUnavailable(e.to_string()))?;

        debug!(
            "Captured ({:.5}, {:.5}) accuracy {:?}",
            point.latitude, point.longitude, point.accuracy
        );
        Ok(point)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockSensor;
    use crate::sensor::SensorFix;

    #[tokio::test]
    async fn capture_builds_point_with_capture_time() {
        let sensor = MockSensor::new(35.6812, 139.7671);
        let capture = LocationCapture::new(sensor);

        let before = now_timestamp_ms();
        let point = capture.capture().await.unwrap();
        let after = now_timestamp_ms();

        assert_eq!(point.latitude, 35.6812);
        assert_eq!(point.longitude, 139.7671);
        assert_eq!(point.accuracy, Some(10.0));
        assert!(point.timestamp >= before && point.timestamp <= after);
    }

    #[tokio::test]
    async fn unsupported_sensor_is_rejected_before_requesting() {
        let sensor = MockSensor::new(0.0, 0.0);
        sensor.set_supported(false);
        let capture = LocationCapture::new(sensor);

        let err = capture.capture().await.unwrap_err();
        assert!(matches!(err, CaptureError::Unsupported));
    }

    #[tokio::test]
    async fn sensor_failure_passes_through() {
        let sensor = MockSensor::new(0.0, 0.0);
        sensor.fail_with(CaptureError::PermissionDenied).await;
        let capture = LocationCapture::new(sensor);

        let err = capture.capture().await.unwrap_err();
        assert!(matches!(err, CaptureError::PermissionDenied));
    }

    #[tokio::test]
    async fn slow_sensor_times_out() {
        let sensor = MockSensor::new(0.0, 0.0);
        sensor.set_latency(Duration::from_millis(200));
        let capture = LocationCapture::with_timeout(sensor, Duration::from_millis(10));

        let err = capture.capture().await.unwrap_err();
        assert!(matches!(err, CaptureError::Timeout { .. }));
    }

    #[tokio::test]
    async fn out_of_domain_fix_is_position_unavailable() {
        let sensor = MockSensor::new(0.0, 0.0);
        sensor
            .set_fix(SensorFix {
                latitude: 95.0,
                longitude: 0.0,
                accuracy: None,
            })
            .await;
        let capture = LocationCapture::new(sensor);

        let err = capture.capture().await.unwrap_err();
        assert!(matches!(err, CaptureError::PositionUnavailable(_)));
    }

    #[tokio::test]
    async fn fix_without_accuracy_yields_absent_accuracy() {
        let sensor = MockSensor::new(1.0, 2.0);
        sensor
            .set_fix(SensorFix {
                latitude: 1.0,
                longitude: 2.0,
                accuracy: None,
            })
            .await;
        let capture = LocationCapture::new(sensor);

        let point = capture.capture().await.unwrap();
        assert_eq!(point.accuracy, None);
    }
}
