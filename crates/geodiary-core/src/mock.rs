//! Mock sensor implementation for testing.
//!
//! Provides a [`MockSensor`] that can be used for unit testing without a
//! real location source, with failure injection and latency simulation.

use std::sync::atomic::{AtomicBool, AtomicU32, AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::CaptureError;
use crate::sensor::{LocationSensor, SensorFix};

/// A mock location sensor for testing.
///
/// # Example
///
/// ```
/// use geodiary_core::{LocationSensor, MockSensor};
///
/// #[tokio::main]
/// async fn main() {
///     let sensor = MockSensor::new(35.6812, 139.7671);
///     let fix = sensor.current_fix().await.unwrap();
///     assert_eq!(fix.latitude, 35.6812);
/// }
/// ```
pub struct MockSensor {
    fix: RwLock<SensorFix>,
    supported: AtomicBool,
    fail_with: RwLock<Option<CaptureError>>,
    /// Simulated acquisition latency in milliseconds (0 = no delay).
    latency_ms: AtomicU64,
    fix_count: AtomicU32,
}

impl MockSensor {
    /// Create a mock sensor that reports the given coordinates.
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            fix: RwLock::new(SensorFix {
                latitude,
                longitude,
                accuracy: Some(10.0),
            }),
            supported: AtomicBool::new(true),
            fail_with: RwLock::new(None),
            latency_ms: AtomicU64::new(0),
            fix_count: AtomicU32::new(0),
        }
    }

    /// Replace the reported fix.
    pub async fn set_fix(&self, fix: SensorFix) {
        *self.fix.write().await = fix;
    }

    /// Make every acquisition fail with the given error.
    pub async fn fail_with(&self, error: CaptureError) {
        *self.fail_with.write().await = Some(error);
    }

    /// Clear an injected failure.
    pub async fn clear_failure(&self) {
        *self.fail_with.write().await = None;
    }

    /// Report the sensor as unsupported.
    pub fn set_supported(&self, supported: bool) {
        self.supported.store(supported, Ordering::Relaxed);
    }

    /// Delay every acquisition by the given duration.
    pub fn set_latency(&self, latency: Duration) {
        self.latency_ms
            .store(latency.as_millis() as u64, Ordering::Relaxed);
    }

    /// How many fixes have been served.
    pub fn fix_count(&self) -> u32 {
        self.fix_count.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl LocationSensor for MockSensor {
    fn is_supported(&self) -> bool {
        self.supported.load(Ordering::Relaxed)
    }

    async fn current_fix(&self) -> Result<SensorFix, CaptureError> {
        let latency = self.latency_ms.load(Ordering::Relaxed);
        if latency > 0 {
            tokio::time::sleep(Duration::from_millis(latency)).await;
        }

        if let Some(error) = self.fail_with.read().await.clone() {
            return Err(error);
        }

        self.fix_count.fetch_add(1, Ordering::Relaxed);
        Ok(self.fix.read().await.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn serves_configured_fix() {
        let sensor = MockSensor::new(1.0, 2.0);
        let fix = sensor.current_fix().await.unwrap();
        assert_eq!(fix.latitude, 1.0);
        assert_eq!(fix.longitude, 2.0);
        assert_eq!(sensor.fix_count(), 1);
    }

    #[tokio::test]
    async fn injected_failure_is_returned() {
        let sensor = MockSensor::new(1.0, 2.0);
        sensor.fail_with(CaptureError::PermissionDenied).await;

        let err = sensor.current_fix().await.unwrap_err();
        assert!(matches!(err, CaptureError::PermissionDenied));
        assert_eq!(sensor.fix_count(), 0);

        sensor.clear_failure().await;
        assert!(sensor.current_fix().await.is_ok());
    }
}
