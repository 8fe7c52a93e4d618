//! The core observation record and device identity types.

use std::fmt;

use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize};

use crate::error::{ParseError, ParseResult};
use crate::timestamp;

/// Opaque per-installation identifier.
///
/// Attributes every point and every sync request to one logical device
/// without user accounts. Generated once by the store and never regenerated
/// while the local state survives.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeviceId(String);

impl DeviceId {
    /// Wrap an existing identifier token.
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// The raw token.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One geolocation observation.
///
/// The serialized form matches the persisted queue entry shape:
/// `{timestamp, latitude, longitude, accuracy?}` with `timestamp` in integer
/// milliseconds since the Unix epoch (UTC). Decoding is tolerant of the
/// legacy shapes described in [`crate::normalize_timestamp_ms`] and of the
/// short `lat`/`lon` key aliases some revisions wrote.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// Instant of the sensor reading (not of upload), ms since epoch UTC.
    #[serde(deserialize_with = "de_timestamp_ms")]
    pub timestamp: i64,

    /// Latitude in degrees, domain [-90, 90].
    #[serde(alias = "lat")]
    pub latitude: f64,

    /// Longitude in degrees, domain [-180, 180].
    #[serde(alias = "lon")]
    pub longitude: f64,

    /// Sensor-reported radius in meters, absent when not reported.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accuracy: Option<f64>,
}

impl Point {
    /// Build a validated point.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::OutOfRange`] when a coordinate is non-finite or
    /// outside its domain, or when `accuracy` is present but negative or
    /// non-finite.
    pub fn new(
        timestamp: i64,
        latitude: f64,
        longitude: f64,
        accuracy: Option<f64>,
    ) -> ParseResult<Self> {
        let point = Self {
            timestamp,
            latitude,
            longitude,
            accuracy,
        };
        point.validate()?;
        Ok(point)
    }

    /// Check the stored-point invariant: finite coordinates in domain,
    /// accuracy absent or finite and non-negative.
    pub fn validate(&self) -> ParseResult<()> {
        if !self.latitude.is_finite() || !(-90.0..=90.0).contains(&self.latitude) {
            return Err(ParseError::OutOfRange {
                field: "latitude",
                value: self.latitude,
            });
        }
        if !self.longitude.is_finite() || !(-180.0..=180.0).contains(&self.longitude) {
            return Err(ParseError::OutOfRange {
                field: "longitude",
                value: self.longitude,
            });
        }
        if let Some(accuracy) = self.accuracy {
            if !accuracy.is_finite() || accuracy < 0.0 {
                return Err(ParseError::OutOfRange {
                    field: "accuracy",
                    value: accuracy,
                });
            }
        }
        Ok(())
    }
}

/// Deserialize a timestamp from any of the observed legacy shapes into
/// integer milliseconds.
fn de_timestamp_ms<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    struct TimestampVisitor;

    impl Visitor<'_> for TimestampVisitor {
        type Value = i64;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("an epoch number, a 13-digit string, or RFC 3339 text")
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<i64, E> {
            Ok(timestamp::ms_from_i64(v))
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<i64, E> {
            let v = i64::try_from(v).map_err(|_| E::custom("timestamp out of range"))?;
            Ok(timestamp::ms_from_i64(v))
        }

        fn visit_f64<E: de::Error>(self, v: f64) -> Result<i64, E> {
            timestamp::ms_from_f64(v).map_err(E::custom)
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<i64, E> {
            crate::normalize_timestamp_ms(v).map_err(E::custom)
        }
    }

    deserializer.deserialize_any(TimestampVisitor)
}
