//! HTTP delivery of queued points to the configured remote target.
//!
//! One operation, three interchangeable delivery modes:
//!
//! - [`SyncMode::Single`] posts only the most recently captured point;
//! - [`SyncMode::Batch`] (the default) posts the whole queue in one
//!   enveloped request;
//! - [`SyncMode::Sequential`] posts one point at a time, strictly in order,
//!   continuing past individual failures.
//!
//! The client never touches the store. It reports what it submitted and
//! what settled; the caller hands that to
//! `Store::reconcile_after_sync`, which removes exactly the confirmed
//! points. Nothing is retried internally; retrying is re-invoking `sync`
//! with the still-queued subset.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde::Serialize;
use tracing::{debug, info, warn};

use geodiary_types::{DeviceId, Point, SyncOutcome, now_timestamp_ms, rfc3339_from_ms};

use crate::error::SyncError;

/// Bounded wait per HTTP attempt.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// How queued points are packaged into outbound requests.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SyncMode {
    /// Submit only the most recently captured point.
    Single,
    /// Submit the entire queue as one enveloped request.
    #[default]
    Batch,
    /// Submit one point per request, in order, surviving per-point failures.
    Sequential,
}

impl FromStr for SyncMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "single" => Ok(Self::Single),
            "batch" => Ok(Self::Batch),
            "sequential" => Ok(Self::Sequential),
            other => Err(format!(
                "unknown sync mode '{other}' (expected single, batch, or sequential)"
            )),
        }
    }
}

impl fmt::Display for SyncMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Single => f.write_str("single"),
            Self::Batch => f.write_str("batch"),
            Self::Sequential => f.write_str("sequential"),
        }
    }
}

/// What one sync attempt submitted and how it settled.
///
/// `submitted` is the exact ordered subset of the queue that went on the
/// wire (for single mode, just the newest point), which is what the store
/// needs alongside the outcome to reconcile correctly.
#[derive(Debug, Clone)]
pub struct SyncReport {
    /// The points that were submitted, in submission order.
    pub submitted: Vec<Point>,
    /// Per-request or per-point settlement.
    pub outcome: SyncOutcome,
}

/// Single-point wire shape: `{deviceId, timestamp, latitude, longitude, accuracy?}`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SinglePayload<'a> {
    device_id: &'a str,
    timestamp: String,
    latitude: f64,
    longitude: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    accuracy: Option<f64>,
}

/// Batch envelope wire shape: `{deviceId, diaryCreatedAt, locations: [...]}`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct BatchPayload<'a> {
    device_id: &'a str,
    diary_created_at: String,
    locations: Vec<WirePoint>,
}

/// One normalized point inside the batch envelope.
#[derive(Debug, Serialize)]
struct WirePoint {
    lat: f64,
    lon: f64,
    timestamp: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    accuracy: Option<f64>,
}

fn single_payload<'a>(device_id: &'a DeviceId, point: &Point) -> Result<SinglePayload<'a>, SyncError> {
    Ok(SinglePayload {
        device_id: device_id.as_str(),
        timestamp: rfc3339_from_ms(point.timestamp)?,
        latitude: point.latitude,
        longitude: point.longitude,
        accuracy: point.accuracy,
    })
}

fn batch_payload<'a>(device_id: &'a DeviceId, points: &[Point]) -> Result<BatchPayload<'a>, SyncError> {
    let locations = points
        .iter()
        .map(|point| {
            Ok(WirePoint {
                lat: point.latitude,
                lon: point.longitude,
                timestamp: rfc3339_from_ms(point.timestamp)?,
                accuracy: point.accuracy,
            })
        })
        .collect::<Result<Vec<_>, SyncError>>()?;

    Ok(BatchPayload {
        device_id: device_id.as_str(),
        diary_created_at: rfc3339_from_ms(now_timestamp_ms())?,
        locations,
    })
}

/// HTTP client for the remote sync endpoint.
///
/// `sync` takes `&mut self`: a second sync against the same client (and
/// therefore the same queue) cannot start while one is outstanding, which
/// is the ordering guarantee the sequential mode depends on.
#[derive(Debug)]
pub struct SyncClient {
    client: Client,
    endpoint: String,
    api_key: Option<String>,
    device_id: DeviceId,
}

impl SyncClient {
    /// Create a client for the configured endpoint.
    ///
    /// # Errors
    ///
    /// [`SyncError::EndpointNotConfigured`] for an empty endpoint and
    /// [`SyncError::InvalidEndpoint`] for a non-http(s) one, so a missing
    /// configuration surfaces before any capture work is wasted.
    pub fn new(
        endpoint: &str,
        api_key: Option<String>,
        device_id: DeviceId,
    ) -> Result<Self, SyncError> {
        let endpoint = endpoint.trim().trim_end_matches('/').to_string();
        if endpoint.is_empty() {
            return Err(SyncError::EndpointNotConfigured);
        }
        if !endpoint.starts_with("http://") && !endpoint.starts_with("https://") {
            return Err(SyncError::InvalidEndpoint(format!(
                "URL must start with http:// or https://, got: {endpoint}"
            )));
        }

        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;

        Ok(Self {
            client,
            endpoint,
            api_key: api_key.filter(|key| !key.is_empty()),
            device_id,
        })
    }

    /// The configured endpoint.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Deliver queued points under the given mode.
    ///
    /// `queue` is an oldest-first snapshot of the full queue; the report's
    /// `submitted` field says which of it actually went on the wire.
    ///
    /// # Errors
    ///
    /// [`SyncError::NothingToSync`] for an empty queue (before any network
    /// I/O); request-level failures for single and batch modes. Sequential
    /// mode absorbs per-point failures into the outcome and only errors on
    /// malformed input.
    pub async fn sync(&mut self, queue: &[Point], mode: SyncMode) -> Result<SyncReport, SyncError> {
        if queue.is_empty() {
            return Err(SyncError::NothingToSync);
        }

        info!("Syncing {} point(s) in {} mode", queue.len(), mode);
        match mode {
            SyncMode::Single => self.sync_single(queue).await,
            SyncMode::Batch => self.sync_batch(queue).await,
            SyncMode::Sequential => self.sync_sequential(queue).await,
        }
    }

    async fn sync_single(&self, queue: &[Point]) -> Result<SyncReport, SyncError> {
        // Most recently captured point only
        let point = queue[queue.len() - 1].clone();
        let payload = single_payload(&self.device_id, &point)?;

        let address = self.post(&payload).await?;
        Ok(SyncReport {
            submitted: vec![point],
            outcome: SyncOutcome::delivered(address),
        })
    }

    async fn sync_batch(&self, queue: &[Point]) -> Result<SyncReport, SyncError> {
        let payload = batch_payload(&self.device_id, queue)?;

        let address = self.post(&payload).await?;
        Ok(SyncReport {
            submitted: queue.to_vec(),
            outcome: SyncOutcome::delivered(address),
        })
    }

    async fn sync_sequential(&self, queue: &[Point]) -> Result<SyncReport, SyncError> {
        let mut delivered = Vec::with_capacity(queue.len());
        let mut address = None;

        for (index, point) in queue.iter().enumerate() {
            let payload = single_payload(&self.device_id, point)?;
            match self.post(&payload).await {
                Ok(returned) => {
                    delivered.push(true);
                    if returned.is_some() {
                        address = returned;
                    }
                }
                Err(e) => {
                    // Keep going; the failed point stays queued for retry.
                    warn!("Point {} of {} failed: {}", index + 1, queue.len(), e);
                    delivered.push(false);
                }
            }
        }

        Ok(SyncReport {
            submitted: queue.to_vec(),
            outcome: SyncOutcome::PerPoint { delivered, address },
        })
    }

    /// POST one JSON payload and extract the optional address metadata.
    async fn post<B: Serialize>(&self, payload: &B) -> Result<Option<String>, SyncError> {
        let mut request = self.client.post(&self.endpoint).json(payload);
        if let Some(key) = &self.api_key {
            request = request.header("x-api-key", key);
        }

        let response = request.send().await?;
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| SyncError::MalformedResponse(e.to_string()))?;

        let address = interpret_response(status, &body)?;
        debug!("Delivered, address metadata: {:?}", address);
        Ok(address)
    }
}

/// Interpret one settled response.
///
/// Any non-2xx status fails the request regardless of body, carrying the
/// server's `error` field when the body has one and the status line
/// otherwise. A 2xx body that is absent or not valid JSON is an empty
/// success payload; a JSON body may carry the `address` metadata.
fn interpret_response(status: StatusCode, body: &str) -> Result<Option<String>, SyncError> {
    if !status.is_success() {
        let message = serde_json::from_str::<serde_json::Value>(body)
            .ok()
            .and_then(|v| v.get("error").and_then(|e| e.as_str()).map(String::from))
            .unwrap_or_else(|| status.to_string());
        return Err(SyncError::HttpStatus {
            status: status.as_u16(),
            message,
        });
    }

    Ok(serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("address").and_then(|a| a.as_str()).map(String::from)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn device_id() -> DeviceId {
        DeviceId::new("web-abc123")
    }

    fn point(n: i64, accuracy: Option<f64>) -> Point {
        Point::new(1_709_337_000_000 + n * 1000, 35.6812, 139.7671, accuracy).unwrap()
    }

    #[test]
    fn client_requires_an_endpoint() {
        let result = SyncClient::new("", None, device_id());
        assert!(matches!(result, Err(SyncError::EndpointNotConfigured)));

        let result = SyncClient::new("   ", None, device_id());
        assert!(matches!(result, Err(SyncError::EndpointNotConfigured)));
    }

    #[test]
    fn client_rejects_non_http_endpoint() {
        let result = SyncClient::new("example.com/track", None, device_id());
        assert!(matches!(result, Err(SyncError::InvalidEndpoint(_))));
    }

    #[test]
    fn client_normalizes_trailing_slash() {
        let client = SyncClient::new("https://api.example/prod/track/", None, device_id()).unwrap();
        assert_eq!(client.endpoint(), "https://api.example/prod/track");
    }

    #[tokio::test]
    async fn empty_queue_is_rejected_before_any_request() {
        let mut client = SyncClient::new("https://api.example/track", None, device_id()).unwrap();
        let result = client.sync(&[], SyncMode::Batch).await;
        assert!(matches!(result, Err(SyncError::NothingToSync)));
    }

    #[test]
    fn single_payload_matches_wire_contract() {
        let device = device_id();
        let payload = single_payload(&device, &point(0, Some(8.0))).unwrap();
        let json = serde_json::to_value(&payload).unwrap();

        assert_eq!(json["deviceId"], "web-abc123");
        assert_eq!(json["latitude"], 35.6812);
        assert_eq!(json["longitude"], 139.7671);
        assert_eq!(json["accuracy"], 8.0);
        assert_eq!(json["timestamp"], "2024-03-01T23:50:00Z");
    }

    #[test]
    fn single_payload_omits_absent_accuracy() {
        let device = device_id();
        let payload = single_payload(&device, &point(0, None)).unwrap();
        let json = serde_json::to_value(&payload).unwrap();
        assert!(json.get("accuracy").is_none());
    }

    #[test]
    fn batch_payload_matches_wire_contract() {
        let points = vec![point(0, Some(8.0)), point(60, None)];
        let device = device_id();
        let payload = batch_payload(&device, &points).unwrap();
        let json = serde_json::to_value(&payload).unwrap();

        assert_eq!(json["deviceId"], "web-abc123");
        assert!(json["diaryCreatedAt"].is_string());

        let locations = json["locations"].as_array().unwrap();
        assert_eq!(locations.len(), 2);
        assert_eq!(locations[0]["lat"], 35.6812);
        assert_eq!(locations[0]["lon"], 139.7671);
        assert_eq!(locations[0]["timestamp"], "2024-03-01T23:50:00Z");
        assert_eq!(locations[0]["accuracy"], 8.0);
        assert_eq!(locations[1]["timestamp"], "2024-03-01T23:51:00Z");
        assert!(locations[1].get("accuracy").is_none());
    }

    #[test]
    fn batch_payload_preserves_queue_order() {
        let points: Vec<Point> = (0..5).map(|n| point(n, None)).collect();
        let device = device_id();
        let payload = batch_payload(&device, &points).unwrap();
        let json = serde_json::to_value(&payload).unwrap();

        let timestamps: Vec<&str> = json["locations"]
            .as_array()
            .unwrap()
            .iter()
            .map(|l| l["timestamp"].as_str().unwrap())
            .collect();
        let mut sorted = timestamps.clone();
        sorted.sort();
        assert_eq!(timestamps, sorted);
    }

    #[test]
    fn error_status_carries_server_message() {
        let err = interpret_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            r#"{"error": "locations table missing"}"#,
        )
        .unwrap_err();

        match err {
            SyncError::HttpStatus { status, message } => {
                assert_eq!(status, 500);
                assert_eq!(message, "locations table missing");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn error_status_without_body_falls_back_to_status_line() {
        let err = interpret_response(StatusCode::INTERNAL_SERVER_ERROR, "").unwrap_err();

        match err {
            SyncError::HttpStatus { status, message } => {
                assert_eq!(status, 500);
                assert!(message.contains("500"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn error_status_with_unrelated_json_falls_back_to_status_line() {
        let err = interpret_response(StatusCode::FORBIDDEN, r#"{"message": "no"}"#).unwrap_err();

        match err {
            SyncError::HttpStatus { status, message } => {
                assert_eq!(status, 403);
                assert!(message.contains("403"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn success_with_non_json_body_is_empty_success() {
        assert_eq!(interpret_response(StatusCode::OK, "OK").unwrap(), None);
        assert_eq!(interpret_response(StatusCode::OK, "").unwrap(), None);
    }

    #[test]
    fn success_extracts_address_metadata() {
        let address = interpret_response(StatusCode::OK, r#"{"address": "Tokyo"}"#).unwrap();
        assert_eq!(address.as_deref(), Some("Tokyo"));

        // Other 2xx statuses and extra fields are fine
        let address = interpret_response(
            StatusCode::CREATED,
            r#"{"stored": 3, "address": "Chiyoda, Tokyo"}"#,
        )
        .unwrap();
        assert_eq!(address.as_deref(), Some("Chiyoda, Tokyo"));
    }

    #[test]
    fn success_without_address_field_yields_none() {
        assert_eq!(
            interpret_response(StatusCode::OK, r#"{"stored": 3}"#).unwrap(),
            None
        );
    }

    #[test]
    fn mode_parses_from_str() {
        assert_eq!("single".parse::<SyncMode>().unwrap(), SyncMode::Single);
        assert_eq!("Batch".parse::<SyncMode>().unwrap(), SyncMode::Batch);
        assert_eq!(
            "sequential".parse::<SyncMode>().unwrap(),
            SyncMode::Sequential
        );
        assert!("broadcast".parse::<SyncMode>().is_err());
    }

    #[test]
    fn default_mode_is_batch() {
        assert_eq!(SyncMode::default(), SyncMode::Batch);
    }
}
