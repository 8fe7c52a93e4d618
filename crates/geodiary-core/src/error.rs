//! Error types for geodiary-core.
//!
//! Capture and sync failures are recoverable: the worst outcome anywhere in
//! this crate is an unsynced queue, which stays intact for retry. Nothing
//! here is retried automatically; retry is a caller decision.

use std::time::Duration;

use thiserror::Error;

/// Errors that can occur when acquiring a position fix.
///
/// Each variant maps to a distinct user-facing message. None are retried
/// automatically.
#[derive(Debug, Clone, Error)]
#[non_exhaustive]
pub enum CaptureError {
    /// The platform has no location capability at all.
    #[error("location is not supported on this system (no sensor command configured or found)")]
    Unsupported,

    /// The location source refused access.
    #[error("location permission denied")]
    PermissionDenied,

    /// The source responded but could not produce a usable position.
    #[error("could not determine the current position: {0}")]
    PositionUnavailable(String),

    /// No fix arrived within the bounded wait.
    #[error("position request timed out after {duration:?}")]
    Timeout {
        /// How long the capture waited.
        duration: Duration,
    },
}

/// Errors that can occur when syncing queued points.
///
/// A request-level failure means nothing from that request was delivered;
/// the caller simply does not reconcile and the queue survives for retry.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SyncError {
    /// No remote endpoint is configured.
    #[error("no sync endpoint is configured")]
    EndpointNotConfigured,

    /// The configured endpoint is not an http(s) URL.
    #[error("invalid sync endpoint: {0}")]
    InvalidEndpoint(String),

    /// The queue was empty; rejected before any network I/O.
    #[error("nothing to sync: the queue is empty")]
    NothingToSync,

    /// Connection-level failure, no usable response.
    #[error("network failure: {0}")]
    Network(#[from] reqwest::Error),

    /// The server answered with a non-2xx status.
    #[error("server rejected the request: HTTP {status}: {message}")]
    HttpStatus {
        /// HTTP status code.
        status: u16,
        /// Server-supplied error message, or the status line.
        message: String,
    },

    /// A response whose body could not be read.
    #[error("malformed server response: {0}")]
    MalformedResponse(String),

    /// A queued point could not be rendered to the wire shape.
    #[error(transparent)]
    InvalidPoint(#[from] geodiary_types::ParseError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capture_errors_have_distinct_messages() {
        let messages = [
            CaptureError::Unsupported.to_string(),
            CaptureError::PermissionDenied.to_string(),
            CaptureError::PositionUnavailable("gps off".into()).to_string(),
            CaptureError::Timeout {
                duration: Duration::from_secs(10),
            }
            .to_string(),
        ];
        for (i, a) in messages.iter().enumerate() {
            for b in &messages[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn http_status_error_carries_code() {
        let err = SyncError::HttpStatus {
            status: 500,
            message: "Internal Server Error".into(),
        };
        assert!(err.to_string().contains("500"));
    }
}
