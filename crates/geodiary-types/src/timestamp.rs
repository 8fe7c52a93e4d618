//! Timestamp coercion at the ingestion boundary.
//!
//! The persisted queue and legacy sync payloads are loosely typed: the
//! `timestamp` field has been observed as a JSON number (seconds or
//! milliseconds), a numeric string, and ISO 8601 calendar text. Everything is
//! normalized once, here, into the canonical integer-millisecond epoch
//! representation.
//!
//! Coercion rule:
//! - numbers greater than 10^12 are millisecond epochs; smaller numbers are
//!   second epochs and are scaled by 1000;
//! - strings of exactly 13 ASCII digits are millisecond epochs;
//! - any other string is parsed as RFC 3339 calendar text;
//! - anything else is rejected.

use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

use crate::error::{ParseError, ParseResult};

/// Threshold separating second epochs from millisecond epochs.
const MS_EPOCH_THRESHOLD: i64 = 1_000_000_000_000;

/// Current instant as integer milliseconds since the Unix epoch (UTC).
pub fn now_timestamp_ms() -> i64 {
    let nanos = OffsetDateTime::now_utc().unix_timestamp_nanos();
    (nanos / 1_000_000) as i64
}

/// Coerce a numeric timestamp to milliseconds.
pub(crate) fn ms_from_i64(n: i64) -> i64 {
    // No abs(): it overflows on i64::MIN
    if n > MS_EPOCH_THRESHOLD || n < -MS_EPOCH_THRESHOLD {
        n
    } else {
        n.saturating_mul(1000)
    }
}

/// Coerce a floating-point timestamp to milliseconds.
pub(crate) fn ms_from_f64(n: f64) -> ParseResult<i64> {
    if !n.is_finite() {
        return Err(ParseError::InvalidTimestamp(n.to_string()));
    }
    Ok(ms_from_i64(n as i64))
}

/// Coerce a textual timestamp to milliseconds.
///
/// Strings of exactly 13 ASCII digits are taken verbatim as millisecond
/// epochs; everything else must be valid RFC 3339.
///
/// # Examples
///
/// ```
/// use geodiary_types::normalize_timestamp_ms;
///
/// assert_eq!(normalize_timestamp_ms("1709337000000").unwrap(), 1709337000000);
/// assert_eq!(
///     normalize_timestamp_ms("2024-03-01T23:50:00Z").unwrap(),
///     1709337000000
/// );
/// assert!(normalize_timestamp_ms("yesterday").is_err());
/// ```
pub fn normalize_timestamp_ms(text: &str) -> ParseResult<i64> {
    if text.len() == 13 && text.bytes().all(|b| b.is_ascii_digit()) {
        return text
            .parse::<i64>()
            .map_err(|_| ParseError::InvalidTimestamp(text.to_string()));
    }

    let parsed = OffsetDateTime::parse(text, &Rfc3339)
        .map_err(|_| ParseError::InvalidTimestamp(text.to_string()))?;
    Ok((parsed.unix_timestamp_nanos() / 1_000_000) as i64)
}

/// Render a millisecond epoch as RFC 3339 text (UTC).
///
/// This is the outbound wire form: points are persisted as integer
/// milliseconds but transmitted as calendar text.
pub fn rfc3339_from_ms(ms: i64) -> ParseResult<String> {
    let instant = OffsetDateTime::from_unix_timestamp_nanos(ms as i128 * 1_000_000)
        .map_err(|_| ParseError::InvalidTimestamp(ms.to_string()))?;
    instant
        .format(&Rfc3339)
        .map_err(|_| ParseError::InvalidTimestamp(ms.to_string()))
}
