//! Deep link into the external viewer application.

use time::{Date, OffsetDateTime};

use geodiary_types::DeviceId;

/// Derive the viewer deep link for a device and a representative date.
///
/// Produces `{base}/?deviceId={id}&date={YYYY-MM-DD}` where the date is the
/// UTC calendar date of `reference_ms` when given, else today's UTC date,
/// independent of the caller's local timezone. Pure: no I/O, no failure mode
/// beyond an absent base, which yields `None` ("viewer not configured").
///
/// # Examples
///
/// ```
/// use geodiary_core::viewer_link;
/// use geodiary_types::DeviceId;
///
/// let link = viewer_link(
///     "https://v.example",
///     &DeviceId::new("web-abc123"),
///     Some(1709337000000), // 2024-03-01T23:50:00Z
/// );
/// assert_eq!(
///     link.as_deref(),
///     Some("https://v.example/?deviceId=web-abc123&date=2024-03-01")
/// );
/// ```
pub fn viewer_link(base: &str, device_id: &DeviceId, reference_ms: Option<i64>) -> Option<String> {
    let base = base.trim().trim_end_matches('/');
    if base.is_empty() {
        return None;
    }

    let date = reference_date(reference_ms);
    Some(format!(
        "{}/?deviceId={}&date={:04}-{:02}-{:02}",
        base,
        device_id,
        date.year(),
        u8::from(date.month()),
        date.day()
    ))
}

/// UTC calendar date of the reference instant, today when absent or
/// unrepresentable.
fn reference_date(reference_ms: Option<i64>) -> Date {
    reference_ms
        .and_then(|ms| OffsetDateTime::from_unix_timestamp_nanos(ms as i128 * 1_000_000).ok())
        .unwrap_or_else(OffsetDateTime::now_utc)
        .date()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn device_id() -> DeviceId {
        DeviceId::new("web-abc123")
    }

    #[test]
    fn builds_link_with_reference_date_in_utc() {
        // 23:50 UTC on March 1st; in UTC+9 this is already March 2nd
        let link = viewer_link("https://v.example", &device_id(), Some(1_709_337_000_000));
        assert_eq!(
            link.as_deref(),
            Some("https://v.example/?deviceId=web-abc123&date=2024-03-01")
        );
    }

    #[test]
    fn empty_base_means_not_configured() {
        assert_eq!(viewer_link("", &device_id(), None), None);
        assert_eq!(viewer_link("   ", &device_id(), None), None);
    }

    #[test]
    fn trailing_slash_is_normalized() {
        let link = viewer_link("https://v.example/", &device_id(), Some(1_709_337_000_000));
        assert_eq!(
            link.as_deref(),
            Some("https://v.example/?deviceId=web-abc123&date=2024-03-01")
        );
    }

    #[test]
    fn absent_reference_uses_today() {
        let link = viewer_link("https://v.example", &device_id(), None).unwrap();
        let today = OffsetDateTime::now_utc().date();
        assert!(link.ends_with(&format!(
            "date={:04}-{:02}-{:02}",
            today.year(),
            u8::from(today.month()),
            today.day()
        )));
    }
}
