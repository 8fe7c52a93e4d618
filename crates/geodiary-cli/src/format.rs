//! Output formatting helpers.

use time::OffsetDateTime;

use geodiary_types::Point;

/// Render a millisecond epoch as `YYYY-MM-DD HH:MM:SS UTC`.
pub fn format_timestamp(ms: i64) -> String {
    match OffsetDateTime::from_unix_timestamp_nanos(ms as i128 * 1_000_000) {
        Ok(t) => format!(
            "{:04}-{:02}-{:02} {:02}:{:02}:{:02} UTC",
            t.year(),
            u8::from(t.month()),
            t.day(),
            t.hour(),
            t.minute(),
            t.second()
        ),
        Err(_) => format!("{ms} ms"),
    }
}

/// Render one queued point the way the web client's list view did:
/// timestamp, 5-decimal coordinates, rounded accuracy when present.
pub fn format_point_line(index: usize, point: &Point) -> String {
    let accuracy = match point.accuracy {
        Some(a) => format!(" (accuracy: {}m)", a.round() as i64),
        None => String::new(),
    };
    format!(
        "[{}] {} - lat: {:.5}, lon: {:.5}{}",
        index,
        format_timestamp(point.timestamp),
        point.latitude,
        point.longitude,
        accuracy
    )
}
