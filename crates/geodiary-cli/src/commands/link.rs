//! Link command - print the viewer deep link.

use anyhow::{Context, Result, bail};
use time::macros::format_description;

use geodiary_core::viewer_link;
use geodiary_store::Store;

use crate::config::Config;

/// Execute the link command.
pub fn cmd_link(date: Option<String>, config: &Config) -> Result<()> {
    let store = Store::open_default().context("Failed to open database")?;
    let device_id = store.device_id()?;
    let base = config.resolve_viewer_url().unwrap_or_default();

    // Representative date: explicit flag, else the newest queued point,
    // else today (inside viewer_link).
    let reference_ms = match date {
        Some(text) => Some(parse_date_ms(&text)?),
        None => store.all()?.last().map(|point| point.timestamp),
    };

    match viewer_link(&base, &device_id, reference_ms) {
        Some(link) => {
            println!("{link}");
            Ok(())
        }
        None => bail!(
            "No viewer URL configured; set viewer_url in {} or GEODIARY_VIEWER_URL",
            Config::path().display()
        ),
    }
}

/// Parse `YYYY-MM-DD` as midnight UTC of that day, in epoch milliseconds.
fn parse_date_ms(text: &str) -> Result<i64> {
    let format = format_description!("[year]-[month]-[day]");
    let date = time::Date::parse(text, &format)
        .with_context(|| format!("Invalid date '{}', expected YYYY-MM-DD", text))?;
    Ok(date.midnight().assume_utc().unix_timestamp() * 1000)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_calendar_date_as_utc_midnight() {
        assert_eq!(parse_date_ms("2024-03-01").unwrap(), 1_709_251_200_000);
    }

    #[test]
    fn rejects_malformed_date() {
        assert!(parse_date_ms("03/01/2024").is_err());
        assert!(parse_date_ms("2024-13-01").is_err());
    }
}
