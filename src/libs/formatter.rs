//! Timestamp and number formatting shared by the store, views and reports.

use chrono::{Local, NaiveDateTime};

/// Minute-resolution format used for every timestamp column.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Format used in snapshot file names.
pub const FILE_STAMP_FORMAT: &str = "%Y-%m-%d_%H-%M-%S";

pub fn now_stamp() -> String {
    Local::now().format(TIMESTAMP_FORMAT).to_string()
}

/// Parses stored timestamps, tolerating the seconds and `T` separator
/// variants written by older stores.
pub fn parse_stamp(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    [TIMESTAMP_FORMAT, "%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
}

/// `YYYY-MM` bucket of a stored timestamp.
pub fn month_key(value: &str) -> Option<String> {
    parse_stamp(value).map(|stamp| stamp.format("%Y-%m").to_string())
}

pub fn format_hours(hours: Option<f64>) -> String {
    match hours {
        Some(hours) if hours.fract() == 0.0 => format!("{:.0}", hours),
        Some(hours) => format!("{:.1}", hours),
        None => "N/A".to_string(),
    }
}

pub fn or_placeholder(value: &Option<String>, placeholder: &str) -> String {
    match value.as_deref().map(str::trim) {
        Some(text) if !text.is_empty() => text.to_string(),
        _ => placeholder.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_minute_and_second_stamps() {
        assert!(parse_stamp("2024-03-01 10:15").is_some());
        assert!(parse_stamp("2024-03-01 10:15:42").is_some());
        assert!(parse_stamp("Fecha Antigua").is_none());
    }

    #[test]
    fn month_key_buckets_by_month() {
        assert_eq!(month_key("2024-03-01 10:15").as_deref(), Some("2024-03"));
    }

    #[test]
    fn hours_keep_one_decimal() {
        assert_eq!(format_hours(Some(4.0)), "4");
        assert_eq!(format_hours(Some(7.5)), "7.5");
        assert_eq!(format_hours(None), "N/A");
    }
}
