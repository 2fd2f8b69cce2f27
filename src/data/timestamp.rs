//! Timestamp parsing with per-cell coercion.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

const DATETIME_FORMATS: [&str; 9] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%Y/%m/%d %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
    "%d.%m.%Y %H:%M:%S",
];

const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];

/// Parse a timestamp cell. Returns `None` for anything unrecognized.
///
/// Values carrying a UTC offset keep their local wall-clock time, so the
/// calendar date is the one written in the file.
pub fn parse_timestamp(text: &str) -> Option<NaiveDateTime> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.naive_local());
    }
    if let Ok(dt) = DateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S%.f%:z") {
        return Some(dt.naive_local());
    }

    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(text, fmt).ok())
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd_hms(y: i32, m: u32, d: u32, h: u32, mi: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, mi, s)
            .unwrap()
    }

    #[test]
    fn parses_iso_variants() {
        let expected = ymd_hms(2024, 1, 1, 8, 0, 0);
        assert_eq!(parse_timestamp("2024-01-01T08:00:00"), Some(expected));
        assert_eq!(parse_timestamp("2024-01-01 08:00:00"), Some(expected));
        assert_eq!(parse_timestamp("2024-01-01 08:00"), Some(expected));
        assert_eq!(parse_timestamp(" 2024-01-01T08:00:00.000 "), Some(expected));
    }

    #[test]
    fn offsets_keep_wall_clock_date() {
        assert_eq!(
            parse_timestamp("2024-01-01T23:30:00-05:00"),
            Some(ymd_hms(2024, 1, 1, 23, 30, 0))
        );
    }

    #[test]
    fn date_only_is_midnight() {
        assert_eq!(
            parse_timestamp("2024-03-05"),
            Some(ymd_hms(2024, 3, 5, 0, 0, 0))
        );
        assert_eq!(
            parse_timestamp("03/05/2024"),
            Some(ymd_hms(2024, 3, 5, 0, 0, 0))
        );
    }

    #[test]
    fn garbage_is_coerced_to_none() {
        assert_eq!(parse_timestamp("not-a-date"), None);
        assert_eq!(parse_timestamp(""), None);
        assert_eq!(parse_timestamp("2024-13-45"), None);
    }
}
