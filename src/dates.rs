// src/dates.rs
use chrono::{DateTime, NaiveDate, NaiveDateTime};

// Timestamp layouts tried in order after RFC 3339
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Parses a hit date string into a comparable timestamp.
///
/// Plain calendar dates map to midnight. RFC 3339 timestamps keep their
/// wall-clock time and drop the offset so that all hits compare on the same scale.
pub fn parse_hit_date(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0);
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.naive_local());
    }

    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
}

/// Whole days from `from` to `to`, truncated toward zero
pub fn day_gap(from: NaiveDateTime, to: NaiveDateTime) -> i64 {
    (to - from).num_days()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn test_parse_plain_date() {
        let dt = parse_hit_date("2000-01-05").unwrap();
        assert_eq!((dt.year(), dt.month(), dt.day()), (2000, 1, 5));
        assert_eq!(dt.hour(), 0);
    }

    #[test]
    fn test_parse_timestamps() {
        let dt = parse_hit_date("1783-07-14T12:30:00").unwrap();
        assert_eq!((dt.year(), dt.hour(), dt.minute()), (1783, 12, 30));

        let dt = parse_hit_date(" 1801-02-03 04:05:06 ").unwrap();
        assert_eq!((dt.year(), dt.month(), dt.second()), (1801, 2, 6));

        let dt = parse_hit_date("2005-06-01T23:00:00+02:00").unwrap();
        assert_eq!((dt.day(), dt.hour()), (1, 23));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(parse_hit_date("").is_none());
        assert!(parse_hit_date("not a date").is_none());
        assert!(parse_hit_date("2000-13-01").is_none());
    }

    #[test]
    fn test_day_gap_truncates() {
        let a = parse_hit_date("2000-01-01").unwrap();
        let b = parse_hit_date("2000-01-11T23:59:59").unwrap();
        assert_eq!(day_gap(a, b), 10);
        assert_eq!(day_gap(b, a), -10);
        assert_eq!(day_gap(a, a), 0);
    }
}
