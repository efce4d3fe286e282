// SPDX-License-Identifier: MIT
// Copyright 2026 Clestiq Shield Authors

//! Shared helpers for parsing and formatting backend timestamps.

use chrono::{DateTime, NaiveDateTime, Utc};

/// Parse a backend timestamp.
///
/// Accepts RFC3339 as well as the offset-less ISO 8601 form the API emits
/// for naive UTC columns (`2026-01-05T10:00:00.123456`).
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}

/// Format a timestamp as a short date (`Jan 5, 2026`), or `-` when unparseable.
pub fn format_date(raw: &str) -> String {
    parse_timestamp(raw)
        .map(|dt| dt.format("%b %-d, %Y").to_string())
        .unwrap_or_else(|| "-".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_rfc3339_and_naive() {
        let with_offset = parse_timestamp("2026-01-05T10:00:00Z").unwrap();
        let naive = parse_timestamp("2026-01-05T10:00:00.250000").unwrap();
        assert_eq!(with_offset.timestamp(), naive.timestamp());
        assert!(parse_timestamp("yesterday").is_none());
    }

    #[test]
    fn test_format_date() {
        assert_eq!(format_date("2026-01-05T10:00:00+02:00"), "Jan 5, 2026");
        assert_eq!(format_date(""), "-");
    }
}
