//! Timestamp normalization.
//!
//! Every application writes dates its own way. These helpers turn them into
//! a single comparable instant, [`DateTime<Utc>`]. Exports without a zone
//! (Telegram `date`, WhatsApp, Signal) are read as UTC wall-clock time, so
//! records from one file stay comparable with each other.

use chrono::{DateTime, NaiveDateTime, Utc};

use crate::error::{ChatmapError, Result};

/// Parses a Unix timestamp in seconds, as Telegram writes it (`"1705314600"`).
pub fn parse_unix_timestamp(input: &str) -> Result<DateTime<Utc>> {
    input
        .trim()
        .parse::<i64>()
        .ok()
        .and_then(|ts| DateTime::from_timestamp(ts, 0))
        .ok_or_else(|| ChatmapError::malformed_timestamp(input))
}

/// Parses an ISO 8601 date-time.
///
/// Accepts RFC 3339 with an offset as well as the naive
/// `2024-01-15T10:30:00` form found in Telegram exports.
pub fn parse_iso_datetime(input: &str) -> Result<DateTime<Utc>> {
    let trimmed = input.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(dt.with_timezone(&Utc));
    }
    parse_with_formats(trimmed, &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"])
}

/// Parses `2024-01-15 10:30` or `2024-01-15 10:30:45` (Signal exports).
pub fn parse_signal_datetime(input: &str) -> Result<DateTime<Utc>> {
    parse_with_formats(input.trim(), &["%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M"])
}

/// Tries each chrono format string in order and returns the first match.
pub fn parse_with_formats(input: &str, formats: &[&str]) -> Result<DateTime<Utc>> {
    formats
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(input, format).ok())
        .map(|naive| naive.and_utc())
        .ok_or_else(|| ChatmapError::malformed_timestamp(input))
}

/// Absolute distance between two instants in milliseconds.
pub fn distance_millis(a: DateTime<Utc>, b: DateTime<Utc>) -> u64 {
    (a - b).num_milliseconds().unsigned_abs()
}
