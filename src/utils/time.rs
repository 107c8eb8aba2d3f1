//! Time utilities: elapsed-time formatting, hours/seconds conversion, RFC 3339 parsing.

use crate::errors::{AppError, AppResult};
use chrono::{DateTime, Utc};

const SECONDS_PER_HOUR: f64 = 3600.0;

/// Largest server total accepted as a day's work (one week). Anything above is
/// treated as malformed.
pub const MAX_TOTAL_SECONDS: u64 = 7 * 24 * 3600;

/// Format a number of seconds as `H:MM:SS` (hours unpadded).
///
/// `format_elapsed(0)` → `"0:00:00"`, `format_elapsed(3661)` → `"1:01:01"`.
pub fn format_elapsed(total_seconds: u64) -> String {
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;
    format!("{}:{:02}:{:02}", hours, minutes, seconds)
}

/// Seconds elapsed from `start` to `now`, clamped at zero.
pub fn seconds_between(start: DateTime<Utc>, now: DateTime<Utc>) -> u64 {
    (now - start).num_seconds().max(0) as u64
}

/// Accept a raw server total in seconds: finite, non-negative and at most
/// [`MAX_TOTAL_SECONDS`], floored.
pub fn sanitize_seconds(raw: f64) -> Option<u64> {
    if raw.is_finite() && raw >= 0.0 && raw <= MAX_TOTAL_SECONDS as f64 {
        Some(raw.floor() as u64)
    } else {
        None
    }
}

/// Convert fractional hours to whole seconds.
///
/// The product is rounded to the millisecond first so that float noise
/// (e.g. `1.0169444 * 3600 = 3660.99984`) cannot cost a whole second.
pub fn hours_to_seconds(hours: f64) -> Option<u64> {
    if !hours.is_finite() || hours < 0.0 {
        return None;
    }
    let millis = (hours * SECONDS_PER_HOUR * 1000.0).round();
    sanitize_seconds(millis / 1000.0)
}

pub fn seconds_to_hours(seconds: u64) -> f64 {
    seconds as f64 / SECONDS_PER_HOUR
}

pub fn parse_instant(s: &str) -> AppResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s.trim())
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| AppError::InvalidTime(s.to_string()))
}
