//! Attendance payloads exchanged with the attendance backend.
//!
//! Totals may arrive either as whole seconds or as fractional hours, and
//! backends are not always careful about types: numeric fields accept JSON
//! numbers or numeric strings, anything else deserializes as absent.

use crate::utils::time::{hours_to_seconds, parse_instant, sanitize_seconds, seconds_to_hours};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Today's attendance record for one context.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceRecord {
    #[serde(default, deserialize_with = "lenient_number")]
    pub accumulated_seconds: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub accumulated_hours: Option<f64>,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default, deserialize_with = "lenient_instant")]
    pub active_session_start_time: Option<DateTime<Utc>>,
}

impl AttendanceRecord {
    pub fn from_seconds(
        seconds: u64,
        is_active: bool,
        start: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            accumulated_seconds: Some(seconds as f64),
            accumulated_hours: Some(seconds_to_hours(seconds)),
            is_active,
            active_session_start_time: start,
        }
    }

    /// Closed-session total in whole seconds, `None` when the server sent nothing usable.
    pub fn accumulated_total(&self) -> Option<u64> {
        resolve_total(self.accumulated_seconds, self.accumulated_hours)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckInReceipt {
    #[serde(default, deserialize_with = "lenient_instant")]
    pub active_session_start_time: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckOutReceipt {
    #[serde(default, deserialize_with = "lenient_number")]
    pub accumulated_seconds: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub accumulated_hours: Option<f64>,
}

impl CheckOutReceipt {
    pub fn from_seconds(seconds: u64) -> Self {
        Self {
            accumulated_seconds: Some(seconds as f64),
            accumulated_hours: Some(seconds_to_hours(seconds)),
        }
    }

    pub fn accumulated_total(&self) -> Option<u64> {
        resolve_total(self.accumulated_seconds, self.accumulated_hours)
    }
}

/// Seconds win over hours; a malformed seconds field falls back to hours.
fn resolve_total(seconds: Option<f64>, hours: Option<f64>) -> Option<u64> {
    seconds
        .and_then(sanitize_seconds)
        .or_else(|| hours.and_then(hours_to_seconds))
}

fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| match v {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }))
}

fn lenient_instant<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| match v {
        Value::String(s) => parse_instant(&s).ok(),
        _ => None,
    }))
}
