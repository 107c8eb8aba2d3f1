use super::{context::ContextId, event_type::EventType};
use chrono::{DateTime, Local, NaiveDate, Utc};
use serde::Serialize;

/// One check-in or check-out recorded by the local attendance backend.
#[derive(Debug, Clone, Serialize)]
pub struct AttendanceEvent {
    pub id: i64,
    pub context: ContextId,   // ⇔ attendance_events.context
    pub date: NaiveDate,      // ⇔ attendance_events.date (local day, "YYYY-MM-DD")
    pub ts: DateTime<Utc>,    // ⇔ attendance_events.ts (RFC 3339)
    pub kind: EventType,      // ⇔ attendance_events.kind ('in' | 'out')
    pub source: String,       // ⇔ attendance_events.source (default 'cli')
    pub created_at: String,   // ⇔ attendance_events.created_at (local RFC 3339)
}

impl AttendanceEvent {
    /// Event not yet stored (`id = 0`), dated on the local calendar day of `ts`.
    pub fn new(context: ContextId, ts: DateTime<Utc>, kind: EventType) -> Self {
        Self {
            id: 0,
            context,
            date: ts.with_timezone(&Local).date_naive(),
            ts,
            kind,
            source: "cli".to_string(),
            created_at: Local::now().to_rfc3339(),
        }
    }

    pub fn date_str(&self) -> String {
        self.date.format("%Y-%m-%d").to_string()
    }
}
