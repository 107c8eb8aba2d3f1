use crate::models::event::AttendanceEvent;
use crate::models::event_type::EventType;
use crate::utils::time::seconds_between;
use chrono::{DateTime, Utc};

#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub start: DateTime<Utc>,
    pub end: Option<DateTime<Utc>>,
    pub duration_seconds: u64,
}

#[derive(Debug, Default, Clone)]
pub struct Timeline {
    pub sessions: Vec<Session>,
    pub closed_seconds: u64,
}

impl Timeline {
    /// The session still open at the end of the day, if any.
    pub fn open_session(&self) -> Option<&Session> {
        self.sessions.last().filter(|s| s.end.is_none())
    }
}

/// Pair a day's events into sessions.
///
/// IN followed by OUT is a closed session. An IN with no OUT after it is an
/// open session (only the last one counts as running). OUT events with no IN
/// before them are ignored.
pub fn build_timeline(events: &[AttendanceEvent]) -> Timeline {
    if events.is_empty() {
        return Timeline::default();
    }

    let mut sorted = events.to_vec();
    sorted.sort_by_key(|e| (e.ts, e.id));

    let mut sessions = Vec::new();
    let mut total = 0;
    let mut i = 0;

    while i < sorted.len() {
        let ev = &sorted[i];

        if ev.kind.is_in() {
            if let Some(next) = sorted.get(i + 1)
                && next.kind == EventType::Out
            {
                let duration = seconds_between(ev.ts, next.ts);
                total += duration;
                sessions.push(Session {
                    start: ev.ts,
                    end: Some(next.ts),
                    duration_seconds: duration,
                });
                i += 2;
                continue;
            }

            sessions.push(Session {
                start: ev.ts,
                end: None,
                duration_seconds: 0,
            });
        }

        i += 1;
    }

    Timeline {
        sessions,
        closed_seconds: total,
    }
}
