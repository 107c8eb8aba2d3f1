use super::context::ContextId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Where the clock stands in the current work day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClockPhase {
    /// No open session.
    Idle,
    /// Open session, ticking.
    Running { started_at: DateTime<Utc> },
    /// Open session whose local clock was stopped by a check-out that is
    /// in flight or failed. Displays `frozen_seconds` until reconciled.
    Frozen {
        started_at: DateTime<Utc>,
        frozen_seconds: u64,
    },
}

impl ClockPhase {
    pub fn is_active(&self) -> bool {
        !matches!(self, ClockPhase::Idle)
    }

    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        match self {
            ClockPhase::Idle => None,
            ClockPhase::Running { started_at } | ClockPhase::Frozen { started_at, .. } => {
                Some(*started_at)
            }
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ClockPhase::Idle => "idle",
            ClockPhase::Running { .. } => "running",
            ClockPhase::Frozen { .. } => "pending check-out",
        }
    }
}

/// Snapshot of the clock's local view of today's work.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkSession {
    pub context: ContextId,
    pub accumulated_seconds: u64,
    pub is_active: bool,
    pub active_session_start: Option<DateTime<Utc>>,
}

/// Persisted "a session is active, started at T, for context C" marker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionMarker {
    pub context: ContextId,
    pub started_at: DateTime<Utc>,
}
