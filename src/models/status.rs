use serde::Serialize;

/// Payload broadcast to status subscribers whenever the clock changes state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkStatus {
    pub total_seconds: u64,
    pub is_active: bool,
}
