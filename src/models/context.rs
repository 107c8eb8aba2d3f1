use crate::errors::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Scope a work session belongs to (usually the selected team).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ContextId(String);

impl ContextId {
    pub fn new(raw: &str) -> AppResult<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.chars().any(char::is_whitespace) {
            return Err(AppError::InvalidContext(raw.to_string()));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Key under which the session marker for this context is persisted.
    pub fn marker_key(&self) -> String {
        format!("work_session:{}", self.0)
    }
}

impl TryFrom<String> for ContextId {
    type Error = AppError;

    fn try_from(value: String) -> AppResult<Self> {
        ContextId::new(&value)
    }
}

impl From<ContextId> for String {
    fn from(value: ContextId) -> Self {
        value.0
    }
}

impl fmt::Display for ContextId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
