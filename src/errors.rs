//! Unified application error type.
//! All modules (db, core, api, cli) return AppError to keep the error
//! handling consistent and easy to manage.

use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    // ---------------------------
    // IO
    // ---------------------------
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    // ---------------------------
    // Database-related
    // ---------------------------
    #[error("Database error: {0}")]
    Db(#[from] rusqlite::Error),

    #[error("Database migration error: {0}")]
    Migration(String),

    // ---------------------------
    // Serialization
    // ---------------------------
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    // ---------------------------
    // Parsing errors
    // ---------------------------
    #[error("Invalid context id: {0:?}")]
    InvalidContext(String),

    #[error("Invalid time value: {0}")]
    InvalidTime(String),

    // ---------------------------
    // Attendance backend
    // ---------------------------
    #[error("Attendance service error: {0}")]
    Api(String),

    // ---------------------------
    // Clock state errors
    // ---------------------------
    #[error("A work session is already active for context {0}")]
    AlreadyActive(String),

    #[error("No active work session for context {0}")]
    NotActive(String),

    #[error("Clock already initialized for context {0}")]
    AlreadyInitialized(String),

    #[error("Clock not initialized for context {0}")]
    NotInitialized(String),

    #[error("Clock has been unmounted")]
    Unmounted,

    // ---------------------------
    // Config errors
    // ---------------------------
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to load configuration")]
    ConfigLoad,

    #[error("Failed to save configuration")]
    ConfigSave,

    // ---------------------------
    // Generic fallback
    // ---------------------------
    #[error("Internal error: {0}")]
    Other(String),
}

pub type AppResult<T> = Result<T, AppError>;
