//! Error types for the schedule engine
//!
//! Constraint violations found by the validator are not errors in this
//! sense; they are reported as data in a `ValidationReport`.

use thiserror::Error;

/// Result type for schedule operations
pub type Result<T> = std::result::Result<T, ScheduleError>;

/// Schedule engine errors
#[derive(Error, Debug)]
pub enum ScheduleError {
    #[error("Duplicate session ID in catalog: {id}")]
    DuplicateSessionId { id: String },

    #[error("Invalid venue layout: {0}")]
    InvalidLayout(String),

    #[error("Version not found: {version}")]
    VersionNotFound { version: u64 },

    #[error("Corrupt version history: {0}")]
    CorruptHistory(String),

    #[error("No SCHEDULE_SWAP marker found in issue body")]
    MissingSwapMarker,

    #[error("Could not find schedule JSON in issue body")]
    SwapScheduleNotFound,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(#[from] config_crate::ConfigError),

    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),
}
