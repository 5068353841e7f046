//! Error types for shared utilities

use thiserror::Error;

/// Result type alias for utility operations
pub type Result<T> = std::result::Result<T, UtilsError>;

/// Errors raised while loading or interpolating configuration
#[derive(Error, Debug)]
pub enum UtilsError {
    /// Referenced environment variable is not set
    #[error("Environment variable not found: {0}")]
    EnvVarNotFound(String),

    /// Config file could not be read
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Config file is not valid JSON for the target type
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
