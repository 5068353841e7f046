//! Error types for tool execution

use thiserror::Error;

/// Result type alias for tool execution
pub type Result<T> = std::result::Result<T, ToolError>;

/// Error type for tool operations
#[derive(Error, Debug)]
pub enum ToolError {
    /// Input did not match the tool's schema
    #[error("Invalid parameters: {0}")]
    InvalidParameters(String),

    /// Tool ran but could not produce output
    #[error("Tool execution failed: {0}")]
    ExecutionFailed(String),

    /// No tool registered under this name
    #[error("Tool not found: {0}")]
    NotFound(String),
}
