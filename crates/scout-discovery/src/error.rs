//! Error types for discovery operations
//!
//! Only construction of a pipeline can fail with these errors in a way that
//! stops a scan. Source failures and lookup misses are downgraded to
//! skip/reject records at the boundary where they happen.

use thiserror::Error;

/// Discovery specific errors
#[derive(Debug, Error)]
pub enum ScoutError {
    /// API request failed
    #[error("API error: {0}")]
    ApiError(String),

    /// Token is not a valid ticker symbol
    #[error("Invalid symbol: {0}")]
    InvalidSymbol(String),

    /// Rate limit exceeded for API
    #[error("Rate limit exceeded for {provider}")]
    RateLimitExceeded {
        provider: String,
    },

    /// Call did not finish in time
    #[error("{operation} timed out after {millis}ms")]
    Timeout {
        operation: String,
        millis: u128,
    },

    /// Network or HTTP error
    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    /// JSON parsing error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Feed document could not be parsed
    #[error("Feed parse error: {0}")]
    FeedParseError(String),

    /// Yahoo Finance API error
    #[error("Yahoo Finance error: {0}")]
    YahooFinanceError(String),

    /// Alpha Vantage API error
    #[error("Alpha Vantage error: {0}")]
    AlphaVantageError(String),

    /// Social search API error
    #[error("Social search error: {0}")]
    SocialSearchError(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type alias for discovery operations
pub type Result<T> = std::result::Result<T, ScoutError>;

/// Convert config file loading failures to ScoutError
impl From<scout_utils::UtilsError> for ScoutError {
    fn from(err: scout_utils::UtilsError) -> Self {
        ScoutError::ConfigError(err.to_string())
    }
}

/// Convert ScoutError to the tool boundary error
impl From<ScoutError> for scout_tools::ToolError {
    fn from(err: ScoutError) -> Self {
        scout_tools::ToolError::ExecutionFailed(err.to_string())
    }
}
