//! API error types

use thiserror::Error;

/// Errors that can occur when talking to the market-data service
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    #[error("JSON parsing failed: {0}")]
    JsonParseError(#[from] serde_json::Error),

    #[error("API returned error: {code} - {description}")]
    ChartError { code: String, description: String },

    #[error("HTTP status {0}")]
    Status(u16),

    #[error("Malformed response: {0}")]
    Malformed(String),
}

/// Result type alias for API operations
pub type ApiResult<T> = Result<T, ApiError>;
