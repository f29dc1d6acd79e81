//! Pipeline error types

use crate::models::ModelError;
use thiserror::Error;

/// Message shown to the user when a ticker yields nothing usable
pub const NO_DATA_MESSAGE: &str = "Company doesn't exist or no data available.";

/// Outcome of a failed pipeline request
#[derive(Error, Debug)]
pub enum PipelineError {
    /// The data source returned no rows for the ticker
    #[error("No data found for {ticker}")]
    NotFound { ticker: String },

    /// Every fetch attempt failed
    #[error("Fetching {ticker} failed after {attempts} attempts: {last_error}")]
    FetchFailed {
        ticker: String,
        attempts: u32,
        last_error: String,
    },

    /// Too few complete rows remained to build a training partition
    #[error("Not enough data for {ticker}: {rows} complete rows")]
    InsufficientData { ticker: String, rows: usize },

    /// Model fitting or prediction failed
    #[error("Model error: {0}")]
    Model(#[from] ModelError),
}

impl PipelineError {
    /// Text suitable for display to an end user
    pub fn user_message(&self) -> String {
        match self {
            PipelineError::NotFound { .. }
            | PipelineError::FetchFailed { .. }
            | PipelineError::InsufficientData { .. } => NO_DATA_MESSAGE.to_string(),
            PipelineError::Model(e) => format!("Prediction failed: {}", e),
        }
    }

    /// True for the "nothing to show for this ticker" family of errors
    pub fn is_no_data(&self) -> bool {
        !matches!(self, PipelineError::Model(_))
    }
}

/// Result type alias for pipeline operations
pub type PipelineResult<T> = Result<T, PipelineError>;
