//! Market data API module
//!
//! Provides the `MarketDataSource` seam and an async Yahoo Finance client
//! for fetching daily price history.

mod client;
mod error;
mod types;

pub use client::{YahooClient, DEFAULT_BASE_URL};
pub use error::{ApiError, ApiResult};
pub use types::{ChartErrorBody, ChartResponse, ChartResult};

use crate::data::Bar;
use async_trait::async_trait;
use chrono::NaiveDate;

/// Source of daily price history
#[async_trait]
pub trait MarketDataSource: Send + Sync {
    /// Daily bars for `ticker` in `[start, end)`.
    ///
    /// An empty vector means the ticker is unknown or has no data in range.
    async fn daily_history(
        &self,
        ticker: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> ApiResult<Vec<Bar>>;
}
