//! Retrying fetcher
//!
//! Wraps a [`MarketDataSource`] with a fixed-delay retry policy and the
//! fixed history window used by the pipeline.

use crate::api::MarketDataSource;
use crate::data::RawSeries;
use crate::error::{PipelineError, PipelineResult};
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{info, warn};

/// Fixed-delay retry policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryPolicy {
    /// Total attempts, including the first one
    pub max_attempts: u32,
    /// Wait between consecutive attempts; identical every time
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            delay: Duration::from_secs(5),
        }
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            delay,
        }
    }
}

/// Calendar window of history to request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchWindow {
    pub start: NaiveDate,
    /// Exclusive end; `None` means today (UTC) at the time of the request
    pub end: Option<NaiveDate>,
}

impl Default for FetchWindow {
    fn default() -> Self {
        Self {
            start: default_start_date(),
            end: None,
        }
    }
}

impl FetchWindow {
    pub fn end_date(&self) -> NaiveDate {
        self.end.unwrap_or_else(|| Utc::now().date_naive())
    }
}

/// First day of the default history window
pub fn default_start_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2023, 1, 1).unwrap_or(NaiveDate::MIN)
}

/// Fetches a ticker's history, retrying failed requests
pub struct Fetcher<S> {
    source: S,
    policy: RetryPolicy,
    window: FetchWindow,
}

impl<S: MarketDataSource> Fetcher<S> {
    /// Create a fetcher with the default policy and window
    pub fn new(source: S) -> Self {
        Self {
            source,
            policy: RetryPolicy::default(),
            window: FetchWindow::default(),
        }
    }

    pub fn with_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_window(mut self, window: FetchWindow) -> Self {
        self.window = window;
        self
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Fetch the full window for `ticker`.
    ///
    /// An empty response is `NotFound` and is not retried. Any error is
    /// retried after `policy.delay` until `policy.max_attempts` is reached,
    /// then reported as `FetchFailed`.
    pub async fn fetch(&self, ticker: &str) -> PipelineResult<RawSeries> {
        let start = self.window.start;
        let end = self.window.end_date();
        let max_attempts = self.policy.max_attempts.max(1);
        let mut last_error = String::new();

        for attempt in 1..=max_attempts {
            match self.source.daily_history(ticker, start, end).await {
                Ok(bars) if bars.is_empty() => {
                    info!("No data for {} between {} and {}", ticker, start, end);
                    return Err(PipelineError::NotFound {
                        ticker: ticker.to_string(),
                    });
                }
                Ok(bars) => {
                    info!("Fetched {} bars for {} (attempt {})", bars.len(), ticker, attempt);
                    return Ok(RawSeries::new(ticker, bars));
                }
                Err(e) => {
                    warn!(
                        "Fetch attempt {}/{} for {} failed: {}",
                        attempt, max_attempts, ticker, e
                    );
                    last_error = e.to_string();
                    if attempt < max_attempts {
                        tokio::time::sleep(self.policy.delay).await;
                    }
                }
            }
        }

        Err(PipelineError::FetchFailed {
            ticker: ticker.to_string(),
            attempts: max_attempts,
            last_error,
        })
    }
}
