//! Yahoo Finance chart API client

use super::error::{ApiError, ApiResult};
use super::types::ChartResponse;
use super::MarketDataSource;
use crate::data::Bar;
use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::header::USER_AGENT;
use reqwest::{Client, StatusCode, Url};
use tracing::{debug, info};

/// Public chart endpoint host
pub const DEFAULT_BASE_URL: &str = "https://query1.finance.yahoo.com";

const USER_AGENT_VALUE: &str = "Mozilla/5.0 (compatible; stock-forecast/0.1)";

/// Yahoo Finance client for daily price history
#[derive(Debug, Clone)]
pub struct YahooClient {
    client: Client,
    base_url: String,
}

impl Default for YahooClient {
    fn default() -> Self {
        Self::new()
    }
}

impl YahooClient {
    /// Create a new client against the public endpoint
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    /// Create client with custom base URL (for proxies and mirrors)
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        // No request timeout: total time is bounded by the caller's retry policy
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Chart endpoint for `ticker`; the ticker is encoded as a single path segment
    fn chart_url(&self, ticker: &str, start: NaiveDate, end: NaiveDate) -> ApiResult<Url> {
        let period1 = start.and_hms_opt(0, 0, 0).map(|t| t.and_utc().timestamp()).unwrap_or(0);
        let period2 = end.and_hms_opt(0, 0, 0).map(|t| t.and_utc().timestamp()).unwrap_or(0);

        let mut url = Url::parse(&self.base_url)
            .map_err(|e| ApiError::Malformed(format!("invalid base URL {}: {}", self.base_url, e)))?;
        url.path_segments_mut()
            .map_err(|_| ApiError::Malformed(format!("base URL {} cannot hold a path", self.base_url)))?
            .pop_if_empty()
            .extend(["v8", "finance", "chart"])
            .push(ticker);
        url.query_pairs_mut()
            .append_pair("period1", &period1.to_string())
            .append_pair("period2", &period2.to_string())
            .append_pair("interval", "1d")
            .append_pair("events", "div,splits")
            .append_pair("includeAdjustedClose", "true");

        Ok(url)
    }

    /// Fetch daily bars for `[start, end)`
    ///
    /// An unknown symbol yields an empty vector rather than an error.
    pub async fn get_daily_bars(
        &self,
        ticker: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> ApiResult<Vec<Bar>> {
        if ticker.trim().is_empty() || start >= end {
            return Ok(Vec::new());
        }

        let url = self.chart_url(ticker, start, end)?;
        debug!("Fetching daily bars from: {}", url);

        let response = self
            .client
            .get(url)
            .header(USER_AGENT, USER_AGENT_VALUE)
            .send()
            .await?;
        let status = response.status();
        let body = response.text().await?;

        let parsed: ChartResponse = match serde_json::from_str(&body) {
            Ok(parsed) => parsed,
            Err(_) if status == StatusCode::NOT_FOUND => return Ok(Vec::new()),
            Err(_) if !status.is_success() => return Err(ApiError::Status(status.as_u16())),
            Err(e) => return Err(e.into()),
        };

        if let Some(err) = parsed.chart.error {
            if err.is_not_found() {
                return Ok(Vec::new());
            }
            return Err(ApiError::ChartError {
                code: err.code,
                description: err.description,
            });
        }

        let bars = match parsed.chart.result.and_then(|r| r.into_iter().next()) {
            Some(result) => result.into_bars()?,
            None => Vec::new(),
        };

        // The endpoint may include a bar for the current session past `end`
        let bars: Vec<Bar> = bars
            .into_iter()
            .filter(|b| b.date >= start && b.date < end)
            .collect();

        info!("Fetched {} daily bars for {}", bars.len(), ticker);
        Ok(bars)
    }
}

#[async_trait]
impl MarketDataSource for YahooClient {
    async fn daily_history(
        &self,
        ticker: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> ApiResult<Vec<Bar>> {
        self.get_daily_bars(ticker, start, end).await
    }
}
