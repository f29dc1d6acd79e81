//! Type definitions for Yahoo Finance chart responses

use super::error::{ApiError, ApiResult};
use crate::data::Bar;
use chrono::DateTime;
use serde::Deserialize;

/// Top-level chart response
#[derive(Debug, Deserialize)]
pub struct ChartResponse {
    pub chart: Chart,
}

#[derive(Debug, Deserialize)]
pub struct Chart {
    pub result: Option<Vec<ChartResult>>,
    pub error: Option<ChartErrorBody>,
}

#[derive(Debug, Deserialize)]
pub struct ChartErrorBody {
    pub code: String,
    pub description: String,
}

impl ChartErrorBody {
    /// Yahoo's way of saying the symbol is unknown or has no rows in range
    pub fn is_not_found(&self) -> bool {
        self.code.eq_ignore_ascii_case("Not Found")
            || self.description.contains("No data found")
    }
}

#[derive(Debug, Deserialize)]
pub struct ChartResult {
    pub meta: ChartMeta,
    /// Bar open times, seconds since epoch. Absent when the range is empty.
    #[serde(default)]
    pub timestamp: Vec<i64>,
    pub indicators: Indicators,
}

#[derive(Debug, Deserialize)]
pub struct ChartMeta {
    pub symbol: String,
    /// Exchange offset from UTC in seconds
    #[serde(default)]
    pub gmtoffset: i64,
}

#[derive(Debug, Deserialize)]
pub struct Indicators {
    #[serde(default)]
    pub quote: Vec<Quote>,
    #[serde(default)]
    pub adjclose: Vec<AdjClose>,
}

/// Column arrays; `null` entries mark missing values
#[derive(Debug, Default, Deserialize)]
pub struct Quote {
    #[serde(default)]
    pub open: Vec<Option<f64>>,
    #[serde(default)]
    pub high: Vec<Option<f64>>,
    #[serde(default)]
    pub low: Vec<Option<f64>>,
    #[serde(default)]
    pub close: Vec<Option<f64>>,
    #[serde(default)]
    pub volume: Vec<Option<f64>>,
}

#[derive(Debug, Default, Deserialize)]
pub struct AdjClose {
    #[serde(default)]
    pub adjclose: Vec<Option<f64>>,
}

fn column(values: &[Option<f64>], i: usize) -> f64 {
    values.get(i).copied().flatten().unwrap_or(f64::NAN)
}

impl ChartResult {
    /// Convert column arrays into bars. Missing values become NaN.
    pub fn into_bars(self) -> ApiResult<Vec<Bar>> {
        let n = self.timestamp.len();
        if n == 0 {
            return Ok(Vec::new());
        }

        let quote = self.indicators.quote.into_iter().next().unwrap_or_default();
        let adj = self
            .indicators
            .adjclose
            .into_iter()
            .next()
            .unwrap_or_default();

        for (name, len) in [
            ("open", quote.open.len()),
            ("high", quote.high.len()),
            ("low", quote.low.len()),
            ("close", quote.close.len()),
            ("volume", quote.volume.len()),
        ] {
            if len != n {
                return Err(ApiError::Malformed(format!(
                    "{} has {} values for {} timestamps",
                    name, len, n
                )));
            }
        }

        let offset = self.meta.gmtoffset;
        let mut bars = Vec::with_capacity(n);

        for (i, &ts) in self.timestamp.iter().enumerate() {
            let date = DateTime::from_timestamp(ts + offset, 0)
                .ok_or_else(|| ApiError::Malformed(format!("bad timestamp {}", ts)))?
                .date_naive();

            bars.push(Bar {
                date,
                open: column(&quote.open, i),
                high: column(&quote.high, i),
                low: column(&quote.low, i),
                close: column(&quote.close, i),
                adj_close: column(&adj.adjclose, i),
                volume: column(&quote.volume, i),
            });
        }

        Ok(bars)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    const SAMPLE: &str = r#"{
        "chart": {
            "result": [{
                "meta": {"symbol": "AAPL", "gmtoffset": -18000},
                "timestamp": [1672756200, 1672842600],
                "indicators": {
                    "quote": [{
                        "open": [130.28, 126.89],
                        "high": [130.9, 128.66],
                        "low": [124.17, 125.08],
                        "close": [125.07, null],
                        "volume": [112117500, 89113600]
                    }],
                    "adjclose": [{"adjclose": [123.63, 124.9]}]
                }
            }],
            "error": null
        }
    }"#;

    #[test]
    fn test_parse_chart() {
        let response: ChartResponse = serde_json::from_str(SAMPLE).unwrap();
        let result = response.chart.result.unwrap().into_iter().next().unwrap();
        assert_eq!(result.meta.symbol, "AAPL");

        let bars = result.into_bars().unwrap();
        assert_eq!(bars.len(), 2);
        assert_eq!(bars[0].date, NaiveDate::from_ymd_opt(2023, 1, 3).unwrap());
        assert_eq!(bars[0].adj_close, 123.63);
        assert_eq!(bars[0].volume, 112117500.0);
        assert!(bars[1].close.is_nan());
    }

    #[test]
    fn test_parse_not_found() {
        let body = r#"{"chart":{"result":null,"error":{"code":"Not Found","description":"No data found, symbol may be delisted"}}}"#;
        let response: ChartResponse = serde_json::from_str(body).unwrap();

        assert!(response.chart.result.is_none());
        assert!(response.chart.error.unwrap().is_not_found());
    }

    #[test]
    fn test_empty_range() {
        let body = r#"{"chart":{"result":[{"meta":{"symbol":"AAPL"},"indicators":{"quote":[{}]}}],"error":null}}"#;
        let response: ChartResponse = serde_json::from_str(body).unwrap();
        let result = response.chart.result.unwrap().into_iter().next().unwrap();

        assert!(result.into_bars().unwrap().is_empty());
    }

    #[test]
    fn test_mismatched_columns() {
        let body = r#"{"chart":{"result":[{"meta":{"symbol":"X"},"timestamp":[1,2],
            "indicators":{"quote":[{"open":[1.0],"high":[1.0,2.0],"low":[1.0,2.0],"close":[1.0,2.0],"volume":[1.0,2.0]}]}}],"error":null}}"#;
        let response: ChartResponse = serde_json::from_str(body).unwrap();
        let result = response.chart.result.unwrap().into_iter().next().unwrap();

        assert!(matches!(result.into_bars(), Err(ApiError::Malformed(_))));
    }
}
