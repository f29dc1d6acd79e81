//! Daily price bars

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One trading day of price and volume data.
///
/// Missing values reported by the data source are stored as NaN and
/// removed later by the feature builder.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    /// Close adjusted for dividends and splits
    pub adj_close: f64,
    pub volume: f64,
}

impl Bar {
    /// Create a new bar
    pub fn new(
        date: NaiveDate,
        open: f64,
        high: f64,
        low: f64,
        close: f64,
        adj_close: f64,
        volume: f64,
    ) -> Self {
        Self {
            date,
            open,
            high,
            low,
            close,
            adj_close,
            volume,
        }
    }

    /// True when every numeric field holds a finite value
    pub fn is_complete(&self) -> bool {
        [
            self.open,
            self.high,
            self.low,
            self.close,
            self.adj_close,
            self.volume,
        ]
        .iter()
        .all(|v| v.is_finite())
    }
}

/// Time-ordered daily history for one ticker
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawSeries {
    ticker: String,
    bars: Vec<Bar>,
}

impl RawSeries {
    /// Build a series, ordering bars by date
    pub fn new(ticker: impl Into<String>, mut bars: Vec<Bar>) -> Self {
        bars.sort_by_key(|b| b.date);
        Self {
            ticker: ticker.into(),
            bars,
        }
    }

    pub fn ticker(&self) -> &str {
        &self.ticker
    }

    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// Adjusted close column
    pub fn adj_closes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.adj_close).collect()
    }

    /// Save bars to a CSV file
    pub fn save_csv(&self, path: &std::path::Path) -> anyhow::Result<()> {
        let mut writer = csv::Writer::from_path(path)?;
        for bar in &self.bars {
            writer.serialize(bar)?;
        }
        writer.flush()?;
        Ok(())
    }
}
