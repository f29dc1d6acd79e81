//! Feature-augmented daily series

use super::Bar;
use chrono::NaiveDate;
use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};

/// Model input columns, in matrix column order
pub const FEATURE_NAMES: [&str; 8] = [
    "open",
    "high",
    "low",
    "close",
    "volume",
    "daily_return",
    "ma_5",
    "ma_10",
];

/// Number of model input columns
pub const N_FEATURES: usize = FEATURE_NAMES.len();

/// Name of the prediction target column
pub const TARGET_NAME: &str = "adj_close";

/// A bar together with its derived features
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeaturedRow {
    pub bar: Bar,
    /// Percentage change of adjusted close from the previous row
    pub daily_return: f64,
    /// Trailing 5-row mean of adjusted close
    pub ma_5: f64,
    /// Trailing 10-row mean of adjusted close
    pub ma_10: f64,
}

impl FeaturedRow {
    pub fn date(&self) -> NaiveDate {
        self.bar.date
    }

    /// Input vector in `FEATURE_NAMES` order
    pub fn features(&self) -> [f64; N_FEATURES] {
        [
            self.bar.open,
            self.bar.high,
            self.bar.low,
            self.bar.close,
            self.bar.volume,
            self.daily_return,
            self.ma_5,
            self.ma_10,
        ]
    }

    pub fn target(&self) -> f64 {
        self.bar.adj_close
    }

    /// Every numeric column, inputs and target alike
    pub fn is_complete(&self) -> bool {
        self.bar.is_complete() && self.features().iter().all(|v| v.is_finite())
    }
}

/// Raw series with derived features; every row is complete
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeaturedSeries {
    ticker: String,
    rows: Vec<FeaturedRow>,
}

impl FeaturedSeries {
    /// Create a series from rows that are already complete
    pub fn new(ticker: impl Into<String>, rows: Vec<FeaturedRow>) -> Self {
        debug_assert!(rows.iter().all(FeaturedRow::is_complete));
        Self {
            ticker: ticker.into(),
            rows,
        }
    }

    pub fn ticker(&self) -> &str {
        &self.ticker
    }

    pub fn rows(&self) -> &[FeaturedRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn dates(&self) -> Vec<NaiveDate> {
        self.rows.iter().map(|r| r.date()).collect()
    }

    /// Input matrix (n_rows x 8)
    pub fn feature_matrix(&self) -> Array2<f64> {
        Array2::from_shape_fn((self.rows.len(), N_FEATURES), |(i, j)| {
            self.rows[i].features()[j]
        })
    }

    /// Target vector (adjusted close)
    pub fn targets(&self) -> Array1<f64> {
        self.rows.iter().map(|r| r.target()).collect()
    }

    /// Feature matrix restricted to the given rows, in index order
    pub fn select_features(&self, indices: &[usize]) -> Array2<f64> {
        Array2::from_shape_fn((indices.len(), N_FEATURES), |(i, j)| {
            self.rows[indices[i]].features()[j]
        })
    }

    /// Targets restricted to the given rows, in index order
    pub fn select_targets(&self, indices: &[usize]) -> Array1<f64> {
        indices.iter().map(|&i| self.rows[i].target()).collect()
    }
}
