//! Train/test split, scaling and imputation

use super::{MeanImputer, MinMaxScaler};
use crate::data::{FeaturedSeries, Split, DEFAULT_SPLIT_SEED, DEFAULT_TEST_RATIO};
use crate::error::{PipelineError, PipelineResult};
use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Split settings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SplitConfig {
    /// Share of rows held out for testing
    pub test_ratio: f64,
    /// Shuffle seed; the same seed always yields the same partition
    pub seed: u64,
}

impl Default for SplitConfig {
    fn default() -> Self {
        Self {
            test_ratio: DEFAULT_TEST_RATIO,
            seed: DEFAULT_SPLIT_SEED,
        }
    }
}

/// Scaled and imputed model inputs with their targets
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScaledSplit {
    pub train_x: Array2<f64>,
    pub test_x: Array2<f64>,
    pub train_y: Array1<f64>,
    pub test_y: Array1<f64>,
    /// Row indices into the featured series for each partition
    pub split: Split,
    pub scaler: MinMaxScaler,
    pub imputer: MeanImputer,
}

/// Everything the predictor and the report need for one ticker
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreparedDataset {
    pub data: ScaledSplit,
    pub series: FeaturedSeries,
}

impl PreparedDataset {
    pub fn ticker(&self) -> &str {
        self.series.ticker()
    }

    pub fn train_x(&self) -> &Array2<f64> {
        &self.data.train_x
    }

    pub fn test_x(&self) -> &Array2<f64> {
        &self.data.test_x
    }

    pub fn train_y(&self) -> &Array1<f64> {
        &self.data.train_y
    }

    pub fn test_y(&self) -> &Array1<f64> {
        &self.data.test_y
    }

    /// Dates of the test rows, aligned with `test_y`
    pub fn test_dates(&self) -> Vec<chrono::NaiveDate> {
        self.data
            .split
            .test
            .iter()
            .map(|&i| self.series.rows()[i].date())
            .collect()
    }
}

/// Partition rows into train/test, fit a min-max scaler and a mean imputer on
/// the training inputs only, and apply both to the test inputs.
///
/// Fails with `InsufficientData` when the training partition would be empty.
pub fn split_and_scale(series: &FeaturedSeries, config: &SplitConfig) -> PipelineResult<ScaledSplit> {
    let split = Split::random(series.len(), config.test_ratio, config.seed);

    if split.train.is_empty() {
        return Err(PipelineError::InsufficientData {
            ticker: series.ticker().to_string(),
            rows: series.len(),
        });
    }

    let raw_train = series.select_features(&split.train);
    let raw_test = series.select_features(&split.test);

    let mut scaler = MinMaxScaler::new();
    let train_scaled = scaler.fit_transform(raw_train.view());
    let test_scaled = scaler.transform(raw_test.view());

    let mut imputer = MeanImputer::new();
    let train_x = imputer.fit_transform(train_scaled.view());
    let test_x = imputer.transform(test_scaled.view());

    debug!(
        ticker = series.ticker(),
        train = split.n_train(),
        test = split.n_test(),
        "Split and scaled"
    );

    Ok(ScaledSplit {
        train_x,
        test_x,
        train_y: series.select_targets(&split.train),
        test_y: series.select_targets(&split.test),
        split,
        scaler,
        imputer,
    })
}

/// Split and scale, keeping the featured series alongside
pub fn prepare(series: FeaturedSeries, config: &SplitConfig) -> PipelineResult<PreparedDataset> {
    let data = split_and_scale(&series, config)?;
    Ok(PreparedDataset { data, series })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{Bar, FeaturedRow, N_FEATURES};
    use chrono::{Duration, NaiveDate};

    fn series(n: usize) -> FeaturedSeries {
        let start = NaiveDate::from_ymd_opt(2023, 1, 16).unwrap();
        let rows = (0..n)
            .map(|i| {
                let p = 50.0 + (i as f64 * 0.7).cos() * 3.0 + i as f64 * 0.2;
                FeaturedRow {
                    bar: Bar::new(start + Duration::days(i as i64), p, p + 1.0, p - 1.0, p + 0.2, p, 5e5 + i as f64),
                    daily_return: (i as f64 * 0.3).sin() * 0.01,
                    ma_5: p - 0.1,
                    ma_10: p - 0.2,
                }
            })
            .collect();
        FeaturedSeries::new("TSLA", rows)
    }

    #[test]
    fn test_partition_sizes() {
        let s = series(101);
        let out = split_and_scale(&s, &SplitConfig::default()).unwrap();

        assert_eq!(out.train_x.nrows() + out.test_x.nrows(), 101);
        assert_eq!(out.test_x.nrows(), 21);
        assert_eq!(out.train_x.ncols(), N_FEATURES);
        assert_eq!(out.train_y.len(), out.train_x.nrows());
        assert_eq!(out.test_y.len(), out.test_x.nrows());
    }

    #[test]
    fn test_reproducible() {
        let s = series(80);
        let a = split_and_scale(&s, &SplitConfig::default()).unwrap();
        let b = split_and_scale(&s, &SplitConfig::default()).unwrap();

        assert_eq!(a.split, b.split);
        assert_eq!(a.train_x, b.train_x);
        assert_eq!(a.test_y, b.test_y);
    }

    #[test]
    fn test_training_inputs_in_unit_range() {
        let out = split_and_scale(&series(120), &SplitConfig::default()).unwrap();

        assert!(out.train_x.iter().all(|v| (0.0..=1.0).contains(v)));
        assert!(out.test_x.iter().all(|v| v.is_finite()));
    }

    #[test]
    fn test_targets_follow_split() {
        let s = series(40);
        let out = split_and_scale(&s, &SplitConfig::default()).unwrap();

        for (k, &row) in out.split.test.iter().enumerate() {
            assert_eq!(out.test_y[k], s.rows()[row].target());
        }
    }

    #[test]
    fn test_empty_series_is_insufficient() {
        let err = split_and_scale(&series(0), &SplitConfig::default()).unwrap_err();
        assert!(matches!(err, PipelineError::InsufficientData { rows: 0, .. }));

        let err = split_and_scale(&series(1), &SplitConfig::default()).unwrap_err();
        assert!(matches!(err, PipelineError::InsufficientData { rows: 1, .. }));
    }

    #[test]
    fn test_prepare_keeps_series() {
        let prepared = prepare(series(30), &SplitConfig::default()).unwrap();

        assert_eq!(prepared.ticker(), "TSLA");
        assert_eq!(prepared.test_dates().len(), prepared.test_y().len());
        assert_eq!(prepared.series.len(), 30);
    }
}
