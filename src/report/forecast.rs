//! Actual-versus-predicted summary for one ticker

use super::{CorrelationMatrix, RegressionMetrics};
use crate::data::FEATURE_NAMES;
use crate::models::{PredictionVector, RandomForest};
use crate::preprocessing::PreparedDataset;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One test row with its prediction
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForecastPoint {
    pub date: NaiveDate,
    pub actual: f64,
    pub predicted: f64,
}

/// Everything needed to chart and tabulate one prediction run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Forecast {
    pub ticker: String,
    /// Test rows in split order
    pub points: Vec<ForecastPoint>,
    pub metrics: Option<RegressionMetrics>,
    pub correlation: CorrelationMatrix,
    /// Input columns ranked by importance, highest first
    pub feature_importances: Vec<(String, f64)>,
}

impl Forecast {
    pub fn new(dataset: &PreparedDataset, predictions: &PredictionVector, forest: &RandomForest) -> Self {
        let points: Vec<ForecastPoint> = dataset
            .test_dates()
            .into_iter()
            .zip(dataset.test_y().iter())
            .zip(predictions.iter())
            .map(|((date, &actual), &predicted)| ForecastPoint {
                date,
                actual,
                predicted,
            })
            .collect();

        let actual: Vec<f64> = points.iter().map(|p| p.actual).collect();
        let predicted: Vec<f64> = points.iter().map(|p| p.predicted).collect();

        Self {
            ticker: dataset.ticker().to_string(),
            metrics: RegressionMetrics::compute(&actual, &predicted),
            correlation: CorrelationMatrix::from_series(&dataset.series),
            feature_importances: forest
                .feature_importance_ranking(&FEATURE_NAMES)
                .into_iter()
                .map(|(name, imp)| (name.to_string(), imp))
                .collect(),
            points,
        }
    }

    /// Test rows ordered by date
    pub fn chronological(&self) -> Vec<ForecastPoint> {
        let mut points = self.points.clone();
        points.sort_by_key(|p| p.date);
        points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}
