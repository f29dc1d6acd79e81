//! Regression metrics

use serde::{Deserialize, Serialize};

/// Error summary of predictions against actual values
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RegressionMetrics {
    pub mse: f64,
    pub rmse: f64,
    pub mae: f64,
    /// Coefficient of determination; 0.0 when the actual values are constant
    pub r2: f64,
}

impl RegressionMetrics {
    /// `None` when the inputs are empty or differ in length
    pub fn compute(actual: &[f64], predicted: &[f64]) -> Option<Self> {
        if actual.is_empty() || actual.len() != predicted.len() {
            return None;
        }

        let n = actual.len() as f64;
        let mse = actual
            .iter()
            .zip(predicted)
            .map(|(a, p)| (a - p).powi(2))
            .sum::<f64>()
            / n;
        let mae = actual.iter().zip(predicted).map(|(a, p)| (a - p).abs()).sum::<f64>() / n;

        let mean = actual.iter().sum::<f64>() / n;
        let ss_tot: f64 = actual.iter().map(|a| (a - mean).powi(2)).sum();
        let r2 = if ss_tot == 0.0 { 0.0 } else { 1.0 - mse * n / ss_tot };

        Some(Self {
            mse,
            rmse: mse.sqrt(),
            mae,
            r2,
        })
    }
}
