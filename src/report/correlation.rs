//! Pearson correlation across the numeric columns of a featured series

use crate::data::FeaturedSeries;
use ndarray::{Array2, ArrayView1, Axis};
use serde::{Deserialize, Serialize};

/// Columns included in the correlation matrix, in order
pub const CORRELATION_COLUMNS: [&str; 9] = [
    "open",
    "high",
    "low",
    "close",
    "adj_close",
    "volume",
    "daily_return",
    "ma_5",
    "ma_10",
];

/// Symmetric correlation matrix with named axes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorrelationMatrix {
    pub columns: Vec<String>,
    pub values: Array2<f64>,
}

impl CorrelationMatrix {
    /// Correlate every pair of numeric columns.
    /// Pairs involving a constant column are NaN.
    pub fn from_series(series: &FeaturedSeries) -> Self {
        let data = Array2::from_shape_fn((series.len(), CORRELATION_COLUMNS.len()), |(i, j)| {
            let r = &series.rows()[i];
            match j {
                0 => r.bar.open,
                1 => r.bar.high,
                2 => r.bar.low,
                3 => r.bar.close,
                4 => r.bar.adj_close,
                5 => r.bar.volume,
                6 => r.daily_return,
                7 => r.ma_5,
                _ => r.ma_10,
            }
        });

        let k = CORRELATION_COLUMNS.len();
        let mut values = Array2::from_elem((k, k), f64::NAN);
        for a in 0..k {
            for b in a..k {
                let r = pearson(data.column(a), data.column(b));
                values[[a, b]] = r;
                values[[b, a]] = r;
            }
        }

        Self {
            columns: CORRELATION_COLUMNS.iter().map(|c| c.to_string()).collect(),
            values,
        }
    }

    /// Correlation between two named columns
    pub fn get(&self, a: &str, b: &str) -> Option<f64> {
        let i = self.columns.iter().position(|c| c == a)?;
        let j = self.columns.iter().position(|c| c == b)?;
        Some(self.values[[i, j]])
    }

    /// Rows of the matrix, each paired with its column name
    pub fn rows(&self) -> impl Iterator<Item = (&str, ArrayView1<'_, f64>)> {
        self.columns
            .iter()
            .map(String::as_str)
            .zip(self.values.axis_iter(Axis(0)))
    }
}

fn pearson(x: ArrayView1<f64>, y: ArrayView1<f64>) -> f64 {
    let n = x.len();
    if n < 2 {
        return f64::NAN;
    }

    let mx = x.sum() / n as f64;
    let my = y.sum() / n as f64;

    let mut cov = 0.0;
    let mut vx = 0.0;
    let mut vy = 0.0;
    for (a, b) in x.iter().zip(y.iter()) {
        cov += (a - mx) * (b - my);
        vx += (a - mx).powi(2);
        vy += (b - my).powi(2);
    }

    if vx == 0.0 || vy == 0.0 {
        return f64::NAN;
    }
    (cov / (vx.sqrt() * vy.sqrt())).clamp(-1.0, 1.0)
}
