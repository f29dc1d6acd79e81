//! Mean imputation of missing values

use ndarray::{Array1, Array2, ArrayView2, Axis};
use serde::{Deserialize, Serialize};

/// Replaces non-finite entries with the training column mean
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MeanImputer {
    means: Array1<f64>,
}

impl MeanImputer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Learn column means over finite values.
    /// A column with no finite value gets a mean of 0.0.
    pub fn fit(&mut self, x: ArrayView2<f64>) -> &mut Self {
        self.means = x
            .axis_iter(Axis(1))
            .map(|col| {
                let (sum, count) = col
                    .iter()
                    .filter(|v| v.is_finite())
                    .fold((0.0, 0usize), |(s, c), v| (s + v, c + 1));
                if count == 0 {
                    0.0
                } else {
                    sum / count as f64
                }
            })
            .collect();
        self
    }

    pub fn transform(&self, x: ArrayView2<f64>) -> Array2<f64> {
        let mut out = x.to_owned();

        for (j, mut col) in out.axis_iter_mut(Axis(1)).enumerate() {
            let mean = self.means.get(j).copied().unwrap_or(0.0);
            col.mapv_inplace(|v| if v.is_finite() { v } else { mean });
        }

        out
    }

    pub fn fit_transform(&mut self, x: ArrayView2<f64>) -> Array2<f64> {
        self.fit(x);
        self.transform(x)
    }

    pub fn means(&self) -> &Array1<f64> {
        &self.means
    }
}
