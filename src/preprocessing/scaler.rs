//! Min-max feature scaling

use ndarray::{Array1, Array2, ArrayView2, Axis};
use serde::{Deserialize, Serialize};

/// Per-column linear rescaling to [0, 1] using training minima and maxima.
///
/// Columns with zero range use a divisor of 1, so they map to `x - min`.
/// Non-finite values are ignored while fitting and pass through as NaN.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MinMaxScaler {
    data_min: Array1<f64>,
    data_max: Array1<f64>,
}

impl MinMaxScaler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Learn column minima and maxima
    pub fn fit(&mut self, x: ArrayView2<f64>) -> &mut Self {
        let n_features = x.ncols();
        let mut data_min = Array1::from_elem(n_features, f64::NAN);
        let mut data_max = Array1::from_elem(n_features, f64::NAN);

        for (j, col) in x.axis_iter(Axis(1)).enumerate() {
            for &v in col.iter().filter(|v| v.is_finite()) {
                if data_min[j].is_nan() || v < data_min[j] {
                    data_min[j] = v;
                }
                if data_max[j].is_nan() || v > data_max[j] {
                    data_max[j] = v;
                }
            }
        }

        self.data_min = data_min;
        self.data_max = data_max;
        self
    }

    /// Apply the fitted transform; values outside the fitted range map outside [0, 1]
    pub fn transform(&self, x: ArrayView2<f64>) -> Array2<f64> {
        let mut out = x.to_owned();

        for (j, mut col) in out.axis_iter_mut(Axis(1)).enumerate() {
            let min = self.data_min.get(j).copied().unwrap_or(f64::NAN);
            let range = self.range(j);
            col.mapv_inplace(|v| if v.is_finite() { (v - min) / range } else { f64::NAN });
        }

        out
    }

    pub fn fit_transform(&mut self, x: ArrayView2<f64>) -> Array2<f64> {
        self.fit(x);
        self.transform(x)
    }

    fn range(&self, j: usize) -> f64 {
        let range = self.data_max.get(j).copied().unwrap_or(f64::NAN)
            - self.data_min.get(j).copied().unwrap_or(f64::NAN);
        if range == 0.0 {
            1.0
        } else {
            range
        }
    }

    pub fn data_min(&self) -> &Array1<f64> {
        &self.data_min
    }

    pub fn data_max(&self) -> &Array1<f64> {
        &self.data_max
    }
}
