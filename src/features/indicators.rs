//! Rolling indicators over a price column
//!
//! Outputs have the same length as the input; positions without enough
//! history are NaN.

/// Simple Moving Average over a trailing window that includes the current row
pub fn sma(values: &[f64], period: usize) -> Vec<f64> {
    if period == 0 || values.len() < period {
        return vec![f64::NAN; values.len()];
    }

    let mut result = vec![f64::NAN; period - 1];

    for i in (period - 1)..values.len() {
        let sum: f64 = values[(i + 1 - period)..=i].iter().sum();
        result.push(sum / period as f64);
    }

    result
}

/// Fractional change from the previous row: `v[i] / v[i-1] - 1`
pub fn pct_change(values: &[f64]) -> Vec<f64> {
    let mut result = vec![f64::NAN; values.len()];

    for i in 1..values.len() {
        result[i] = values[i] / values[i - 1] - 1.0;
    }

    result
}
