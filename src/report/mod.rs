//! Result reporting
//!
//! Metrics, correlation matrix and CSV export for a finished prediction run.

mod correlation;
mod export;
mod forecast;
mod metrics;

pub use correlation::{CorrelationMatrix, CORRELATION_COLUMNS};
pub use export::{save_correlation, save_predictions, write_correlation, write_predictions};
pub use forecast::{Forecast, ForecastPoint};
pub use metrics::RegressionMetrics;
