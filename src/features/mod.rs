//! Feature engineering module
//!
//! Derives daily return and moving averages from the raw daily series.

mod engine;
mod indicators;

pub use engine::{build_features, LONG_MA_PERIOD, SHORT_MA_PERIOD};
pub use indicators::{pct_change, sma};
