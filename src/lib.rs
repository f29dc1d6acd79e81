//! # Stock Forecast - Random Forest price prediction for listed stocks
//!
//! Downloads daily price history for a ticker, derives a small set of
//! features, fits a Random Forest regressor on a seeded train/test split and
//! reports predicted against actual adjusted close.
//!
//! ## Modules
//!
//! - `api` - Market data source trait and Yahoo Finance client
//! - `fetcher` - Retrying fetch over a fixed history window
//! - `data` - Daily bars, featured series and the train/test partition
//! - `features` - Daily return and moving averages
//! - `preprocessing` - Min-max scaling and mean imputation
//! - `models` - Regression tree and Random Forest
//! - `cache` - Per-ticker memoisation of prepared datasets
//! - `pipeline` - Orchestration of the steps above
//! - `report` - Metrics, correlation matrix and CSV export

pub mod api;
pub mod cache;
pub mod config;
pub mod data;
pub mod error;
pub mod features;
pub mod fetcher;
pub mod models;
pub mod pipeline;
pub mod preprocessing;
pub mod report;

pub use api::{MarketDataSource, YahooClient};
pub use cache::DatasetCache;
pub use config::Config;
pub use error::{PipelineError, PipelineResult};
pub use fetcher::{Fetcher, RetryPolicy};
pub use pipeline::Pipeline;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::api::{ApiError, MarketDataSource, YahooClient};
    pub use crate::cache::DatasetCache;
    pub use crate::config::Config;
    pub use crate::data::{Bar, FeaturedSeries, RawSeries, Split};
    pub use crate::error::{PipelineError, PipelineResult, NO_DATA_MESSAGE};
    pub use crate::features::build_features;
    pub use crate::fetcher::{FetchWindow, Fetcher, RetryPolicy};
    pub use crate::models::{train_and_predict, ForestConfig, PredictionVector, RandomForest};
    pub use crate::pipeline::Pipeline;
    pub use crate::preprocessing::{split_and_scale, PreparedDataset, SplitConfig};
    pub use crate::report::{Forecast, RegressionMetrics};
}
