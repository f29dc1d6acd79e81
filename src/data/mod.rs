//! Core data types
//!
//! Daily bars, feature-augmented series and the train/test partition.

mod bar;
mod featured;
mod split;

pub use bar::{Bar, RawSeries};
pub use featured::{FeaturedRow, FeaturedSeries, FEATURE_NAMES, N_FEATURES, TARGET_NAME};
pub use split::{Split, DEFAULT_SPLIT_SEED, DEFAULT_TEST_RATIO};
