//! Preprocessing module
//!
//! Seeded train/test partitioning, min-max scaling and mean imputation.

mod imputer;
mod prepare;
mod scaler;

pub use imputer::MeanImputer;
pub use prepare::{prepare, split_and_scale, PreparedDataset, ScaledSplit, SplitConfig};
pub use scaler::MinMaxScaler;
