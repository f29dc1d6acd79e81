//! Machine learning models module
//!
//! Provides regression tree and Random Forest implementations and the
//! fit-and-predict entry point used by the pipeline.

pub mod decision_tree;
mod predictor;
pub mod random_forest;

pub use decision_tree::{DecisionTree, TreeConfig, TreeNode};
pub use predictor::{fit_and_predict, train_and_predict, PredictionVector};
pub use random_forest::{ForestConfig, RandomForest};

use ndarray::{ArrayView1, ArrayView2};
use thiserror::Error;

/// Errors raised while fitting or applying a model
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ModelError {
    #[error("Input has {x_rows} rows but target has {y_len} values")]
    ShapeMismatch { x_rows: usize, y_len: usize },

    #[error("Model expects {expected} features, got {found}")]
    FeatureMismatch { expected: usize, found: usize },

    #[error("Training set is empty")]
    EmptyTrainingSet,

    #[error("Model has not been fitted")]
    NotFitted,
}

pub(crate) fn check_training_shapes(x: ArrayView2<f64>, y: ArrayView1<f64>) -> Result<(), ModelError> {
    if x.nrows() != y.len() {
        return Err(ModelError::ShapeMismatch {
            x_rows: x.nrows(),
            y_len: y.len(),
        });
    }
    if x.nrows() == 0 {
        return Err(ModelError::EmptyTrainingSet);
    }
    Ok(())
}
