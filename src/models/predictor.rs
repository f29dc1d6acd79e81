//! Fit-and-predict entry points

use super::random_forest::{ForestConfig, RandomForest};
use super::ModelError;
use ndarray::{Array1, Array2};
use tracing::info;

/// Model output aligned row-for-row with the test inputs
pub type PredictionVector = Array1<f64>;

/// Fit a fresh forest on the training partition and predict the test rows.
///
/// Nothing is persisted; every call retrains from scratch. With an unseeded
/// config, repeated calls may return different predictions.
pub fn train_and_predict(
    train_x: &Array2<f64>,
    test_x: &Array2<f64>,
    train_y: &Array1<f64>,
    config: &ForestConfig,
) -> Result<PredictionVector, ModelError> {
    fit_and_predict(train_x, test_x, train_y, config).map(|(_, predictions)| predictions)
}

/// Same as [`train_and_predict`], also returning the fitted forest
pub fn fit_and_predict(
    train_x: &Array2<f64>,
    test_x: &Array2<f64>,
    train_y: &Array1<f64>,
    config: &ForestConfig,
) -> Result<(RandomForest, PredictionVector), ModelError> {
    let mut forest = RandomForest::new(config.clone());
    forest.fit(train_x.view(), train_y.view())?;

    let predictions = forest.predict(test_x.view())?;
    info!(
        "Trained {} trees on {} rows, predicted {} rows",
        forest.n_trees(),
        train_x.nrows(),
        predictions.len()
    );

    Ok((forest, predictions))
}
