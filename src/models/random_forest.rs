//! Random Forest implementation

use super::decision_tree::{DecisionTree, TreeConfig};
use super::ModelError;
use ndarray::{Array1, ArrayView1, ArrayView2};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Random Forest configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForestConfig {
    /// Number of trees in the forest
    pub n_trees: usize,
    /// Maximum depth of each tree (None = unlimited)
    pub max_depth: Option<usize>,
    /// Minimum samples to split
    pub min_samples_split: usize,
    /// Minimum samples in leaf
    pub min_samples_leaf: usize,
    /// Max features per split (all if None)
    pub max_features: Option<usize>,
    /// Bootstrap sampling
    pub bootstrap: bool,
    /// Random seed; fresh entropy on every fit when None
    pub seed: Option<u64>,
}

impl Default for ForestConfig {
    fn default() -> Self {
        Self {
            n_trees: 100,
            max_depth: None,
            min_samples_split: 2,
            min_samples_leaf: 1,
            max_features: None,
            bootstrap: true,
            seed: None,
        }
    }
}

/// Bagged ensemble of regression trees; predictions are the tree average
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RandomForest {
    config: ForestConfig,
    trees: Vec<DecisionTree>,
    n_features: usize,
    feature_importances: Vec<f64>,
}

impl RandomForest {
    /// Create a new random forest
    pub fn new(config: ForestConfig) -> Self {
        Self {
            config,
            trees: Vec::new(),
            n_features: 0,
            feature_importances: Vec::new(),
        }
    }

    /// Train the random forest
    pub fn fit(&mut self, x: ArrayView2<f64>, y: ArrayView1<f64>) -> Result<(), ModelError> {
        super::check_training_shapes(x, y)?;

        let n_samples = x.nrows();
        let n_features = x.ncols();
        let base_seed = self.config.seed.unwrap_or_else(rand::random);

        debug!(
            "Fitting {} trees on {} samples x {} features",
            self.config.n_trees, n_samples, n_features
        );

        // Build trees in parallel
        let trees: Result<Vec<DecisionTree>, ModelError> = (0..self.config.n_trees.max(1))
            .into_par_iter()
            .map(|i| {
                let mut rng = ChaCha8Rng::seed_from_u64(base_seed.wrapping_add(i as u64));

                let mut tree = DecisionTree::new(TreeConfig {
                    max_depth: self.config.max_depth,
                    min_samples_split: self.config.min_samples_split,
                    min_samples_leaf: self.config.min_samples_leaf,
                    max_features: self.config.max_features,
                    seed: rng.gen(),
                });

                let rows: Vec<usize> = if self.config.bootstrap {
                    (0..n_samples).map(|_| rng.gen_range(0..n_samples)).collect()
                } else {
                    (0..n_samples).collect()
                };

                tree.fit_rows(x, y, &rows)?;
                Ok(tree)
            })
            .collect();

        self.trees = trees?;
        self.n_features = n_features;

        // Aggregate feature importances
        self.feature_importances = vec![0.0; n_features];
        for tree in &self.trees {
            for (i, &imp) in tree.feature_importances().iter().enumerate() {
                self.feature_importances[i] += imp;
            }
        }

        let sum: f64 = self.feature_importances.iter().sum();
        if sum > 0.0 {
            for imp in &mut self.feature_importances {
                *imp /= sum;
            }
        }

        Ok(())
    }

    /// Predict for a single sample
    pub fn predict_one(&self, features: ArrayView1<f64>) -> f64 {
        if self.trees.is_empty() {
            return 0.0;
        }

        self.trees.iter().map(|t| t.predict_one(features)).sum::<f64>() / self.trees.len() as f64
    }

    /// Predict for multiple samples
    pub fn predict(&self, x: ArrayView2<f64>) -> Result<Array1<f64>, ModelError> {
        if self.trees.is_empty() {
            return Err(ModelError::NotFitted);
        }
        if x.ncols() != self.n_features {
            return Err(ModelError::FeatureMismatch {
                expected: self.n_features,
                found: x.ncols(),
            });
        }

        let predictions: Vec<f64> = (0..x.nrows())
            .into_par_iter()
            .map(|i| self.predict_one(x.row(i)))
            .collect();

        Ok(Array1::from_vec(predictions))
    }

    /// Get feature importances
    pub fn feature_importances(&self) -> &[f64] {
        &self.feature_importances
    }

    /// Get feature names with importances, sorted by importance
    pub fn feature_importance_ranking<'a>(&self, names: &[&'a str]) -> Vec<(&'a str, f64)> {
        let mut ranking: Vec<(&str, f64)> = names
            .iter()
            .zip(self.feature_importances.iter())
            .map(|(&n, &i)| (n, i))
            .collect();

        ranking.sort_by(|a, b| b.1.total_cmp(&a.1));
        ranking
    }

    /// Number of trees
    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }

    pub fn config(&self) -> &ForestConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array2;

    fn dataset() -> (Array2<f64>, Array1<f64>) {
        let x = Array2::from_shape_fn((200, 2), |(i, j)| {
            if j == 0 {
                i as f64 / 20.0
            } else {
                (i as f64 / 10.0).sin()
            }
        });
        let y = (0..200)
            .map(|i| x[[i, 0]] + x[[i, 1]] * 2.0 + 0.1 * (i as f64 % 5.0))
            .collect();
        (x, y)
    }

    #[test]
    fn test_random_forest_regression() {
        let (x, y) = dataset();

        let mut forest = RandomForest::new(ForestConfig {
            n_trees: 10,
            max_depth: Some(5),
            seed: Some(42),
            ..Default::default()
        });
        forest.fit(x.view(), y.view()).unwrap();

        assert_eq!(forest.n_trees(), 10);
        assert_eq!(forest.feature_importances().len(), 2);
        let total: f64 = forest.feature_importances().iter().sum();
        assert!((total - 1.0).abs() < 1e-9);

        let pred = forest.predict(x.view()).unwrap();
        let mse = pred
            .iter()
            .zip(y.iter())
            .map(|(p, t)| (p - t).powi(2))
            .sum::<f64>()
            / y.len() as f64;
        let var = y.var(0.0);
        assert!(mse < var * 0.2);
    }

    #[test]
    fn test_seeded_forest_is_reproducible() {
        let (x, y) = dataset();
        let config = ForestConfig {
            n_trees: 8,
            seed: Some(7),
            ..Default::default()
        };

        let mut a = RandomForest::new(config.clone());
        let mut b = RandomForest::new(config);
        a.fit(x.view(), y.view()).unwrap();
        b.fit(x.view(), y.view()).unwrap();

        assert_eq!(a.predict(x.view()).unwrap(), b.predict(x.view()).unwrap());
    }

    #[test]
    fn test_ranking_sorted() {
        let (x, y) = dataset();
        let mut forest = RandomForest::new(ForestConfig {
            n_trees: 5,
            seed: Some(1),
            ..Default::default()
        });
        forest.fit(x.view(), y.view()).unwrap();

        let ranking = forest.feature_importance_ranking(&["trend", "wave"]);
        assert_eq!(ranking.len(), 2);
        assert!(ranking[0].1 >= ranking[1].1);
    }

    #[test]
    fn test_predict_errors() {
        let forest = RandomForest::new(ForestConfig::default());
        assert!(matches!(
            forest.predict(Array2::<f64>::zeros((1, 2)).view()),
            Err(ModelError::NotFitted)
        ));

        let (x, y) = dataset();
        let mut forest = RandomForest::new(ForestConfig {
            n_trees: 2,
            seed: Some(3),
            ..Default::default()
        });
        forest.fit(x.view(), y.view()).unwrap();
        assert!(matches!(
            forest.predict(Array2::<f64>::zeros((1, 3)).view()),
            Err(ModelError::FeatureMismatch { expected: 2, found: 3 })
        ));
    }
}
