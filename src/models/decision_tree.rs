//! Regression tree implementation

use super::ModelError;
use ndarray::{ArrayView1, ArrayView2};
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

/// Decision tree configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreeConfig {
    /// Maximum depth of tree (None = grow until leaves are pure)
    pub max_depth: Option<usize>,
    /// Minimum samples required to split
    pub min_samples_split: usize,
    /// Minimum samples in leaf node
    pub min_samples_leaf: usize,
    /// Maximum features to consider for split (None = all)
    pub max_features: Option<usize>,
    /// Random seed for feature sampling
    pub seed: u64,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            max_depth: None,
            min_samples_split: 2,
            min_samples_leaf: 1,
            max_features: None,
            seed: 42,
        }
    }
}

/// Internal split of a tree node
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SplitRule {
    pub feature_idx: usize,
    pub threshold: f64,
    pub left: Box<TreeNode>,
    pub right: Box<TreeNode>,
}

/// Tree node
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreeNode {
    /// Mean target of the samples reaching this node
    pub value: f64,
    /// Number of samples in this node
    pub n_samples: usize,
    /// Target variance at this node
    pub impurity: f64,
    /// `None` for leaves
    pub split: Option<SplitRule>,
}

impl TreeNode {
    fn leaf(value: f64, n_samples: usize, impurity: f64) -> Self {
        Self {
            value,
            n_samples,
            impurity,
            split: None,
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.split.is_none()
    }

    pub fn depth(&self) -> usize {
        match &self.split {
            None => 1,
            Some(s) => 1 + s.left.depth().max(s.right.depth()),
        }
    }

    pub fn n_leaves(&self) -> usize {
        match &self.split {
            None => 1,
            Some(s) => s.left.n_leaves() + s.right.n_leaves(),
        }
    }
}

struct BestSplit {
    feature_idx: usize,
    threshold: f64,
    left: Vec<usize>,
    right: Vec<usize>,
    sse_decrease: f64,
}

/// CART regression tree minimising squared error
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionTree {
    config: TreeConfig,
    root: Option<TreeNode>,
    n_features: usize,
    feature_importances: Vec<f64>,
}

impl DecisionTree {
    /// Create a new decision tree with config
    pub fn new(config: TreeConfig) -> Self {
        Self {
            config,
            root: None,
            n_features: 0,
            feature_importances: Vec::new(),
        }
    }

    /// Train on every row of `x`
    pub fn fit(&mut self, x: ArrayView2<f64>, y: ArrayView1<f64>) -> Result<(), ModelError> {
        let indices: Vec<usize> = (0..x.nrows()).collect();
        self.fit_rows(x, y, &indices)
    }

    /// Train on the given rows of `x`; repeated indices act as sample weights
    pub fn fit_rows(
        &mut self,
        x: ArrayView2<f64>,
        y: ArrayView1<f64>,
        rows: &[usize],
    ) -> Result<(), ModelError> {
        super::check_training_shapes(x, y)?;

        self.n_features = x.ncols();
        self.feature_importances = vec![0.0; self.n_features];

        let mut rng = ChaCha8Rng::seed_from_u64(self.config.seed);
        self.root = Some(self.build_tree(x, y, rows, 0, &mut rng));

        let sum: f64 = self.feature_importances.iter().sum();
        if sum > 0.0 {
            for imp in &mut self.feature_importances {
                *imp /= sum;
            }
        }

        Ok(())
    }

    fn build_tree(
        &mut self,
        x: ArrayView2<f64>,
        y: ArrayView1<f64>,
        rows: &[usize],
        depth: usize,
        rng: &mut ChaCha8Rng,
    ) -> TreeNode {
        let n = rows.len();
        let (mean, impurity) = mean_and_variance(rows.iter().map(|&i| y[i]));

        let depth_reached = self.config.max_depth.is_some_and(|d| depth >= d);
        if depth_reached
            || n < self.config.min_samples_split.max(2)
            || n < 2 * self.config.min_samples_leaf.max(1)
            || impurity <= 1e-12
        {
            return TreeNode::leaf(mean, n, impurity);
        }

        match self.find_best_split(x, y, rows, rng) {
            Some(best) => {
                self.feature_importances[best.feature_idx] += best.sse_decrease;

                let left = self.build_tree(x, y, &best.left, depth + 1, rng);
                let right = self.build_tree(x, y, &best.right, depth + 1, rng);

                TreeNode {
                    value: mean,
                    n_samples: n,
                    impurity,
                    split: Some(SplitRule {
                        feature_idx: best.feature_idx,
                        threshold: best.threshold,
                        left: Box::new(left),
                        right: Box::new(right),
                    }),
                }
            }
            None => TreeNode::leaf(mean, n, impurity),
        }
    }

    /// Sort rows by each candidate feature and sweep prefix sums of the
    /// target to find the threshold with the lowest child squared error.
    fn find_best_split(
        &self,
        x: ArrayView2<f64>,
        y: ArrayView1<f64>,
        rows: &[usize],
        rng: &mut ChaCha8Rng,
    ) -> Option<BestSplit> {
        let n = rows.len();
        let min_leaf = self.config.min_samples_leaf.max(1);
        let max_features = self
            .config
            .max_features
            .unwrap_or(self.n_features)
            .clamp(1, self.n_features.max(1));

        let mut feature_indices: Vec<usize> = (0..self.n_features).collect();
        feature_indices.shuffle(rng);
        feature_indices.truncate(max_features);

        let total_sum: f64 = rows.iter().map(|&i| y[i]).sum();
        let total_sq: f64 = rows.iter().map(|&i| y[i] * y[i]).sum();
        let parent_sse = total_sq - total_sum * total_sum / n as f64;

        // (feature, sorted rows, split position, child sse)
        let mut best: Option<(usize, Vec<usize>, usize, f64)> = None;

        for &feature_idx in &feature_indices {
            let mut sorted = rows.to_vec();
            sorted.sort_by(|&a, &b| x[[a, feature_idx]].total_cmp(&x[[b, feature_idx]]));

            let mut left_sum = 0.0;
            let mut left_sq = 0.0;
            let mut candidate: Option<(usize, f64)> = None;

            for k in 1..n {
                let yi = y[sorted[k - 1]];
                left_sum += yi;
                left_sq += yi * yi;

                if k < min_leaf || n - k < min_leaf {
                    continue;
                }
                if x[[sorted[k - 1], feature_idx]] >= x[[sorted[k], feature_idx]] {
                    continue;
                }

                let right_sum = total_sum - left_sum;
                let right_sq = total_sq - left_sq;
                let sse = (left_sq - left_sum * left_sum / k as f64)
                    + (right_sq - right_sum * right_sum / (n - k) as f64);

                if candidate.map_or(true, |(_, c)| sse < c) {
                    candidate = Some((k, sse));
                }
            }

            if let Some((k, sse)) = candidate {
                if best.as_ref().map_or(true, |b| sse < b.3) {
                    best = Some((feature_idx, sorted, k, sse));
                }
            }
        }

        let (feature_idx, sorted, k, sse) = best?;
        if sse >= parent_sse {
            return None;
        }

        let lo = x[[sorted[k - 1], feature_idx]];
        let hi = x[[sorted[k], feature_idx]];
        let mut threshold = (lo + hi) / 2.0;
        // midpoint of adjacent floats can round up to `hi`
        if threshold >= hi {
            threshold = lo;
        }

        let right = sorted[k..].to_vec();
        let mut left = sorted;
        left.truncate(k);

        Some(BestSplit {
            feature_idx,
            threshold,
            left,
            right,
            sse_decrease: parent_sse - sse,
        })
    }

    /// Predict for a single sample
    pub fn predict_one(&self, features: ArrayView1<f64>) -> f64 {
        let mut node = match &self.root {
            Some(root) => root,
            None => return 0.0,
        };

        while let Some(rule) = &node.split {
            node = if features[rule.feature_idx] <= rule.threshold {
                &rule.left
            } else {
                &rule.right
            };
        }

        node.value
    }

    pub fn is_fitted(&self) -> bool {
        self.root.is_some()
    }

    pub fn root(&self) -> Option<&TreeNode> {
        self.root.as_ref()
    }

    /// Normalised impurity decrease per feature
    pub fn feature_importances(&self) -> &[f64] {
        &self.feature_importances
    }
}

fn mean_and_variance(values: impl Iterator<Item = f64>) -> (f64, f64) {
    let (n, sum, sq) = values.fold((0usize, 0.0, 0.0), |(n, s, q), v| (n + 1, s + v, q + v * v));
    if n == 0 {
        return (0.0, 0.0);
    }
    let mean = sum / n as f64;
    (mean, (sq / n as f64 - mean * mean).max(0.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{Array1, Array2};

    #[test]
    fn test_step_function() {
        let x = Array2::from_shape_fn((100, 1), |(i, _)| i as f64 / 10.0);
        let y: Array1<f64> = x.column(0).mapv(|v| if v > 5.0 { 3.0 } else { -1.0 });

        let mut tree = DecisionTree::new(TreeConfig::default());
        tree.fit(x.view(), y.view()).unwrap();

        let root = tree.root().unwrap();
        assert_eq!(root.depth(), 2);
        assert_eq!(root.n_leaves(), 2);
        assert_eq!(tree.predict_one(ndarray::arr1(&[2.0]).view()), -1.0);
        assert_eq!(tree.predict_one(ndarray::arr1(&[8.0]).view()), 3.0);
    }

    #[test]
    fn test_fully_grown_tree_memorises() {
        let x = Array2::from_shape_fn((40, 2), |(i, j)| (i * (j + 1)) as f64);
        let y: Array1<f64> = (0..40).map(|i| (i as f64 * 0.37).sin()).collect();

        let mut tree = DecisionTree::new(TreeConfig::default());
        tree.fit(x.view(), y.view()).unwrap();

        for i in 0..40 {
            assert!((tree.predict_one(x.row(i)) - y[i]).abs() < 1e-12);
        }
    }

    #[test]
    fn test_max_depth_and_importances() {
        let x = Array2::from_shape_fn((60, 2), |(i, j)| if j == 0 { i as f64 } else { 1.0 });
        let y: Array1<f64> = (0..60).map(|i| i as f64 * 2.0).collect();

        let mut tree = DecisionTree::new(TreeConfig {
            max_depth: Some(3),
            ..Default::default()
        });
        tree.fit(x.view(), y.view()).unwrap();

        assert!(tree.root().unwrap().depth() <= 4);
        // constant column can never be chosen
        assert_eq!(tree.feature_importances()[1], 0.0);
        assert!((tree.feature_importances()[0] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_constant_target_is_leaf() {
        let x = Array2::from_shape_fn((10, 1), |(i, _)| i as f64);
        let y = Array1::from_elem(10, 4.5);

        let mut tree = DecisionTree::new(TreeConfig::default());
        tree.fit(x.view(), y.view()).unwrap();

        assert!(tree.root().unwrap().is_leaf());
        assert_eq!(tree.predict_one(x.row(3)), 4.5);
    }

    #[test]
    fn test_shape_mismatch() {
        let x = Array2::<f64>::zeros((5, 2));
        let y = Array1::<f64>::zeros(4);

        let mut tree = DecisionTree::new(TreeConfig::default());
        assert!(matches!(
            tree.fit(x.view(), y.view()),
            Err(ModelError::ShapeMismatch { x_rows: 5, y_len: 4 })
        ));
    }
}
