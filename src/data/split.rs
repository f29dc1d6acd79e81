//! Seeded train/test row partition

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

/// Default share of rows held out for testing
pub const DEFAULT_TEST_RATIO: f64 = 0.2;

/// Default shuffle seed
pub const DEFAULT_SPLIT_SEED: u64 = 42;

/// Train/test partition expressed as row indices into the source series
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Split {
    pub train: Vec<usize>,
    pub test: Vec<usize>,
}

impl Split {
    /// Random shuffle split.
    ///
    /// The test partition holds `ceil(n * test_ratio)` rows. The same
    /// `(n, test_ratio, seed)` always yields the same partition; the order is
    /// unrelated to chronology.
    pub fn random(n: usize, test_ratio: f64, seed: u64) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);

        let mut indices: Vec<usize> = (0..n).collect();
        indices.shuffle(&mut rng);

        let test_size = ((test_ratio.clamp(0.0, 1.0) * n as f64).ceil() as usize).min(n);
        let (test, train) = indices.split_at(test_size);

        Self {
            train: train.to_vec(),
            test: test.to_vec(),
        }
    }

    pub fn n_train(&self) -> usize {
        self.train.len()
    }

    pub fn n_test(&self) -> usize {
        self.test.len()
    }
}
