//! Bagged random forest
//!
//! Trains a fixed number of decision trees, each on a bootstrap resample of
//! the training rows with per-split feature subsampling. Per-tree rngs are
//! derived from the configured seed, so training is fully reproducible.

use super::tree::{DecisionTree, TreeData, TreeParams};
use super::TrainerConfig;
use crate::error::InferenceError;
use crate::models::NUM_FEATURES;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Stride separating per-tree seeds derived from the base seed
const TREE_SEED_STRIDE: u64 = 0x9E37_79B9_7F4A_7C15;

#[derive(Debug, Clone)]
pub(crate) struct RandomForest {
    trees: Vec<DecisionTree>,
    n_classes: usize,
}

impl RandomForest {
    pub fn fit(
        rows: &[[f64; NUM_FEATURES]],
        labels: &[usize],
        n_classes: usize,
        config: &TrainerConfig,
    ) -> Self {
        let data = TreeData {
            rows,
            labels,
            n_classes,
        };
        let params = TreeParams {
            max_depth: config.max_depth,
            min_samples_split: config.min_samples_split,
            max_features: max_features(),
        };
        let n = rows.len();

        let trees = (0..config.n_trees)
            .map(|t| {
                let mut rng =
                    StdRng::seed_from_u64(config.seed.wrapping_add((t as u64).wrapping_mul(TREE_SEED_STRIDE)));
                let bootstrap: Vec<usize> = (0..n).map(|_| rng.random_range(0..n)).collect();
                DecisionTree::fit(&data, &bootstrap, &params, &mut rng)
            })
            .collect();

        Self { trees, n_classes }
    }

    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }

    pub fn n_classes(&self) -> usize {
        self.n_classes
    }

    /// Per-class vote counts for one feature vector.
    pub fn votes(&self, features: &[f64; NUM_FEATURES]) -> Result<Vec<usize>, InferenceError> {
        if self.trees.is_empty() {
            return Err(InferenceError::EmptyForest);
        }
        let mut counts = vec![0usize; self.n_classes];
        for tree in &self.trees {
            let label = tree.predict(features);
            if label >= self.n_classes {
                return Err(InferenceError::VoteOutOfRange { label });
            }
            counts[label] += 1;
        }
        Ok(counts)
    }

    /// Majority-vote label, ties broken toward the lower label.
    pub fn predict_label(&self, features: &[f64; NUM_FEATURES]) -> Result<usize, InferenceError> {
        let votes = self.votes(features)?;
        let mut best = 0;
        for (label, &count) in votes.iter().enumerate() {
            if count > votes[best] {
                best = label;
            }
        }
        Ok(best)
    }
}

/// sqrt(13) rounded up, the usual classification default
fn max_features() -> usize {
    (NUM_FEATURES as f64).sqrt().ceil() as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_blob_data() -> (Vec<[f64; NUM_FEATURES]>, Vec<usize>) {
        let mut rows = Vec::new();
        let mut labels = Vec::new();
        for i in 0..20 {
            let mut row = [0.0; NUM_FEATURES];
            row.iter_mut().for_each(|v| *v = 1.0 + (i % 5) as f64 * 0.01);
            rows.push(row);
            labels.push(0);

            let mut row = [0.0; NUM_FEATURES];
            row.iter_mut().for_each(|v| *v = 9.0 + (i % 5) as f64 * 0.01);
            rows.push(row);
            labels.push(1);
        }
        (rows, labels)
    }

    fn test_config() -> TrainerConfig {
        TrainerConfig {
            n_trees: 20,
            seed: 42,
            ..TrainerConfig::default()
        }
    }

    #[test]
    fn test_forest_separates_blobs() {
        let (rows, labels) = two_blob_data();
        let forest = RandomForest::fit(&rows, &labels, 2, &test_config());

        assert_eq!(forest.predict_label(&[1.0; NUM_FEATURES]).unwrap(), 0);
        assert_eq!(forest.predict_label(&[9.0; NUM_FEATURES]).unwrap(), 1);
    }

    #[test]
    fn test_votes_sum_to_tree_count() {
        let (rows, labels) = two_blob_data();
        let forest = RandomForest::fit(&rows, &labels, 2, &test_config());

        let votes = forest.votes(&[5.0; NUM_FEATURES]).unwrap();
        assert_eq!(votes.len(), 2);
        assert_eq!(votes.iter().sum::<usize>(), forest.n_trees());
    }

    #[test]
    fn test_same_seed_same_forest() {
        let (rows, labels) = two_blob_data();
        let a = RandomForest::fit(&rows, &labels, 2, &test_config());
        let b = RandomForest::fit(&rows, &labels, 2, &test_config());

        let probe = [4.8; NUM_FEATURES];
        assert_eq!(a.votes(&probe).unwrap(), b.votes(&probe).unwrap());
    }

    #[test]
    fn test_different_seed_may_differ_but_stays_valid() {
        let (rows, labels) = two_blob_data();
        let config = TrainerConfig {
            seed: 7,
            ..test_config()
        };
        let forest = RandomForest::fit(&rows, &labels, 2, &config);
        let votes = forest.votes(&[1.0; NUM_FEATURES]).unwrap();
        assert_eq!(votes.iter().sum::<usize>(), forest.n_trees());
    }

    #[test]
    fn test_empty_forest_is_rejected() {
        let (rows, labels) = two_blob_data();
        let config = TrainerConfig {
            n_trees: 0,
            ..test_config()
        };
        let forest = RandomForest::fit(&rows, &labels, 2, &config);
        assert!(matches!(
            forest.votes(&[1.0; NUM_FEATURES]),
            Err(InferenceError::EmptyForest)
        ));
    }
}
