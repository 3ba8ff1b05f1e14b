//! Classifier training
//!
//! Splits the dataset deterministically, fits a bagged random forest on the
//! training subset once at startup, and reports held-out evaluation metrics
//! for observability. Metrics are never gated on.

mod forest;
mod tree;

pub(crate) use forest::RandomForest;

use crate::error::TrainingError;
use crate::models::{Dataset, NUM_FEATURES};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

/// Default forest size, matching the original service
pub const DEFAULT_FOREST_SIZE: usize = 100;

/// Default deterministic split/training seed
pub const DEFAULT_SEED: u64 = 42;

/// Default share of samples used for training
pub const DEFAULT_TRAIN_FRACTION: f64 = 0.8;

/// Training configuration
#[derive(Debug, Clone)]
pub struct TrainerConfig {
    /// Number of trees in the ensemble
    pub n_trees: usize,
    /// Maximum tree depth
    pub max_depth: usize,
    /// Minimum samples required to split a node
    pub min_samples_split: usize,
    /// Seed for the split shuffle and per-tree bootstrap sampling
    pub seed: u64,
    /// Share of samples assigned to the training subset
    pub train_fraction: f64,
}

impl Default for TrainerConfig {
    fn default() -> Self {
        Self {
            n_trees: DEFAULT_FOREST_SIZE,
            max_depth: 16,
            min_samples_split: 2,
            seed: DEFAULT_SEED,
            train_fraction: DEFAULT_TRAIN_FRACTION,
        }
    }
}

/// Fitted, immutable decision artifact. Constructed once at startup and
/// shared read-only across requests; inference never mutates it.
#[derive(Debug, Clone)]
pub struct TrainedModel {
    forest: RandomForest,
}

impl TrainedModel {
    pub(crate) fn forest(&self) -> &RandomForest {
        &self.forest
    }

    pub fn n_trees(&self) -> usize {
        self.forest.n_trees()
    }

    pub fn n_classes(&self) -> usize {
        self.forest.n_classes()
    }
}

/// Held-out precision/recall for one class
#[derive(Debug, Clone)]
pub struct ClassMetrics {
    pub precision: f64,
    pub recall: f64,
}

/// Held-out evaluation metrics, for logging only
#[derive(Debug, Clone)]
pub struct EvaluationMetrics {
    pub accuracy: f64,
    pub per_class: Vec<ClassMetrics>,
    pub train_size: usize,
    pub eval_size: usize,
    pub trained_at: i64,
}

/// Train a forest on a deterministic split of the dataset.
///
/// The same seed and dataset always produce an identical split and an
/// identical model.
pub fn train(
    dataset: &Dataset,
    config: &TrainerConfig,
) -> Result<(TrainedModel, EvaluationMetrics), TrainingError> {
    if dataset.is_empty() {
        return Err(TrainingError::EmptyDataset);
    }
    if config.n_trees == 0 {
        return Err(TrainingError::NoTrees);
    }

    let n = dataset.len();
    let mut order: Vec<usize> = (0..n).collect();
    order.shuffle(&mut StdRng::seed_from_u64(config.seed));

    let train_len = ((n as f64) * config.train_fraction).floor() as usize;
    let train_len = train_len.clamp(1, n);
    let (train_idx, eval_idx) = order.split_at(train_len);

    let rows: Vec<[f64; NUM_FEATURES]> = train_idx
        .iter()
        .map(|&i| dataset.samples[i].features.to_array())
        .collect();
    let labels: Vec<usize> = train_idx.iter().map(|&i| dataset.samples[i].label).collect();

    for label in 0..dataset.n_classes {
        if !labels.contains(&label) {
            return Err(TrainingError::ClassMissingFromSplit { label });
        }
    }

    let forest = RandomForest::fit(&rows, &labels, dataset.n_classes, config);
    let metrics = evaluate(&forest, dataset, eval_idx, train_len);

    Ok((TrainedModel { forest }, metrics))
}

fn evaluate(
    forest: &RandomForest,
    dataset: &Dataset,
    eval_idx: &[usize],
    train_size: usize,
) -> EvaluationMetrics {
    let n_classes = dataset.n_classes;
    let mut correct = 0usize;
    // confusion[actual][predicted]
    let mut confusion = vec![vec![0usize; n_classes]; n_classes];

    for &i in eval_idx {
        let sample = &dataset.samples[i];
        let predicted = forest
            .predict_label(&sample.features.to_array())
            .expect("freshly trained forest is well-formed");
        confusion[sample.label][predicted] += 1;
        if predicted == sample.label {
            correct += 1;
        }
    }

    let accuracy = if eval_idx.is_empty() {
        0.0
    } else {
        correct as f64 / eval_idx.len() as f64
    };

    let per_class = (0..n_classes)
        .map(|c| {
            let true_positives = confusion[c][c];
            let predicted: usize = (0..n_classes).map(|a| confusion[a][c]).sum();
            let actual: usize = confusion[c].iter().sum();
            ClassMetrics {
                precision: ratio(true_positives, predicted),
                recall: ratio(true_positives, actual),
            }
        })
        .collect();

    EvaluationMetrics {
        accuracy,
        per_class,
        train_size,
        eval_size: eval_idx.len(),
        trained_at: chrono::Utc::now().timestamp(),
    }
}

fn ratio(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset;
    use crate::models::{FeatureVector, LabeledSample};

    fn tiny_config() -> TrainerConfig {
        TrainerConfig {
            n_trees: 15,
            ..TrainerConfig::default()
        }
    }

    #[test]
    fn test_train_on_embedded_dataset() {
        let data = dataset::load().unwrap();
        let (model, metrics) = train(&data, &tiny_config()).unwrap();

        assert_eq!(model.n_trees(), 15);
        assert_eq!(model.n_classes(), 3);
        assert_eq!(metrics.train_size + metrics.eval_size, data.len());
        assert_eq!(metrics.per_class.len(), 3);
        // The wine classes are well separated; a forest should do far
        // better than the 33% chance level on held-out data.
        assert!(metrics.accuracy > 0.6, "accuracy was {}", metrics.accuracy);
    }

    #[test]
    fn test_split_is_deterministic() {
        let data = dataset::load().unwrap();
        let (model_a, metrics_a) = train(&data, &tiny_config()).unwrap();
        let (model_b, metrics_b) = train(&data, &tiny_config()).unwrap();

        assert_eq!(metrics_a.accuracy, metrics_b.accuracy);

        let probe = data.samples[0].features.to_array();
        assert_eq!(
            model_a.forest().votes(&probe).unwrap(),
            model_b.forest().votes(&probe).unwrap()
        );
    }

    #[test]
    fn test_empty_dataset_is_rejected() {
        let data = crate::models::Dataset {
            samples: vec![],
            n_classes: 3,
        };
        assert!(matches!(
            train(&data, &tiny_config()),
            Err(TrainingError::EmptyDataset)
        ));
    }

    #[test]
    fn test_zero_tree_forest_is_rejected() {
        // A forest size of 0 can arrive from configuration; it must fail
        // at startup instead of producing a model that cannot vote.
        let data = dataset::load().unwrap();
        let config = TrainerConfig {
            n_trees: 0,
            ..TrainerConfig::default()
        };
        assert!(matches!(
            train(&data, &config),
            Err(TrainingError::NoTrees)
        ));
    }

    #[test]
    fn test_missing_class_in_split_is_rejected() {
        // One sample of class 2 in a 10-sample set: with an 0.8 fraction it
        // can end up in the eval subset; degenerate single-sample classes
        // must fail rather than silently train a model that never saw them.
        let mut samples = Vec::new();
        for i in 0..9 {
            samples.push(LabeledSample {
                features: FeatureVector::from_array([i as f64; 13]),
                label: i % 2,
            });
        }
        samples.push(LabeledSample {
            features: FeatureVector::from_array([99.0; 13]),
            label: 2,
        });
        let data = crate::models::Dataset {
            samples,
            n_classes: 3,
        };

        // Probe seeds; at least one puts the lone class-2 sample in the
        // eval subset, which must be a TrainingError.
        let failed = (0..100u64).any(|seed| {
            let config = TrainerConfig {
                seed,
                ..tiny_config()
            };
            matches!(
                train(&data, &config),
                Err(TrainingError::ClassMissingFromSplit { label: 2 })
            )
        });
        assert!(failed, "no seed produced a class-missing split");
    }

    #[test]
    fn test_train_fraction_controls_split_sizes() {
        let data = dataset::load().unwrap();
        let config = TrainerConfig {
            train_fraction: 0.5,
            ..tiny_config()
        };
        let (_, metrics) = train(&data, &config).unwrap();
        assert_eq!(metrics.train_size, data.len() / 2);
    }
}
