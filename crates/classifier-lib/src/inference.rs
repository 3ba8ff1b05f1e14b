//! Ensemble inference
//!
//! Wraps the fitted forest: majority-vote label plus the per-class vote
//! share as the probability distribution. Pure function of (model,
//! features), deterministic, no side effects.

use crate::error::InferenceError;
use crate::models::{ClassLabels, FeatureVector, PredictionResult};
use crate::trainer::TrainedModel;

/// Scores validated feature vectors against the trained model.
pub struct InferenceEngine {
    model: TrainedModel,
    labels: ClassLabels,
}

impl InferenceEngine {
    pub fn new(model: TrainedModel, labels: ClassLabels) -> Self {
        Self { model, labels }
    }

    pub fn model(&self) -> &TrainedModel {
        &self.model
    }

    /// Predict the class and full probability distribution for one vector.
    ///
    /// A well-formed 13-feature vector never fails here; errors indicate
    /// malformed internal model state.
    pub fn predict(&self, features: &FeatureVector) -> Result<PredictionResult, InferenceError> {
        let votes = self.model.forest().votes(&features.to_array())?;
        let total = votes.iter().sum::<usize>() as f64;

        let class_probabilities: Vec<f64> = votes.iter().map(|&v| v as f64 / total).collect();
        if class_probabilities.iter().any(|p| !p.is_finite()) {
            return Err(InferenceError::NonFiniteProbability);
        }

        // Ties break toward the lower label
        let mut predicted_label = 0;
        for (label, &count) in votes.iter().enumerate() {
            if count > votes[predicted_label] {
                predicted_label = label;
            }
        }

        Ok(PredictionResult {
            predicted_label,
            class_probabilities,
            message: format!(
                "Vino clasificado como: {}",
                self.labels.display(predicted_label)
            ),
        })
    }
}
