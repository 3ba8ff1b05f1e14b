//! Core library for the wine classification service
//!
//! This crate provides the model-serving core:
//! - Embedded wine dataset loading
//! - Random forest training with a deterministic train/eval split
//! - Request payload validation against the feature schema
//! - Ensemble inference with calibrated class probabilities
//! - Request orchestration, error translation and observability

pub mod dataset;
pub mod error;
pub mod health;
pub mod inference;
pub mod models;
pub mod observability;
pub mod schema;
pub mod service;
pub mod trainer;

pub use error::{
    DatasetError, Fault, InferenceError, RequestError, TrainingError, ValidationError,
};
pub use health::LivenessResponse;
pub use inference::InferenceEngine;
pub use models::*;
pub use observability::ServiceMetrics;
pub use service::{ErrorResponse, PredictResponse, PredictionService};
pub use trainer::{EvaluationMetrics, TrainedModel, TrainerConfig};
