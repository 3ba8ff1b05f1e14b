//! Error taxonomy for the classification service
//!
//! Startup-fatal errors ([`DatasetError`], [`TrainingError`]) abort process
//! initialization before any traffic is served. Per-request errors
//! ([`ValidationError`], [`InferenceError`]) are caught at the service
//! boundary and translated into an error response, never crashing the
//! process.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The embedded dataset could not be loaded. Startup-fatal.
#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("dataset is empty")]
    Empty,

    #[error("dataset header does not match the feature schema")]
    HeaderMismatch,

    #[error("malformed dataset row {row}: {reason}")]
    MalformedRow { row: usize, reason: String },

    #[error("row {row} carries class label {label}, expected 0..{n_classes}")]
    LabelOutOfRange {
        row: usize,
        label: i64,
        n_classes: usize,
    },
}

/// Training could not produce a usable model. Startup-fatal.
#[derive(Debug, Error)]
pub enum TrainingError {
    #[error("cannot train on an empty dataset")]
    EmptyDataset,

    #[error("forest size must be at least 1")]
    NoTrees,

    #[error("class {label} has no samples in the training subset")]
    ClassMissingFromSplit { label: usize },
}

/// A request payload failed schema validation. Per-request, client fault.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("request payload must be a JSON object")]
    NotAnObject,

    #[error("missing required field `{0}`")]
    MissingField(&'static str),

    #[error("field `{field}` must be a finite number")]
    NotNumeric { field: &'static str },
}

/// Inference failed on malformed internal model state. Per-request, server
/// fault; a well-formed feature vector should never trigger this.
#[derive(Debug, Error)]
pub enum InferenceError {
    #[error("model contains no trees")]
    EmptyForest,

    #[error("tree voted for out-of-range class {label}")]
    VoteOutOfRange { label: usize },

    #[error("class probability distribution is not finite")]
    NonFiniteProbability,
}

/// Classification of a per-request failure, used to pick the response status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Fault {
    /// The request itself was invalid.
    Client,
    /// The service failed internally.
    Server,
}

/// Any error that can occur while handling one prediction request.
#[derive(Debug, Error)]
pub enum RequestError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Inference(#[from] InferenceError),
}

impl RequestError {
    /// Whether the failure is the client's or the service's fault.
    pub fn fault(&self) -> Fault {
        match self {
            RequestError::Validation(_) => Fault::Client,
            RequestError::Inference(_) => Fault::Server,
        }
    }
}
