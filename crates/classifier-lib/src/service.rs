//! Prediction request orchestration
//!
//! Drives one request through Received -> Validated -> Scored -> Responded,
//! logging every attempt and translating each error kind into the wire
//! error shape. Validation failures are the client's fault, inference
//! failures the service's; neither ever crashes the process.

use crate::error::{Fault, RequestError};
use crate::health::LivenessResponse;
use crate::inference::InferenceEngine;
use crate::models::PredictionResult;
use crate::observability::ServiceMetrics;
use crate::schema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::time::Instant;
use tracing::{error, info};

/// Successful prediction response shape
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictResponse {
    pub prediction: usize,
    /// Keyed by `clase_<label>` in label order, summing to 1
    pub probabilities: BTreeMap<String, f64>,
    pub message: String,
}

impl PredictResponse {
    fn from_result(result: &PredictionResult) -> Self {
        let probabilities = result
            .class_probabilities
            .iter()
            .enumerate()
            .map(|(label, &p)| (format!("clase_{label}"), p))
            .collect();
        Self {
            prediction: result.predicted_label,
            probabilities,
            message: result.message.clone(),
        }
    }
}

/// Error response shape, shared by validation and inference failures
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub fault: Fault,
}

impl ErrorResponse {
    pub fn from_request_error(err: &RequestError) -> Self {
        Self {
            error: err.to_string(),
            fault: err.fault(),
        }
    }
}

/// Orchestrates validation, inference and logging for one request at a
/// time. Holds the model by value; construct it once at startup and share
/// it behind an `Arc` — inference is read-only, so no locking is needed.
pub struct PredictionService {
    engine: InferenceEngine,
    metrics: ServiceMetrics,
}

impl PredictionService {
    pub fn new(engine: InferenceEngine, metrics: ServiceMetrics) -> Self {
        Self { engine, metrics }
    }

    /// Handle one raw prediction payload.
    ///
    /// Every attempt produces a log entry, including malformed input: the
    /// payload is echoed before validation runs.
    pub fn handle(&self, payload: &Value) -> Result<PredictResponse, RequestError> {
        let started = Instant::now();
        info!(payload = %payload, "Received prediction request");

        let features = match schema::parse(payload) {
            Ok(features) => features,
            Err(err) => {
                error!(error = %err, "Request payload failed validation");
                self.metrics.inc_validation_errors();
                return Err(err.into());
            }
        };

        let result = match self.engine.predict(&features) {
            Ok(result) => result,
            Err(err) => {
                error!(error = %err, "Inference failed on a validated request");
                self.metrics.inc_inference_errors();
                return Err(err.into());
            }
        };

        let response = PredictResponse::from_result(&result);
        self.metrics
            .observe_prediction_latency(started.elapsed().as_secs_f64());
        self.metrics.inc_predictions();
        info!(
            prediction = response.prediction,
            probabilities = ?result.class_probabilities,
            message = %response.message,
            "Prediction succeeded"
        );

        Ok(response)
    }

    /// Constant-time liveness signal. Touches neither model nor dataset.
    pub fn liveness(&self) -> LivenessResponse {
        LivenessResponse::ok()
    }
}
