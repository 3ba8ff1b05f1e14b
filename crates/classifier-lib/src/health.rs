//! Liveness probe
//!
//! The probe is a fixed, constant-time signal confirming the process is up.
//! It deliberately depends on neither the trained model nor the dataset, so
//! it stays available even if model state is somehow corrupted.

use serde::{Deserialize, Serialize};

/// Fixed liveness response, serializing to `{"status":"ok"}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LivenessResponse {
    pub status: String,
}

impl LivenessResponse {
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
        }
    }
}
