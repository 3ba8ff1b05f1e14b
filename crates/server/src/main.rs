//! Wine classification service
//!
//! Trains the classifier once at startup from the embedded dataset, then
//! serves synchronous single-record predictions over HTTP. A startup
//! failure (dataset or training) aborts the process before the listener
//! binds, so a partially initialized model is never exposed to traffic.

use anyhow::{Context, Result};
use classifier_lib::{
    dataset, trainer, InferenceEngine, PredictionService, ServiceMetrics,
};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod api;
mod config;

const SERVER_VERSION: &str = env!("CARGO_PKG_VERSION");

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing with JSON output and env filter
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(fmt::layer().json())
        .init();

    info!(version = SERVER_VERSION, "Starting wine-server");

    let config = config::ServerConfig::load()?;
    info!(
        port = config.port,
        forest_size = config.forest_size,
        seed = config.seed,
        "Server configured"
    );

    let data = dataset::load().context("failed to load the embedded dataset")?;
    info!(
        samples = data.len(),
        classes = data.n_classes,
        "Dataset loaded"
    );

    let (model, eval) = trainer::train(&data, &config.trainer_config())
        .context("failed to train the classifier")?;
    info!(
        accuracy = eval.accuracy,
        train_size = eval.train_size,
        eval_size = eval.eval_size,
        forest_size = model.n_trees(),
        trained_at = eval.trained_at,
        "Model trained"
    );
    for (label, class) in eval.per_class.iter().enumerate() {
        info!(
            label = label,
            precision = class.precision,
            recall = class.recall,
            "Held-out class metrics"
        );
    }

    let metrics = ServiceMetrics::new();
    metrics.set_model_info(eval.accuracy, model.n_trees());

    let service = PredictionService::new(
        InferenceEngine::new(model, config.class_labels()),
        metrics,
    );
    let app_state = Arc::new(api::AppState::new(Arc::new(service)));

    api::serve(config.port, app_state).await
}
