//! Observability infrastructure for the classification service
//!
//! Provides Prometheus metrics for the prediction path (latency, request
//! and error counters, model info). Structured logging is done with
//! `tracing` at the call sites.

use prometheus::{
    register_gauge, register_histogram, register_int_counter, register_int_gauge, Gauge,
    Histogram, IntCounter, IntGauge,
};
use std::sync::OnceLock;

/// Default histogram buckets for latency measurements (in seconds)
const LATENCY_BUCKETS: &[f64] = &[
    0.0001, 0.0005, 0.001, 0.0025, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0,
];

/// Global metrics instance (registered once)
static GLOBAL_METRICS: OnceLock<ServiceMetricsInner> = OnceLock::new();

/// Inner metrics structure that holds the actual Prometheus metrics
struct ServiceMetricsInner {
    prediction_latency_seconds: Histogram,
    predictions_total: IntCounter,
    validation_errors_total: IntCounter,
    inference_errors_total: IntCounter,
    model_accuracy: Gauge,
    model_forest_size: IntGauge,
}

impl ServiceMetricsInner {
    fn new() -> Self {
        Self {
            prediction_latency_seconds: register_histogram!(
                "wine_service_prediction_latency_seconds",
                "Time spent handling one prediction request",
                LATENCY_BUCKETS.to_vec()
            )
            .expect("Failed to register prediction_latency_seconds"),

            predictions_total: register_int_counter!(
                "wine_service_predictions_total",
                "Total number of successful predictions"
            )
            .expect("Failed to register predictions_total"),

            validation_errors_total: register_int_counter!(
                "wine_service_validation_errors_total",
                "Total number of requests rejected by schema validation"
            )
            .expect("Failed to register validation_errors_total"),

            inference_errors_total: register_int_counter!(
                "wine_service_inference_errors_total",
                "Total number of internal inference failures"
            )
            .expect("Failed to register inference_errors_total"),

            model_accuracy: register_gauge!(
                "wine_service_model_accuracy",
                "Held-out accuracy of the model trained at startup"
            )
            .expect("Failed to register model_accuracy"),

            model_forest_size: register_int_gauge!(
                "wine_service_model_forest_size",
                "Number of trees in the trained ensemble"
            )
            .expect("Failed to register model_forest_size"),
        }
    }
}

/// Service metrics for Prometheus exposition
///
/// This is a lightweight handle to the global metrics instance.
/// Multiple clones share the same underlying metrics.
#[derive(Clone)]
pub struct ServiceMetrics {
    _private: (),
}

impl Default for ServiceMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl ServiceMetrics {
    /// Create a new metrics handle (initializes global metrics if needed)
    pub fn new() -> Self {
        GLOBAL_METRICS.get_or_init(ServiceMetricsInner::new);
        Self { _private: () }
    }

    fn inner(&self) -> &ServiceMetricsInner {
        GLOBAL_METRICS.get().expect("Metrics not initialized")
    }

    /// Record how long one prediction request took
    pub fn observe_prediction_latency(&self, duration_secs: f64) {
        self.inner().prediction_latency_seconds.observe(duration_secs);
    }

    /// Count one successful prediction
    pub fn inc_predictions(&self) {
        self.inner().predictions_total.inc();
    }

    /// Count one request rejected by validation
    pub fn inc_validation_errors(&self) {
        self.inner().validation_errors_total.inc();
    }

    /// Count one internal inference failure
    pub fn inc_inference_errors(&self) {
        self.inner().inference_errors_total.inc();
    }

    /// Record the startup model's evaluation accuracy and forest size
    pub fn set_model_info(&self, accuracy: f64, forest_size: usize) {
        self.inner().model_accuracy.set(accuracy);
        self.inner().model_forest_size.set(forest_size as i64);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trainer::{self, TrainerConfig};

    #[test]
    fn test_service_metrics_creation() {
        // Metrics live in the process-wide Prometheus registry, so this
        // only checks the handle can observe without panicking.
        let metrics = ServiceMetrics::new();

        metrics.observe_prediction_latency(0.001);
        metrics.inc_predictions();
        metrics.inc_validation_errors();
        metrics.inc_inference_errors();
    }

    fn gauge_value(name: &str) -> f64 {
        prometheus::gather()
            .iter()
            .find(|family| family.get_name() == name)
            .unwrap_or_else(|| panic!("gauge {name} not registered"))
            .get_metric()[0]
            .get_gauge()
            .get_value()
    }

    #[test]
    fn test_model_info_gauges_reflect_training() {
        let data = crate::dataset::load().unwrap();
        let config = TrainerConfig {
            n_trees: 9,
            ..TrainerConfig::default()
        };
        let (model, eval) = trainer::train(&data, &config).unwrap();

        let metrics = ServiceMetrics::new();
        metrics.set_model_info(eval.accuracy, model.n_trees());

        assert_eq!(gauge_value("wine_service_model_accuracy"), eval.accuracy);
        assert_eq!(gauge_value("wine_service_model_forest_size"), 9.0);
    }
}
