//! Server configuration

use anyhow::Result;
use classifier_lib::trainer::{DEFAULT_FOREST_SIZE, DEFAULT_SEED, DEFAULT_TRAIN_FRACTION};
use classifier_lib::{ClassLabels, TrainerConfig};
use serde::Deserialize;

/// Server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// HTTP port for prediction/health/metrics
    #[serde(default = "default_port")]
    pub port: u16,

    /// Number of trees in the ensemble
    #[serde(default = "default_forest_size")]
    pub forest_size: usize,

    /// Deterministic split/training seed
    #[serde(default = "default_seed")]
    pub seed: u64,

    /// Share of samples used for training
    #[serde(default = "default_train_fraction")]
    pub train_fraction: f64,

    /// Display names for the class labels, in label order
    #[serde(default = "default_class_names")]
    pub class_names: Vec<String>,
}

fn default_port() -> u16 {
    8000
}

fn default_forest_size() -> usize {
    DEFAULT_FOREST_SIZE
}

fn default_seed() -> u64 {
    DEFAULT_SEED
}

fn default_train_fraction() -> f64 {
    DEFAULT_TRAIN_FRACTION
}

fn default_class_names() -> Vec<String> {
    vec![
        "Clase 0".to_string(),
        "Clase 1".to_string(),
        "Clase 2".to_string(),
    ]
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            forest_size: default_forest_size(),
            seed: default_seed(),
            train_fraction: default_train_fraction(),
            class_names: default_class_names(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from `WINE_`-prefixed environment variables.
    ///
    /// `WINE_CLASS_NAMES` is a comma-separated list in label order. A value
    /// that does not deserialize is a startup error, not a silent default.
    pub fn load() -> Result<Self> {
        let config = config::Config::builder()
            .add_source(
                config::Environment::with_prefix("WINE")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("class_names"),
            )
            .build()?;

        Ok(config.try_deserialize()?)
    }

    pub fn trainer_config(&self) -> TrainerConfig {
        TrainerConfig {
            n_trees: self.forest_size,
            seed: self.seed,
            train_fraction: self.train_fraction,
            ..TrainerConfig::default()
        }
    }

    pub fn class_labels(&self) -> ClassLabels {
        ClassLabels::new(self.class_names.clone())
    }
}
