//! Core data models for the classification service

use serde::{Deserialize, Serialize};

/// Number of input features expected by the model
pub const NUM_FEATURES: usize = 13;

/// One sample's measurable attributes in the fixed order shared by
/// training and serving. The classifier only sees positions, never names;
/// [`crate::schema::FEATURE_NAMES`] defines the name for each position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    pub alcohol: f64,
    pub malic_acid: f64,
    pub ash: f64,
    pub alcalinity_of_ash: f64,
    pub magnesium: f64,
    pub total_phenols: f64,
    pub flavanoids: f64,
    pub nonflavanoid_phenols: f64,
    pub proanthocyanins: f64,
    pub color_intensity: f64,
    pub hue: f64,
    pub diluted_wine_ratio: f64,
    pub proline: f64,
}

impl FeatureVector {
    /// Build a vector from values in schema order.
    pub fn from_array(values: [f64; NUM_FEATURES]) -> Self {
        Self {
            alcohol: values[0],
            malic_acid: values[1],
            ash: values[2],
            alcalinity_of_ash: values[3],
            magnesium: values[4],
            total_phenols: values[5],
            flavanoids: values[6],
            nonflavanoid_phenols: values[7],
            proanthocyanins: values[8],
            color_intensity: values[9],
            hue: values[10],
            diluted_wine_ratio: values[11],
            proline: values[12],
        }
    }

    /// Positional encoding consumed by the trees.
    pub fn to_array(&self) -> [f64; NUM_FEATURES] {
        [
            self.alcohol,
            self.malic_acid,
            self.ash,
            self.alcalinity_of_ash,
            self.magnesium,
            self.total_phenols,
            self.flavanoids,
            self.nonflavanoid_phenols,
            self.proanthocyanins,
            self.color_intensity,
            self.hue,
            self.diluted_wine_ratio,
            self.proline,
        ]
    }
}

/// A feature vector paired with its known class label
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LabeledSample {
    pub features: FeatureVector,
    pub label: usize,
}

/// The full labeled dataset, immutable once loaded
#[derive(Debug, Clone)]
pub struct Dataset {
    pub samples: Vec<LabeledSample>,
    pub n_classes: usize,
}

impl Dataset {
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

/// Outcome of scoring one feature vector
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictionResult {
    pub predicted_label: usize,
    /// Per-class probabilities indexed by label, each in [0, 1], summing to 1.
    pub class_probabilities: Vec<f64>,
    pub message: String,
}

/// Label to display-name mapping, a configuration point rather than a
/// hard-coded table.
#[derive(Debug, Clone)]
pub struct ClassLabels {
    names: Vec<String>,
}

impl ClassLabels {
    pub fn new(names: Vec<String>) -> Self {
        Self { names }
    }

    /// Placeholder names matching the original service's wire format.
    pub fn numbered(n_classes: usize) -> Self {
        Self {
            names: (0..n_classes).map(|i| format!("Clase {i}")).collect(),
        }
    }

    pub fn display(&self, label: usize) -> String {
        self.names
            .get(label)
            .cloned()
            .unwrap_or_else(|| format!("Clase {label}"))
    }
}
