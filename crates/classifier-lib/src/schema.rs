//! Feature schema validation
//!
//! Converts an untyped request payload into an ordered [`FeatureVector`].
//! The field order here is the single source of truth for the positional
//! contract the classifier was trained on; it must never drift from the
//! dataset column order (the dataset loader enforces this at startup).

use crate::error::ValidationError;
use crate::models::{FeatureVector, NUM_FEATURES};
use serde_json::Value;

/// Required numeric fields in positional order.
pub const FEATURE_NAMES: [&str; NUM_FEATURES] = [
    "alcohol",
    "malic_acid",
    "ash",
    "alcalinity_of_ash",
    "magnesium",
    "total_phenols",
    "flavanoids",
    "nonflavanoid_phenols",
    "proanthocyanins",
    "color_intensity",
    "hue",
    "diluted_wine_ratio",
    "proline",
];

/// Parse an untyped payload into a feature vector.
///
/// All 13 named fields are required and must coerce to a finite number:
/// JSON numbers are taken as-is, strings are accepted when they parse as
/// one (`"1.0"` scores the same as `1.0`). Unrecognized extra fields are
/// silently ignored for forward compatibility.
pub fn parse(payload: &Value) -> Result<FeatureVector, ValidationError> {
    let object = payload.as_object().ok_or(ValidationError::NotAnObject)?;

    let mut values = [0.0; NUM_FEATURES];
    for (i, name) in FEATURE_NAMES.into_iter().enumerate() {
        let raw = object
            .get(name)
            .ok_or(ValidationError::MissingField(name))?;
        values[i] = coerce_number(raw).ok_or(ValidationError::NotNumeric { field: name })?;
    }

    Ok(FeatureVector::from_array(values))
}

fn coerce_number(raw: &Value) -> Option<f64> {
    let value = match raw {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    value.is_finite().then_some(value)
}
