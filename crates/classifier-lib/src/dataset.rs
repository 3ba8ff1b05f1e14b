//! Embedded wine dataset
//!
//! Supplies the fixed 13-feature matrix and class labels the model is
//! trained on. The CSV is compiled into the binary; loading has no side
//! effects and validates that the column order matches the serving schema.

use crate::error::DatasetError;
use crate::models::{Dataset, FeatureVector, LabeledSample, NUM_FEATURES};
use crate::schema::FEATURE_NAMES;

/// Number of classes in the wine label set
pub const NUM_CLASSES: usize = 3;

const WINE_CSV: &str = include_str!("../data/wine.csv");

/// Load the embedded wine dataset.
pub fn load() -> Result<Dataset, DatasetError> {
    parse_csv(WINE_CSV)
}

fn parse_csv(raw: &str) -> Result<Dataset, DatasetError> {
    let mut lines = raw.lines().filter(|l| !l.trim().is_empty());

    let header = lines.next().ok_or(DatasetError::Empty)?;
    validate_header(header)?;

    let mut samples = Vec::new();
    for (row, line) in lines.enumerate() {
        samples.push(parse_row(row, line)?);
    }

    if samples.is_empty() {
        return Err(DatasetError::Empty);
    }

    Ok(Dataset {
        samples,
        n_classes: NUM_CLASSES,
    })
}

/// The CSV column order is the positional contract the trees are trained
/// on; a drift between it and the serving schema must fail startup.
fn validate_header(header: &str) -> Result<(), DatasetError> {
    let columns: Vec<&str> = header.split(',').map(str::trim).collect();
    if columns.len() != NUM_FEATURES + 1 || columns[NUM_FEATURES] != "class" {
        return Err(DatasetError::HeaderMismatch);
    }
    for (column, expected) in columns.iter().zip(FEATURE_NAMES.iter()) {
        if column != expected {
            return Err(DatasetError::HeaderMismatch);
        }
    }
    Ok(())
}

fn parse_row(row: usize, line: &str) -> Result<LabeledSample, DatasetError> {
    let fields: Vec<&str> = line.split(',').map(str::trim).collect();
    if fields.len() != NUM_FEATURES + 1 {
        return Err(DatasetError::MalformedRow {
            row,
            reason: format!("expected {} columns, found {}", NUM_FEATURES + 1, fields.len()),
        });
    }

    let mut values = [0.0; NUM_FEATURES];
    for (i, field) in fields[..NUM_FEATURES].iter().enumerate() {
        values[i] = field.parse::<f64>().map_err(|e| DatasetError::MalformedRow {
            row,
            reason: format!("column `{}`: {e}", FEATURE_NAMES[i]),
        })?;
    }

    let label: i64 = fields[NUM_FEATURES]
        .parse()
        .map_err(|e| DatasetError::MalformedRow {
            row,
            reason: format!("class label: {e}"),
        })?;
    if label < 0 || label as usize >= NUM_CLASSES {
        return Err(DatasetError::LabelOutOfRange {
            row,
            label,
            n_classes: NUM_CLASSES,
        });
    }

    Ok(LabeledSample {
        features: FeatureVector::from_array(values),
        label: label as usize,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedded_dataset_loads() {
        let dataset = load().unwrap();
        assert_eq!(dataset.len(), 178);
        assert_eq!(dataset.n_classes, NUM_CLASSES);
    }

    #[test]
    fn test_all_classes_present() {
        let dataset = load().unwrap();
        for label in 0..NUM_CLASSES {
            assert!(
                dataset.samples.iter().any(|s| s.label == label),
                "class {label} missing from dataset"
            );
        }
    }

    #[test]
    fn test_values_are_finite() {
        let dataset = load().unwrap();
        for sample in &dataset.samples {
            assert!(sample.features.to_array().iter().all(|v| v.is_finite()));
        }
    }

    #[test]
    fn test_empty_input_is_rejected() {
        assert!(matches!(parse_csv(""), Err(DatasetError::Empty)));
    }

    #[test]
    fn test_header_only_is_rejected() {
        let header = format!("{},class", FEATURE_NAMES.join(","));
        assert!(matches!(parse_csv(&header), Err(DatasetError::Empty)));
    }

    #[test]
    fn test_wrong_header_is_rejected() {
        let csv = "a,b,c\n1,2,0\n";
        assert!(matches!(parse_csv(csv), Err(DatasetError::HeaderMismatch)));
    }

    #[test]
    fn test_short_row_is_rejected() {
        let csv = format!("{},class\n1.0,2.0\n", FEATURE_NAMES.join(","));
        assert!(matches!(
            parse_csv(&csv),
            Err(DatasetError::MalformedRow { row: 0, .. })
        ));
    }

    #[test]
    fn test_out_of_range_label_is_rejected() {
        let row: Vec<String> = (0..NUM_FEATURES).map(|i| format!("{i}.0")).collect();
        let csv = format!("{},class\n{},7\n", FEATURE_NAMES.join(","), row.join(","));
        assert!(matches!(
            parse_csv(&csv),
            Err(DatasetError::LabelOutOfRange { label: 7, .. })
        ));
    }
}
