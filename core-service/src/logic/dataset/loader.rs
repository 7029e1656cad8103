//! CSV loader
//!
//! Columns are located by header name, so column order in the file does not
//! matter. Extra columns are ignored.

use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use crate::logic::features::encoding::{self, CategoricalField};
use crate::logic::features::layout::{idx, RAW_FEATURES, RAW_FEATURE_COUNT, RIVER_DISCHARGE_ALIAS};
use crate::logic::features::EncodedObservation;

use super::{DatasetError, LabeledDataset};

/// Load a labeled dataset from a CSV file
pub fn load_csv(path: &Path, target_column: &str) -> Result<LabeledDataset, DatasetError> {
    log::info!("Loading dataset from: {}", path.display());
    let file = std::fs::File::open(path).map_err(csv::Error::from)?;
    let dataset = read_csv(file, target_column)?;

    let [negatives, positives] = dataset.class_counts();
    log::info!(
        "Dataset loaded: {} rows ({} flood, {} no flood)",
        dataset.len(),
        positives,
        negatives
    );
    Ok(dataset)
}

/// Read a labeled dataset from any CSV source
pub fn read_csv<R: Read>(source: R, target_column: &str) -> Result<LabeledDataset, DatasetError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(source);

    let headers: HashMap<String, usize> = reader
        .headers()?
        .iter()
        .enumerate()
        .map(|(i, name)| (name.to_string(), i))
        .collect();

    let columns = resolve_columns(&headers, target_column)?;

    let unused = headers.len().saturating_sub(RAW_FEATURE_COUNT + 1);
    if unused > 0 {
        log::warn!("Ignoring {} dataset column(s) outside the feature schema", unused);
    }

    let mut observations = Vec::new();
    let mut labels = Vec::new();

    for (i, record) in reader.records().enumerate() {
        let record = record?;
        // Header is line 1
        let row = i + 2;

        let mut values = [0.0; RAW_FEATURE_COUNT];
        for (index, &column) in columns.features.iter().enumerate() {
            let cell = record.get(column).unwrap_or("");
            values[index] = match categorical_field(index) {
                Some(field) => parse_category(field, cell, row)?,
                None => parse_number(cell, RAW_FEATURES[index], row)?,
            };
        }

        let label_cell = record.get(columns.target).unwrap_or("");
        labels.push(parse_label(label_cell, row)?);

        let observation = EncodedObservation::from_values(values)
            .map_err(|source| DatasetError::InvalidCategory { row, source })?;
        observations.push(observation);
    }

    LabeledDataset::new(observations, labels)
}

struct Columns {
    features: [usize; RAW_FEATURE_COUNT],
    target: usize,
}

fn resolve_columns(headers: &HashMap<String, usize>, target_column: &str) -> Result<Columns, DatasetError> {
    let mut missing = Vec::new();
    let mut features = [0usize; RAW_FEATURE_COUNT];

    for (index, name) in RAW_FEATURES.iter().enumerate() {
        let position = headers.get(*name).or_else(|| {
            if index == idx::RIVER_DISCHARGE {
                headers.get(RIVER_DISCHARGE_ALIAS)
            } else {
                None
            }
        });
        match position {
            Some(&p) => features[index] = p,
            None => missing.push(name.to_string()),
        }
    }

    let target = headers.get(target_column).copied();
    if target.is_none() {
        missing.push(target_column.to_string());
    }

    match target {
        Some(target) if missing.is_empty() => Ok(Columns { features, target }),
        _ => Err(DatasetError::MissingColumns(missing)),
    }
}

fn categorical_field(index: usize) -> Option<CategoricalField> {
    match index {
        idx::LAND_COVER => Some(CategoricalField::LandCover),
        idx::SOIL_TYPE => Some(CategoricalField::SoilType),
        _ => None,
    }
}

fn parse_number(cell: &str, column: &str, row: usize) -> Result<f64, DatasetError> {
    cell.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| DatasetError::InvalidNumber {
            row,
            column: column.to_string(),
            value: cell.to_string(),
        })
}

/// Processed datasets carry integer codes, raw ones carry names
fn parse_category(field: CategoricalField, cell: &str, row: usize) -> Result<f64, DatasetError> {
    let code = match cell.parse::<i64>() {
        Ok(code) => encoding::check_code(field, code),
        Err(_) => encoding::encode(field, cell),
    };
    code.map(f64::from)
        .map_err(|source| DatasetError::InvalidCategory { row, source })
}

fn parse_label(cell: &str, row: usize) -> Result<u8, DatasetError> {
    match cell.trim().parse::<f64>() {
        Ok(v) if v == 0.0 => Ok(0),
        Ok(v) if v == 1.0 => Ok(1),
        _ => Err(DatasetError::InvalidLabel {
            row,
            value: cell.to_string(),
        }),
    }
}
