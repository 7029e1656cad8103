//! Dataset Module - Labeled training data
//!
//! Loads the processed flood dataset into encoded observations plus binary
//! labels. Categorical columns go through the same encoder as requests.

pub mod loader;

#[cfg(test)]
mod tests;

pub use loader::{load_csv, read_csv};

use thiserror::Error;

use crate::logic::features::{EncodedObservation, EncodingError};

#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("failed to read dataset: {0}")]
    Csv(#[from] csv::Error),

    #[error("dataset is missing required columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    #[error("row {row}: column {column} has non-numeric value '{value}'")]
    InvalidNumber { row: usize, column: String, value: String },

    #[error("row {row}: {source}")]
    InvalidCategory { row: usize, source: EncodingError },

    #[error("row {row}: label '{value}' is not 0 or 1")]
    InvalidLabel { row: usize, value: String },

    #[error("{observations} observations but {labels} labels")]
    LengthMismatch { observations: usize, labels: usize },

    #[error("dataset has no rows")]
    Empty,
}

/// Encoded observations with a 0/1 flood label per row
#[derive(Debug, Clone, PartialEq)]
pub struct LabeledDataset {
    observations: Vec<EncodedObservation>,
    labels: Vec<u8>,
}

impl LabeledDataset {
    pub fn new(observations: Vec<EncodedObservation>, labels: Vec<u8>) -> Result<Self, DatasetError> {
        if observations.len() != labels.len() {
            return Err(DatasetError::LengthMismatch {
                observations: observations.len(),
                labels: labels.len(),
            });
        }
        if observations.is_empty() {
            return Err(DatasetError::Empty);
        }
        if let Some(position) = labels.iter().position(|&l| l > 1) {
            return Err(DatasetError::InvalidLabel {
                row: position,
                value: labels[position].to_string(),
            });
        }
        Ok(Self { observations, labels })
    }

    pub fn observations(&self) -> &[EncodedObservation] {
        &self.observations
    }

    pub fn labels(&self) -> &[u8] {
        &self.labels
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Row count per class: `[negatives, positives]`
    pub fn class_counts(&self) -> [usize; 2] {
        let positives = self.labels.iter().filter(|&&l| l == 1).count();
        [self.labels.len() - positives, positives]
    }
}
