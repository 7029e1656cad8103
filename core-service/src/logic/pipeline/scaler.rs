//! Feature Scaler - standardization statistics
//!
//! Fit once on the training partition, persisted as `scaler.json`, then
//! applied unchanged to the test partition and to every inference vector.

use chrono::{DateTime, Utc};
use ndarray::{Array1, Array2, ArrayView2, Axis};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::logic::features::FeatureOrder;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ScalerError {
    #[error("cannot fit scaler on an empty partition")]
    EmptyPartition,

    #[error("expected {expected} features, got {actual}")]
    FeatureCount { expected: usize, actual: usize },

    #[error("scaling parameters are corrupt: {0}")]
    Corrupt(String),
}

/// Per-feature mean and standard deviation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScalingParameters {
    pub feature_version: u8,
    pub layout_hash: u32,
    pub n_samples: usize,
    pub mean: Vec<f64>,
    pub scale: Vec<f64>,
    pub fitted_at: DateTime<Utc>,
}

impl ScalingParameters {
    /// Fit on the training partition, columns laid out per `order`.
    ///
    /// Population standard deviation; a constant column gets scale 1.
    pub fn fit(train: ArrayView2<f64>, order: &FeatureOrder) -> Result<Self, ScalerError> {
        if train.ncols() != order.len() {
            return Err(ScalerError::FeatureCount {
                expected: order.len(),
                actual: train.ncols(),
            });
        }

        let mean = train.mean_axis(Axis(0)).ok_or(ScalerError::EmptyPartition)?;
        let std = train.std_axis(Axis(0), 0.0);
        let scale = std.mapv(|s| if s == 0.0 || !s.is_finite() { 1.0 } else { s });

        Ok(Self {
            feature_version: order.version(),
            layout_hash: order.layout_hash(),
            n_samples: train.nrows(),
            mean: mean.to_vec(),
            scale: scale.to_vec(),
            fitted_at: Utc::now(),
        })
    }

    pub fn n_features(&self) -> usize {
        self.mean.len()
    }

    /// Standardize every row of a matrix
    pub fn apply(&self, x: ArrayView2<f64>) -> Result<Array2<f64>, ScalerError> {
        self.check_width(x.ncols())?;
        let mean = Array1::from(self.mean.clone());
        let scale = Array1::from(self.scale.clone());
        Ok((&x - &mean) / &scale)
    }

    /// Standardize a single vector
    pub fn apply_row(&self, row: &[f64]) -> Result<Vec<f64>, ScalerError> {
        self.check_width(row.len())?;
        Ok(row
            .iter()
            .zip(self.mean.iter().zip(&self.scale))
            .map(|(x, (mean, scale))| (x - mean) / scale)
            .collect())
    }

    /// Re-check parameters read back from disk
    pub fn validate(&self) -> Result<(), ScalerError> {
        if self.mean.len() != self.scale.len() {
            return Err(ScalerError::Corrupt(format!(
                "{} means but {} scales",
                self.mean.len(),
                self.scale.len()
            )));
        }
        if self.mean.iter().any(|m| !m.is_finite()) {
            return Err(ScalerError::Corrupt("non-finite mean".to_string()));
        }
        if self.scale.iter().any(|s| !s.is_finite() || *s <= 0.0) {
            return Err(ScalerError::Corrupt("non-positive scale".to_string()));
        }
        Ok(())
    }

    fn check_width(&self, actual: usize) -> Result<(), ScalerError> {
        if actual != self.n_features() {
            return Err(ScalerError::FeatureCount {
                expected: self.n_features(),
                actual,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::features::FEATURE_COUNT;
    use ndarray::Array2;

    fn columns_matrix(rows: usize, f: impl Fn(usize, usize) -> f64) -> Array2<f64> {
        Array2::from_shape_fn((rows, FEATURE_COUNT), |(r, c)| f(r, c))
    }

    #[test]
    fn test_fit_mean_and_population_std() {
        // Column c holds c, c+2 → mean c+1, std 1
        let train = columns_matrix(2, |r, c| c as f64 + 2.0 * r as f64);
        let params = ScalingParameters::fit(train.view(), &FeatureOrder::canonical()).unwrap();

        assert_eq!(params.n_samples, 2);
        for c in 0..FEATURE_COUNT {
            assert!((params.mean[c] - (c as f64 + 1.0)).abs() < 1e-12);
            assert!((params.scale[c] - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn test_constant_column_maps_to_zero() {
        let train = columns_matrix(5, |r, c| if c == 3 { 7.0 } else { r as f64 });
        let params = ScalingParameters::fit(train.view(), &FeatureOrder::canonical()).unwrap();
        assert_eq!(params.scale[3], 1.0);

        let scaled = params.apply(train.view()).unwrap();
        assert!(scaled.column(3).iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_standardized_train_has_zero_mean_unit_std() {
        let train = columns_matrix(50, |r, c| (r * (c + 1)) as f64 * 0.37 + c as f64);
        let params = ScalingParameters::fit(train.view(), &FeatureOrder::canonical()).unwrap();
        let scaled = params.apply(train.view()).unwrap();

        let mean = scaled.mean_axis(Axis(0)).unwrap();
        let std = scaled.std_axis(Axis(0), 0.0);
        assert!(mean.iter().all(|m| m.abs() < 1e-9));
        assert!(std.iter().all(|s| (s - 1.0).abs() < 1e-9));
    }

    #[test]
    fn test_fit_ignores_test_partition_rows() {
        use crate::logic::dataset::LabeledDataset;
        use crate::logic::features::layout::idx;
        use crate::logic::features::EncodedObservation;
        use crate::logic::pipeline::{SplitConfig, TrainingPipeline};
        use crate::logic::testing::synthetic_dataset;

        let base = synthetic_dataset(100);
        let config = SplitConfig::default();
        let split = TrainingPipeline::engineer(&base).split(&config).unwrap();
        let test_rows = split.indices().test.clone();
        let original_test = split.test_partition().features.clone();
        let fitted = split.fit_scaler().unwrap();

        // Same labels, so the seeded split sends the same rows to test
        let mut observations = base.observations().to_vec();
        for &row in &test_rows {
            let mut values = *observations[row].values();
            values[idx::RAINFALL_MM] += 5_000.0;
            values[idx::ELEVATION_M] *= 10.0;
            values[idx::POPULATION_DENSITY] = 1e6;
            observations[row] = EncodedObservation::from_values(values).unwrap();
        }
        let altered = LabeledDataset::new(observations, base.labels().to_vec()).unwrap();

        let altered_split = TrainingPipeline::engineer(&altered).split(&config).unwrap();
        assert_eq!(altered_split.indices().test, test_rows);
        assert_ne!(altered_split.test_partition().features, original_test);

        let refitted = altered_split.fit_scaler().unwrap();
        assert_eq!(refitted.scaler().mean, fitted.scaler().mean);
        assert_eq!(refitted.scaler().scale, fitted.scaler().scale);
    }

    #[test]
    fn test_row_and_matrix_paths_agree() {
        let train = columns_matrix(10, |r, c| (r * r + c) as f64);
        let params = ScalingParameters::fit(train.view(), &FeatureOrder::canonical()).unwrap();

        let matrix = params.apply(train.view()).unwrap();
        for (r, row) in train.rows().into_iter().enumerate() {
            let single = params.apply_row(&row.to_vec()).unwrap();
            assert_eq!(single, matrix.row(r).to_vec());
        }
    }

    #[test]
    fn test_width_mismatch() {
        let params = ScalingParameters::fit(
            columns_matrix(3, |r, _| r as f64).view(),
            &FeatureOrder::canonical(),
        )
        .unwrap();
        assert_eq!(
            params.apply_row(&[1.0, 2.0]),
            Err(ScalerError::FeatureCount { expected: 16, actual: 2 })
        );

        let narrow = Array2::<f64>::zeros((2, 3));
        assert!(ScalingParameters::fit(narrow.view(), &FeatureOrder::canonical()).is_err());
    }

    #[test]
    fn test_empty_partition() {
        let empty = Array2::<f64>::zeros((0, FEATURE_COUNT));
        assert_eq!(
            ScalingParameters::fit(empty.view(), &FeatureOrder::canonical()),
            Err(ScalerError::EmptyPartition)
        );
    }

    #[test]
    fn test_validate_rejects_zero_scale() {
        let mut params = ScalingParameters::fit(
            columns_matrix(3, |r, _| r as f64).view(),
            &FeatureOrder::canonical(),
        )
        .unwrap();
        assert!(params.validate().is_ok());
        params.scale[0] = 0.0;
        assert!(params.validate().is_err());
    }
}
