//! Pipeline configuration
//!
//! Defaults live in [`crate::constants`]; `FLOOD_*` environment variables
//! override them. Unparseable values fall back to the default with a warning.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use crate::constants::*;
use crate::logic::artifacts::ArtifactStore;
use crate::logic::model::ForestConfig;
use crate::logic::pipeline::SplitConfig;

/// Configuration shared by the train and evaluate jobs
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineConfig {
    /// Processed CSV dataset
    pub data_path: PathBuf,

    /// Binary label column
    pub target_column: String,

    /// Directory for model/scaler/feature_columns JSON
    pub artifact_dir: PathBuf,

    pub split: SplitConfig,

    pub forest: ForestConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from(DEFAULT_DATA_PATH),
            target_column: DEFAULT_TARGET_COLUMN.to_string(),
            artifact_dir: PathBuf::from(DEFAULT_ARTIFACT_DIR),
            split: SplitConfig::default(),
            forest: ForestConfig::default(),
        }
    }
}

impl PipelineConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let seed = parse_var("FLOOD_RANDOM_STATE", defaults.split.seed);

        Self {
            data_path: env::var("FLOOD_DATA_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.data_path),

            target_column: env::var("FLOOD_TARGET_COLUMN").unwrap_or(defaults.target_column),

            artifact_dir: env::var("FLOOD_ARTIFACT_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.artifact_dir),

            split: SplitConfig {
                test_fraction: parse_var("FLOOD_TEST_SIZE", defaults.split.test_fraction),
                seed,
            },

            forest: ForestConfig {
                n_estimators: parse_var("FLOOD_N_ESTIMATORS", defaults.forest.n_estimators),
                max_depth: parse_var("FLOOD_MAX_DEPTH", defaults.forest.max_depth),
                min_samples_split: parse_var("FLOOD_MIN_SAMPLES_SPLIT", defaults.forest.min_samples_split),
                min_samples_leaf: parse_var("FLOOD_MIN_SAMPLES_LEAF", defaults.forest.min_samples_leaf),
                seed,
                ..defaults.forest
            },
        }
    }

    pub fn artifact_store(&self) -> ArtifactStore {
        ArtifactStore::new(&self.artifact_dir)
    }
}

fn parse_var<T: FromStr + Copy>(name: &str, default: T) -> T {
    match env::var(name) {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|_| {
            log::warn!("Ignoring invalid {}={:?}", name, raw);
            default
        }),
        Err(_) => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = PipelineConfig::default();
        assert_eq!(config.target_column, "Flood_Occurred");
        assert_eq!(config.artifact_dir, PathBuf::from("ml/artifacts"));
        assert_eq!(config.split.test_fraction, 0.2);
        assert_eq!(config.split.seed, 42);
        assert_eq!(config.forest.seed, 42);
        assert_eq!(config.forest.n_estimators, 300);
    }

    #[test]
    fn test_parse_var_fallback() {
        // Unset variable keeps the default
        assert_eq!(parse_var("FLOOD_TEST_UNSET_VARIABLE_XYZ", 7usize), 7);
    }

    #[test]
    fn test_artifact_store_paths() {
        let config = PipelineConfig {
            artifact_dir: PathBuf::from("/tmp/flood"),
            ..Default::default()
        };
        let store = config.artifact_store();
        assert_eq!(store.paths().model, PathBuf::from("/tmp/flood/model.json"));
        assert_eq!(store.paths().scaler, PathBuf::from("/tmp/flood/scaler.json"));
        assert_eq!(
            store.paths().feature_columns,
            PathBuf::from("/tmp/flood/feature_columns.json")
        );
    }
}
