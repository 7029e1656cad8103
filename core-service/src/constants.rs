//! Central Configuration Constants
//!
//! Single source of truth for pipeline defaults.
//! Environment variables in `logic::config` override these.

/// Default processed dataset location
pub const DEFAULT_DATA_PATH: &str = "ml/data/flood_data_processed.csv";

/// Binary label column in the training dataset
pub const DEFAULT_TARGET_COLUMN: &str = "Flood_Occurred";

/// Directory holding model.json, scaler.json and feature_columns.json
pub const DEFAULT_ARTIFACT_DIR: &str = "ml/artifacts";

/// Held-out fraction for the stratified split
pub const DEFAULT_TEST_SIZE: f64 = 0.2;

/// Seed shared by the split and the forest
pub const DEFAULT_RANDOM_STATE: u64 = 42;

// Forest hyperparameters
pub const DEFAULT_N_ESTIMATORS: usize = 300;
pub const DEFAULT_MAX_DEPTH: usize = 12;
pub const DEFAULT_MIN_SAMPLES_SPLIT: usize = 10;
pub const DEFAULT_MIN_SAMPLES_LEAF: usize = 5;

/// App version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// App name
pub const APP_NAME: &str = "Flood Risk";
