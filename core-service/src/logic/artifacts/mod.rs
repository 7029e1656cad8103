//! Artifacts Module - persisted model, scaler and feature order
//!
//! ## Files (under one artifact directory)
//! - `model.json` - fitted forest plus the layout hash it was trained on
//! - `scaler.json` - training-partition mean/scale
//! - `feature_columns.json` - persisted [`FeatureOrder`](crate::logic::features::FeatureOrder)
//!
//! Loading produces one immutable [`ArtifactBundle`]; the server keeps it in
//! an [`ArtifactSlot`] and swaps it atomically on reload.

pub mod bundle;
pub mod store;


pub use bundle::{ArtifactBundle, ArtifactSlot, ModelArtifact};
pub use store::{ArtifactPaths, ArtifactStore, FEATURE_COLUMNS_FILE, MODEL_FILE, SCALER_FILE};

use std::path::PathBuf;

use thiserror::Error;

use crate::logic::features::LayoutError;
use crate::logic::model::ModelError;
use crate::logic::pipeline::ScalerError;

#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("artifact not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("failed to access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("artifact {} is corrupt: {source}", path.display())]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    Layout(#[from] LayoutError),

    #[error(transparent)]
    Scaler(#[from] ScalerError),

    #[error(transparent)]
    Model(#[from] ModelError),

    #[error("artifacts are inconsistent: {0}")]
    Inconsistent(String),
}

impl ArtifactError {
    /// True when at least one artifact file does not exist yet
    pub fn is_missing(&self) -> bool {
        matches!(self, ArtifactError::NotFound(_))
    }
}
