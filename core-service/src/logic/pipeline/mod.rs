//! Pipeline Module - offline training
//!
//! Split and scaling primitives, the staged pipeline that enforces their
//! order, and the training job that persists the resulting bundle.

pub mod scaler;
pub mod split;
pub mod stages;
pub mod train;


pub use scaler::{ScalerError, ScalingParameters};
pub use split::{stratified_split, SplitConfig, SplitError, SplitIndices};
pub use stages::{EngineeredDataset, Partition, TrainingPipeline};
pub use train::{train_and_persist, train_bundle, TrainingSummary};

use thiserror::Error;

use crate::logic::artifacts::ArtifactError;
use crate::logic::features::LayoutError;
use crate::logic::model::ModelError;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("split failed: {0}")]
    Split(#[from] SplitError),

    #[error("scaling failed: {0}")]
    Scaler(#[from] ScalerError),

    #[error("model training failed: {0}")]
    Model(#[from] ModelError),

    #[error(transparent)]
    Layout(#[from] LayoutError),

    #[error(transparent)]
    Artifact(#[from] ArtifactError),
}
