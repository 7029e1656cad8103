//! Flood Risk Core
//!
//! Feature pipeline shared by the offline training jobs and the online
//! inference server. Everything that turns a raw observation into model
//! input lives here so both paths run the same code.

pub mod constants;
pub mod logic;

pub use logic::artifacts::{ArtifactBundle, ArtifactError, ArtifactPaths, ArtifactSlot, ArtifactStore};
pub use logic::features::{EngineeredFeatures, FeatureOrder, RawObservation, FEATURE_COUNT};
pub use logic::inference::{InferenceError, InferenceService, PredictionResult};
pub use logic::model::RiskLevel;
