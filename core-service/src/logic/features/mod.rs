//! Features Module - Feature Construction
//!
//! Raw observation → encoded observation → engineered features → vector in
//! the persisted order. Used unchanged by training and by inference.

pub mod layout;
pub mod encoding;
pub mod observation;
pub mod engineer;
pub mod vector;

#[cfg(test)]
mod tests;

// Re-export common types
pub use layout::{FeatureOrder, LayoutError, FEATURE_COUNT, FEATURE_LAYOUT, RAW_FEATURE_COUNT};
pub use encoding::{CategoricalField, EncodingError, LandCover, SoilType};
pub use observation::{EncodedObservation, ObservationError, RawObservation};
pub use engineer::{DerivedFeatures, EngineeredFeatures};
pub use vector::FeatureVector;
