//! Logic Module - Pipeline stages
//!
//! ## Layout
//! - `features/` - encoding, derived features, feature order
//! - `dataset/` - labeled dataset loading
//! - `pipeline/` - split, scaler, staged training pipeline
//! - `model/` - forest classifier and risk categories
//! - `artifacts/` - persisted model/scaler/order bundle
//! - `inference/` - single observation prediction
//! - `evaluation/` - held-out metrics

pub mod config;
pub mod features;
pub mod dataset;
pub mod pipeline;
pub mod model;
pub mod artifacts;
pub mod inference;
pub mod evaluation;

#[cfg(test)]
pub(crate) mod testing;
