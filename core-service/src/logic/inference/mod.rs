//! Inference Module - single observation prediction
//!
//! Request validation ([`prepare`]) is separate from the model call
//! ([`InferenceService`]), so bad input is rejected before any artifact is
//! touched.

pub mod service;


pub use service::{prepare, prepare_observation, InferenceService, PredictionResult};

use thiserror::Error;

use crate::logic::artifacts::ArtifactError;
use crate::logic::features::{EncodingError, LayoutError, ObservationError};
use crate::logic::model::ModelError;
use crate::logic::pipeline::ScalerError;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum InferenceError {
    #[error("missing required features: {}", .0.join(", "))]
    MissingFeatures(Vec<String>),

    #[error("invalid value '{value}' for {field}")]
    InvalidCategory { field: String, value: String },

    #[error("malformed payload: {0}")]
    MalformedPayload(String),

    #[error("model unavailable: {0}")]
    ModelUnavailable(String),

    #[error("internal failure: {0}")]
    Internal(String),
}

impl From<EncodingError> for InferenceError {
    fn from(err: EncodingError) -> Self {
        match err {
            EncodingError::InvalidCategory { field, value } => InferenceError::InvalidCategory {
                field: field.to_string(),
                value,
            },
            EncodingError::InvalidCode { field, code } => InferenceError::InvalidCategory {
                field: field.to_string(),
                value: code.to_string(),
            },
            EncodingError::UnknownField(_) => InferenceError::Internal(err.to_string()),
        }
    }
}

impl From<ObservationError> for InferenceError {
    fn from(err: ObservationError) -> Self {
        match err {
            ObservationError::MissingFeatures(missing) => InferenceError::MissingFeatures(missing),
            ObservationError::InvalidCategory(inner) => inner.into(),
            ObservationError::NotAnObject | ObservationError::NotNumeric { .. } => {
                InferenceError::MalformedPayload(err.to_string())
            }
        }
    }
}

impl From<ArtifactError> for InferenceError {
    fn from(err: ArtifactError) -> Self {
        if err.is_missing() {
            InferenceError::ModelUnavailable(err.to_string())
        } else {
            InferenceError::Internal(err.to_string())
        }
    }
}

impl From<LayoutError> for InferenceError {
    fn from(err: LayoutError) -> Self {
        InferenceError::Internal(err.to_string())
    }
}

impl From<ScalerError> for InferenceError {
    fn from(err: ScalerError) -> Self {
        InferenceError::Internal(err.to_string())
    }
}

impl From<ModelError> for InferenceError {
    fn from(err: ModelError) -> Self {
        InferenceError::Internal(err.to_string())
    }
}
