//! Inference Service
//!
//! raw observation → encode → engineer → persisted order → scaler → model
//! → risk band. The same feature code as training, with the training-time
//! scaler applied before the model.

use serde::Serialize;
use serde_json::Value;

use super::InferenceError;
use crate::logic::features::{EngineeredFeatures, FeatureOrder, FeatureVector, RawObservation};
use crate::logic::model::{ModelError, ProbabilisticClassifier, RiskLevel};
use crate::logic::pipeline::ScalingParameters;

// ============================================================================
// PREDICTION RESULT
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PredictionResult {
    /// Unrounded flood probability
    pub probability: f64,
    pub risk: RiskLevel,
}

impl PredictionResult {
    pub fn from_probability(probability: f64) -> Self {
        Self {
            probability,
            risk: RiskLevel::from_probability(probability),
        }
    }

    /// Probability rounded to 3 decimals for display
    pub fn rounded_probability(&self) -> f64 {
        (self.probability * 1000.0).round() / 1000.0
    }
}

// ============================================================================
// VALIDATION
// ============================================================================

/// Validate a JSON payload and engineer its features.
///
/// Needs no artifacts: missing fields, bad categories and malformed values
/// are all reported from here.
pub fn prepare(payload: &Value) -> Result<EngineeredFeatures, InferenceError> {
    let observation = RawObservation::from_json(payload)?;
    prepare_observation(&observation)
}

pub fn prepare_observation(observation: &RawObservation) -> Result<EngineeredFeatures, InferenceError> {
    let encoded = observation.encode()?;
    Ok(EngineeredFeatures::from_encoded(&encoded))
}

// ============================================================================
// SERVICE
// ============================================================================

/// Borrowed view over one model, its scaler and its feature order
pub struct InferenceService<'a, M: ProbabilisticClassifier + ?Sized> {
    model: &'a M,
    scaler: &'a ScalingParameters,
    order: &'a FeatureOrder,
}

impl<'a, M: ProbabilisticClassifier + ?Sized> InferenceService<'a, M> {
    pub fn new(model: &'a M, scaler: &'a ScalingParameters, order: &'a FeatureOrder) -> Self {
        Self { model, scaler, order }
    }

    pub fn feature_order(&self) -> &FeatureOrder {
        self.order
    }

    /// Lay features out in the persisted order
    pub fn assemble(&self, features: &EngineeredFeatures) -> Result<FeatureVector, InferenceError> {
        let vector = features.assemble(self.order)?;
        vector.validate(self.order)?;
        Ok(vector)
    }

    pub fn predict(&self, observation: &RawObservation) -> Result<PredictionResult, InferenceError> {
        let features = prepare_observation(observation)?;
        self.predict_engineered(&features)
    }

    pub fn predict_engineered(&self, features: &EngineeredFeatures) -> Result<PredictionResult, InferenceError> {
        let vector = self.assemble(features)?;
        let scaled = self.scaler.apply_row(vector.as_slice())?;
        let probability = self.model.predict_proba(&scaled)?;

        if !(0.0..=1.0).contains(&probability) {
            return Err(ModelError::InvalidProbability(probability).into());
        }

        let result = PredictionResult::from_probability(probability);
        log::debug!(
            "Prediction: probability={:.3} risk={}",
            result.probability,
            result.risk
        );
        Ok(result)
    }
}
