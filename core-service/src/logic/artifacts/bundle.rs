//! Artifact Bundle - immutable model + scaler + order
//!
//! Built once (after training or at server startup) and shared by reference.
//! Construction cross-checks the three artifacts so a bundle that exists is
//! always usable for inference.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use super::ArtifactError;
use crate::logic::features::layout::LayoutInfo;
use crate::logic::features::FeatureOrder;
use crate::logic::inference::InferenceService;
use crate::logic::model::{ProbabilisticClassifier, RandomForest};
use crate::logic::pipeline::ScalingParameters;

// ============================================================================
// MODEL ARTIFACT
// ============================================================================

/// Fitted forest plus the layout it was trained against
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelArtifact {
    pub feature_version: u8,
    pub layout_hash: u32,
    pub trained_at: DateTime<Utc>,
    pub model: RandomForest,
}

impl ModelArtifact {
    pub fn new(model: RandomForest, order: &FeatureOrder) -> Self {
        Self {
            feature_version: order.version(),
            layout_hash: order.layout_hash(),
            trained_at: Utc::now(),
            model,
        }
    }
}

// ============================================================================
// BUNDLE
// ============================================================================

#[derive(Debug)]
pub struct ArtifactBundle {
    model: ModelArtifact,
    scaler: ScalingParameters,
    order: FeatureOrder,
    loaded_at: DateTime<Utc>,
}

impl ArtifactBundle {
    pub fn new(
        model: ModelArtifact,
        scaler: ScalingParameters,
        order: FeatureOrder,
    ) -> Result<Self, ArtifactError> {
        order.validate()?;
        scaler.validate()?;
        model.model.validate()?;

        order.ensure_matches(scaler.feature_version, scaler.layout_hash)?;
        order.ensure_matches(model.feature_version, model.layout_hash)?;

        if scaler.n_features() != order.len() {
            return Err(ArtifactError::Inconsistent(format!(
                "scaler has {} features, feature order has {}",
                scaler.n_features(),
                order.len()
            )));
        }
        if model.model.n_features() != order.len() {
            return Err(ArtifactError::Inconsistent(format!(
                "model expects {} features, feature order has {}",
                model.model.n_features(),
                order.len()
            )));
        }

        Ok(Self {
            model,
            scaler,
            order,
            loaded_at: Utc::now(),
        })
    }

    pub fn model(&self) -> &RandomForest {
        &self.model.model
    }

    pub fn model_artifact(&self) -> &ModelArtifact {
        &self.model
    }

    pub fn scaler(&self) -> &ScalingParameters {
        &self.scaler
    }

    pub fn feature_order(&self) -> &FeatureOrder {
        &self.order
    }

    pub fn loaded_at(&self) -> DateTime<Utc> {
        self.loaded_at
    }

    pub fn trained_at(&self) -> DateTime<Utc> {
        self.model.trained_at
    }

    pub fn layout_info(&self) -> LayoutInfo {
        LayoutInfo::from(&self.order)
    }

    /// Inference over this bundle
    pub fn service(&self) -> InferenceService<'_, RandomForest> {
        InferenceService::new(&self.model.model, &self.scaler, &self.order)
    }
}

// ============================================================================
// SLOT (hot swap)
// ============================================================================

/// Shared holder for the current bundle.
///
/// Readers clone the `Arc` and release the lock immediately; a replacement
/// only affects requests that start after it.
#[derive(Debug, Default)]
pub struct ArtifactSlot {
    current: RwLock<Option<Arc<ArtifactBundle>>>,
}

impl ArtifactSlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self) -> Option<Arc<ArtifactBundle>> {
        self.current.read().clone()
    }

    /// Install a new bundle, returning the previous one
    pub fn replace(&self, bundle: impl Into<Arc<ArtifactBundle>>) -> Option<Arc<ArtifactBundle>> {
        self.current.write().replace(bundle.into())
    }

    pub fn clear(&self) -> Option<Arc<ArtifactBundle>> {
        self.current.write().take()
    }

    pub fn is_loaded(&self) -> bool {
        self.current.read().is_some()
    }
}
