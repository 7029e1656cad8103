//! Feature Vector - Core data structure for ML input
//!
//! **Versioned feature vector with layout validation**
//!
//! Only [`EngineeredFeatures::assemble`](super::EngineeredFeatures::assemble)
//! builds one, so the values are always laid out in a known persisted order.

use serde::{Deserialize, Serialize};

use super::layout::{validate_layout, FeatureOrder, LayoutError};

// ============================================================================
// VERSIONED FEATURE VECTOR
// ============================================================================

/// Feature values plus the layout they were assembled for
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    /// Feature layout version
    version: u8,
    /// CRC32 hash of the feature order (for mismatch detection)
    layout_hash: u32,
    /// Feature values in the order of the originating FeatureOrder
    values: Vec<f64>,
}

impl FeatureVector {
    pub(crate) fn new(order: &FeatureOrder, values: Vec<f64>) -> Self {
        Self {
            version: order.version(),
            layout_hash: order.layout_hash(),
            values,
        }
    }

    pub fn version(&self) -> u8 {
        self.version
    }

    pub fn layout_hash(&self) -> u32 {
        self.layout_hash
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<f64> {
        self.values.get(index).copied()
    }

    /// Get feature by name, resolved through the order it was built for
    pub fn get_by_name(&self, order: &FeatureOrder, name: &str) -> Option<f64> {
        order.position(name).and_then(|i| self.get(i))
    }

    /// Validate that this vector was assembled for `order`
    pub fn validate(&self, order: &FeatureOrder) -> Result<(), LayoutError> {
        validate_layout(order.version(), order.layout_hash(), self.version, self.layout_hash)
    }

    /// Convert to JSON-serializable format for logging
    pub fn to_log_entry(&self, order: &FeatureOrder) -> serde_json::Value {
        serde_json::json!({
            "feature_version": self.version,
            "layout_hash": self.layout_hash,
            "values": self.values,
            "named_values": order.columns().iter()
                .zip(self.values.iter())
                .map(|(name, value)| (name.clone(), *value))
                .collect::<std::collections::BTreeMap<_, _>>(),
        })
    }
}

// ============================================================================
// TESTS
// ============================================================================
