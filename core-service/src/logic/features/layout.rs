//! Feature Layout - Centralized Feature Definition
//!
//! **CRITICAL: This file controls the feature schema**
//!
//! ## Rules (NEVER break these):
//! 1. Add feature → increment FEATURE_VERSION
//! 2. Change order → increment FEATURE_VERSION
//! 3. Remove feature → increment FEATURE_VERSION
//!
//! The order used at training time is persisted as a [`FeatureOrder`]
//! (`feature_columns.json`). Inference assembles vectors from that persisted
//! order, never from this constant directly, so a retrained model with a
//! different column order keeps working.

use crc32fast::Hasher;
use serde::{Deserialize, Serialize};
use thiserror::Error;

// ============================================================================
// FEATURE VERSION
// ============================================================================

/// Current feature layout version
/// MUST be incremented when layout changes
pub const FEATURE_VERSION: u8 = 1;

// ============================================================================
// FEATURE LAYOUT (Authoritative source)
// ============================================================================

/// Raw request/dataset fields, in canonical order
pub const RAW_FEATURES: &[&str] = &[
    "Latitude",             // 0
    "Longitude",            // 1
    "Rainfall_mm",          // 2
    "Temperature_C",        // 3
    "Humidity_%",           // 4
    "River_Discharge_m³_s", // 5
    "Water_Level_m",        // 6
    "Elevation_m",          // 7
    "Land_Cover",           // 8: categorical, encoded
    "Soil_Type",            // 9: categorical, encoded
    "Population_Density",   // 10
    "Infrastructure",       // 11
    "Historical_Floods",    // 12
];

/// Number of raw fields
pub const RAW_FEATURE_COUNT: usize = 13;

/// Derived fields appended by the feature engineer
pub const DERIVED_FEATURES: &[&str] = &[
    "Rainfall_WaterLevel", // 13: Rainfall_mm * Water_Level_m
    "Flood_Pressure",      // 14: River_Discharge / (Elevation_m + 1)
    "Exposure_Index",      // 15: Population_Density * Infrastructure
];

/// Full 16 column layout (raw followed by derived)
pub const FEATURE_LAYOUT: &[&str] = &[
    "Latitude",
    "Longitude",
    "Rainfall_mm",
    "Temperature_C",
    "Humidity_%",
    "River_Discharge_m³_s",
    "Water_Level_m",
    "Elevation_m",
    "Land_Cover",
    "Soil_Type",
    "Population_Density",
    "Infrastructure",
    "Historical_Floods",
    "Rainfall_WaterLevel",
    "Flood_Pressure",
    "Exposure_Index",
];

/// Total number of features
/// IMPORTANT: Must match FEATURE_LAYOUT.len()!
pub const FEATURE_COUNT: usize = 16;

/// Short name accepted for the river discharge field
pub const RIVER_DISCHARGE_ALIAS: &str = "River_Discharge";

/// Positions of raw fields inside the canonical layout
pub mod idx {
    pub const LATITUDE: usize = 0;
    pub const LONGITUDE: usize = 1;
    pub const RAINFALL_MM: usize = 2;
    pub const TEMPERATURE_C: usize = 3;
    pub const HUMIDITY_PCT: usize = 4;
    pub const RIVER_DISCHARGE: usize = 5;
    pub const WATER_LEVEL_M: usize = 6;
    pub const ELEVATION_M: usize = 7;
    pub const LAND_COVER: usize = 8;
    pub const SOIL_TYPE: usize = 9;
    pub const POPULATION_DENSITY: usize = 10;
    pub const INFRASTRUCTURE: usize = 11;
    pub const HISTORICAL_FLOODS: usize = 12;
    pub const RAINFALL_WATER_LEVEL: usize = 13;
    pub const FLOOD_PRESSURE: usize = 14;
    pub const EXPOSURE_INDEX: usize = 15;
}

// ============================================================================
// LAYOUT HASH
// ============================================================================

/// Compute CRC32 hash of an ordered list of column names
/// Used to detect layout mismatches between artifacts
pub fn compute_layout_hash<S: AsRef<str>>(columns: &[S]) -> u32 {
    let mut hasher = Hasher::new();

    // Include version in hash
    hasher.update(&[FEATURE_VERSION]);

    for name in columns {
        hasher.update(name.as_ref().as_bytes());
        hasher.update(&[0]); // Separator
    }

    hasher.finalize()
}

/// Hash of the canonical layout
pub fn layout_hash() -> u32 {
    compute_layout_hash(FEATURE_LAYOUT)
}

// ============================================================================
// FEATURE INDEX LOOKUP
// ============================================================================

/// Get canonical feature index by name (O(n) but features are few)
pub fn feature_index(name: &str) -> Option<usize> {
    if name == RIVER_DISCHARGE_ALIAS {
        return Some(idx::RIVER_DISCHARGE);
    }
    FEATURE_LAYOUT.iter().position(|&n| n == name)
}

/// Get canonical feature name by index
pub fn feature_name(index: usize) -> Option<&'static str> {
    FEATURE_LAYOUT.get(index).copied()
}

// ============================================================================
// LAYOUT ERRORS
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LayoutError {
    #[error("feature order has {actual} columns, expected {expected}")]
    WrongLength { expected: usize, actual: usize },

    #[error("unknown feature column '{0}'")]
    UnknownColumn(String),

    #[error("duplicate feature column '{0}'")]
    DuplicateColumn(String),

    #[error(
        "feature layout mismatch: expected v{expected_version} (hash: {expected_hash:08x}), \
         got v{actual_version} (hash: {actual_hash:08x})"
    )]
    Mismatch {
        expected_version: u8,
        expected_hash: u32,
        actual_version: u8,
        actual_hash: u32,
    },
}

// ============================================================================
// PERSISTED FEATURE ORDER
// ============================================================================

/// Column order fixed at training time.
///
/// Persisted next to the model; every inference vector is assembled in this
/// order. Reordering without retraining silently produces wrong predictions,
/// which is why the hash travels with the scaler and model artifacts too.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureOrder {
    version: u8,
    layout_hash: u32,
    columns: Vec<String>,
}

impl FeatureOrder {
    /// Canonical order: raw fields followed by derived fields
    pub fn canonical() -> Self {
        Self {
            version: FEATURE_VERSION,
            layout_hash: layout_hash(),
            columns: FEATURE_LAYOUT.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Build an order from column names, checking it is a permutation of the layout
    pub fn from_columns<S: AsRef<str>>(columns: &[S]) -> Result<Self, LayoutError> {
        let columns: Vec<String> = columns.iter().map(|c| c.as_ref().to_string()).collect();
        check_columns(&columns)?;

        Ok(Self {
            version: FEATURE_VERSION,
            layout_hash: compute_layout_hash(&columns),
            columns,
        })
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn version(&self) -> u8 {
        self.version
    }

    pub fn layout_hash(&self) -> u32 {
        self.layout_hash
    }

    /// Position of a column in this order
    pub fn position(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Canonical layout index for each position of this order
    pub fn canonical_indices(&self) -> Result<Vec<usize>, LayoutError> {
        self.columns
            .iter()
            .map(|c| feature_index(c).ok_or_else(|| LayoutError::UnknownColumn(c.clone())))
            .collect()
    }

    /// Re-check an order read back from disk
    pub fn validate(&self) -> Result<(), LayoutError> {
        check_columns(&self.columns)?;
        validate_layout(
            FEATURE_VERSION,
            compute_layout_hash(&self.columns),
            self.version,
            self.layout_hash,
        )
    }

    /// Ensure an artifact was produced against this order
    pub fn ensure_matches(&self, version: u8, hash: u32) -> Result<(), LayoutError> {
        validate_layout(self.version, self.layout_hash, version, hash)
    }
}

impl Default for FeatureOrder {
    fn default() -> Self {
        Self::canonical()
    }
}

fn check_columns(columns: &[String]) -> Result<(), LayoutError> {
    if columns.len() != FEATURE_COUNT {
        return Err(LayoutError::WrongLength {
            expected: FEATURE_COUNT,
            actual: columns.len(),
        });
    }

    let mut seen = [false; FEATURE_COUNT];
    for column in columns {
        let index = FEATURE_LAYOUT
            .iter()
            .position(|&n| n == column)
            .ok_or_else(|| LayoutError::UnknownColumn(column.clone()))?;
        if seen[index] {
            return Err(LayoutError::DuplicateColumn(column.clone()));
        }
        seen[index] = true;
    }

    Ok(())
}

/// Compare an incoming version/hash pair with the expected one
pub fn validate_layout(
    expected_version: u8,
    expected_hash: u32,
    actual_version: u8,
    actual_hash: u32,
) -> Result<(), LayoutError> {
    if expected_version != actual_version || expected_hash != actual_hash {
        return Err(LayoutError::Mismatch {
            expected_version,
            expected_hash,
            actual_version,
            actual_hash,
        });
    }
    Ok(())
}

// ============================================================================
// LAYOUT INFO
// ============================================================================

/// Complete layout information for serialization/logging
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutInfo {
    pub version: u8,
    pub hash: u32,
    pub feature_count: usize,
    pub feature_names: Vec<String>,
}

impl From<&FeatureOrder> for LayoutInfo {
    fn from(order: &FeatureOrder) -> Self {
        Self {
            version: order.version(),
            hash: order.layout_hash(),
            feature_count: order.len(),
            feature_names: order.columns().to_vec(),
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
