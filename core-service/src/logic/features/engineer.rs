//! Feature Engineer
//!
//! Derived features shared by the training pipeline and the inference
//! path. There is exactly one implementation of each formula; both paths
//! call [`EngineeredFeatures::from_encoded`].

use super::layout::{idx, FeatureOrder, LayoutError, FEATURE_COUNT, RAW_FEATURE_COUNT};
use super::observation::EncodedObservation;
use super::vector::FeatureVector;

/// Compounding surface water stress
pub fn rainfall_water_level(rainfall_mm: f64, water_level_m: f64) -> f64 {
    rainfall_mm * water_level_m
}

/// River discharge normalized by elevation.
/// The +1 keeps the ratio finite at (or near) zero elevation.
pub fn flood_pressure(river_discharge: f64, elevation_m: f64) -> f64 {
    river_discharge / (elevation_m + 1.0)
}

/// Human presence combined with infrastructure vulnerability
pub fn exposure_index(population_density: f64, infrastructure: f64) -> f64 {
    population_density * infrastructure
}

/// The three derived values
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DerivedFeatures {
    pub rainfall_water_level: f64,
    pub flood_pressure: f64,
    pub exposure_index: f64,
}

impl DerivedFeatures {
    pub fn compute(raw: &[f64; RAW_FEATURE_COUNT]) -> Self {
        Self {
            rainfall_water_level: rainfall_water_level(raw[idx::RAINFALL_MM], raw[idx::WATER_LEVEL_M]),
            flood_pressure: flood_pressure(raw[idx::RIVER_DISCHARGE], raw[idx::ELEVATION_M]),
            exposure_index: exposure_index(raw[idx::POPULATION_DENSITY], raw[idx::INFRASTRUCTURE]),
        }
    }
}

/// 16 named values in canonical layout order
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineeredFeatures {
    values: [f64; FEATURE_COUNT],
}

impl EngineeredFeatures {
    pub fn from_encoded(observation: &EncodedObservation) -> Self {
        let raw = observation.values();
        let derived = DerivedFeatures::compute(raw);

        let mut values = [0.0; FEATURE_COUNT];
        values[..RAW_FEATURE_COUNT].copy_from_slice(raw);
        values[idx::RAINFALL_WATER_LEVEL] = derived.rainfall_water_level;
        values[idx::FLOOD_PRESSURE] = derived.flood_pressure;
        values[idx::EXPOSURE_INDEX] = derived.exposure_index;

        Self { values }
    }

    /// Values in canonical layout order
    pub fn canonical(&self) -> &[f64; FEATURE_COUNT] {
        &self.values
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        super::layout::feature_index(name).map(|i| self.values[i])
    }

    pub fn derived(&self) -> DerivedFeatures {
        DerivedFeatures {
            rainfall_water_level: self.values[idx::RAINFALL_WATER_LEVEL],
            flood_pressure: self.values[idx::FLOOD_PRESSURE],
            exposure_index: self.values[idx::EXPOSURE_INDEX],
        }
    }

    /// Lay the values out in a persisted feature order
    pub fn assemble(&self, order: &FeatureOrder) -> Result<FeatureVector, LayoutError> {
        let values = order
            .canonical_indices()?
            .into_iter()
            .map(|i| self.values[i])
            .collect();
        Ok(FeatureVector::new(order, values))
    }
}
