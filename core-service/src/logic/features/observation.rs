//! Raw Observation
//!
//! One reading of the 13 raw fields, as received from a request or a
//! dataset row, and its encoded (all numeric) counterpart.

use serde_json::{Map, Value};
use thiserror::Error;

use super::encoding::{self, CategoricalField, EncodingError};
use super::layout::{idx, RAW_FEATURES, RAW_FEATURE_COUNT, RIVER_DISCHARGE_ALIAS};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ObservationError {
    #[error("payload must be a JSON object")]
    NotAnObject,

    #[error("missing required features: {}", .0.join(", "))]
    MissingFeatures(Vec<String>),

    #[error("feature {field} must be a number")]
    NotNumeric { field: &'static str },

    #[error(transparent)]
    InvalidCategory(#[from] EncodingError),
}

// ============================================================================
// RAW OBSERVATION
// ============================================================================

/// Raw 13-field observation. Immutable once received.
#[derive(Debug, Clone, PartialEq)]
pub struct RawObservation {
    pub latitude: f64,
    pub longitude: f64,
    pub rainfall_mm: f64,
    pub temperature_c: f64,
    pub humidity_pct: f64,
    pub river_discharge: f64,
    pub water_level_m: f64,
    pub elevation_m: f64,
    pub land_cover: String,
    pub soil_type: String,
    pub population_density: f64,
    pub infrastructure: f64,
    pub historical_floods: f64,
}

impl RawObservation {
    /// Parse a JSON payload
    pub fn from_json(payload: &Value) -> Result<Self, ObservationError> {
        let map = payload.as_object().ok_or(ObservationError::NotAnObject)?;
        Self::from_map(map)
    }

    /// Parse a JSON object.
    ///
    /// Presence of every field is checked first so the error lists all
    /// absent fields at once, in canonical order.
    pub fn from_map(map: &Map<String, Value>) -> Result<Self, ObservationError> {
        let missing: Vec<String> = RAW_FEATURES
            .iter()
            .filter(|name| lookup(map, name).is_none())
            .map(|name| name.to_string())
            .collect();

        if !missing.is_empty() {
            return Err(ObservationError::MissingFeatures(missing));
        }

        let number = |index: usize| -> Result<f64, ObservationError> {
            let field = RAW_FEATURES[index];
            lookup(map, field)
                .and_then(Value::as_f64)
                .ok_or(ObservationError::NotNumeric { field })
        };

        // Non-string categoricals are kept as their JSON text; encoding rejects them.
        let text = |index: usize| -> String {
            match lookup(map, RAW_FEATURES[index]) {
                Some(Value::String(s)) => s.clone(),
                Some(other) => other.to_string(),
                None => String::new(),
            }
        };

        Ok(Self {
            latitude: number(idx::LATITUDE)?,
            longitude: number(idx::LONGITUDE)?,
            rainfall_mm: number(idx::RAINFALL_MM)?,
            temperature_c: number(idx::TEMPERATURE_C)?,
            humidity_pct: number(idx::HUMIDITY_PCT)?,
            river_discharge: number(idx::RIVER_DISCHARGE)?,
            water_level_m: number(idx::WATER_LEVEL_M)?,
            elevation_m: number(idx::ELEVATION_M)?,
            land_cover: text(idx::LAND_COVER),
            soil_type: text(idx::SOIL_TYPE),
            population_density: number(idx::POPULATION_DENSITY)?,
            infrastructure: number(idx::INFRASTRUCTURE)?,
            historical_floods: number(idx::HISTORICAL_FLOODS)?,
        })
    }

    /// Replace categoricals with their integer codes
    pub fn encode(&self) -> Result<EncodedObservation, EncodingError> {
        let land_cover = encoding::encode(CategoricalField::LandCover, &self.land_cover)?;
        let soil_type = encoding::encode(CategoricalField::SoilType, &self.soil_type)?;

        let mut values = [0.0; RAW_FEATURE_COUNT];
        values[idx::LATITUDE] = self.latitude;
        values[idx::LONGITUDE] = self.longitude;
        values[idx::RAINFALL_MM] = self.rainfall_mm;
        values[idx::TEMPERATURE_C] = self.temperature_c;
        values[idx::HUMIDITY_PCT] = self.humidity_pct;
        values[idx::RIVER_DISCHARGE] = self.river_discharge;
        values[idx::WATER_LEVEL_M] = self.water_level_m;
        values[idx::ELEVATION_M] = self.elevation_m;
        values[idx::LAND_COVER] = f64::from(land_cover);
        values[idx::SOIL_TYPE] = f64::from(soil_type);
        values[idx::POPULATION_DENSITY] = self.population_density;
        values[idx::INFRASTRUCTURE] = self.infrastructure;
        values[idx::HISTORICAL_FLOODS] = self.historical_floods;

        Ok(EncodedObservation { values })
    }
}

fn lookup<'a>(map: &'a Map<String, Value>, field: &str) -> Option<&'a Value> {
    map.get(field).or_else(|| {
        if field == RAW_FEATURES[idx::RIVER_DISCHARGE] {
            map.get(RIVER_DISCHARGE_ALIAS)
        } else {
            None
        }
    })
}

// ============================================================================
// ENCODED OBSERVATION
// ============================================================================

/// Fully numeric 13-field observation in canonical raw order
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EncodedObservation {
    values: [f64; RAW_FEATURE_COUNT],
}

impl EncodedObservation {
    /// Build from already-encoded values, checking the categorical codes
    pub fn from_values(values: [f64; RAW_FEATURE_COUNT]) -> Result<Self, EncodingError> {
        for (field, index) in [
            (CategoricalField::LandCover, idx::LAND_COVER),
            (CategoricalField::SoilType, idx::SOIL_TYPE),
        ] {
            let code = values[index];
            if code.fract() != 0.0 || !code.is_finite() {
                return Err(EncodingError::InvalidCategory {
                    field: field.name(),
                    value: code.to_string(),
                });
            }
            encoding::check_code(field, code as i64)?;
        }
        Ok(Self { values })
    }

    pub fn values(&self) -> &[f64; RAW_FEATURE_COUNT] {
        &self.values
    }

    pub fn get(&self, index: usize) -> Option<f64> {
        self.values.get(index).copied()
    }
}
