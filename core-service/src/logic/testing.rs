//! Shared fixtures for unit tests

use serde_json::{json, Value};

use crate::logic::dataset::LabeledDataset;
use crate::logic::features::layout::{idx, RAW_FEATURE_COUNT};
use crate::logic::features::EncodedObservation;

/// The reference request used throughout the docs
pub fn reference_payload() -> Value {
    json!({
        "Latitude": 10,
        "Longitude": 20,
        "Rainfall_mm": 50,
        "Temperature_C": 28,
        "Humidity_%": 80,
        "River_Discharge": 120,
        "Water_Level_m": 3,
        "Elevation_m": 5,
        "Land_Cover": "Urban",
        "Soil_Type": "Clay",
        "Population_Density": 500,
        "Infrastructure": 2,
        "Historical_Floods": 1
    })
}

/// Deterministic dataset where floods follow heavy rain on high water.
///
/// Roughly a third of the rows are positive.
pub fn synthetic_dataset(rows: usize) -> LabeledDataset {
    let mut observations = Vec::with_capacity(rows);
    let mut labels = Vec::with_capacity(rows);

    for i in 0..rows {
        let step = i as f64;
        let mut values = [0.0; RAW_FEATURE_COUNT];
        values[idx::LATITUDE] = 10.0 + (i % 17) as f64 * 0.5;
        values[idx::LONGITUDE] = 70.0 + (i % 13) as f64 * 0.25;
        values[idx::RAINFALL_MM] = ((i * 37) % 300) as f64;
        values[idx::TEMPERATURE_C] = 20.0 + (i % 15) as f64;
        values[idx::HUMIDITY_PCT] = 40.0 + (i % 50) as f64;
        values[idx::RIVER_DISCHARGE] = 100.0 + ((i * 53) % 4000) as f64;
        values[idx::WATER_LEVEL_M] = 1.0 + ((i * 7) % 9) as f64;
        values[idx::ELEVATION_M] = ((i * 11) % 500) as f64;
        values[idx::LAND_COVER] = (i % 3) as f64;
        values[idx::SOIL_TYPE] = ((i / 3) % 3) as f64;
        values[idx::POPULATION_DENSITY] = 100.0 + step * 3.0;
        values[idx::INFRASTRUCTURE] = (i % 2) as f64;
        values[idx::HISTORICAL_FLOODS] = (i % 4) as f64;

        let stress = values[idx::RAINFALL_MM] * values[idx::WATER_LEVEL_M];
        labels.push(u8::from(stress > 900.0));
        observations.push(EncodedObservation::from_values(values).expect("valid codes"));
    }

    LabeledDataset::new(observations, labels).expect("consistent dataset")
}
