//! Integration Tests for Feature Construction
//!
//! Raw payload → encoding → engineering → assembly, end to end.

#[cfg(test)]
mod integration_tests {
    use crate::logic::features::{
        layout::{FEATURE_COUNT, FEATURE_LAYOUT},
        EngineeredFeatures, FeatureOrder, ObservationError, RawObservation,
    };
    use crate::logic::testing::{reference_payload, synthetic_dataset};

    /// Reference observation from the API docs
    #[test]
    fn test_reference_observation_end_to_end() {
        let raw = RawObservation::from_json(&reference_payload()).unwrap();
        let encoded = raw.encode().unwrap();
        let features = EngineeredFeatures::from_encoded(&encoded);
        let order = FeatureOrder::canonical();
        let vector = features.assemble(&order).unwrap();

        assert_eq!(vector.len(), FEATURE_COUNT);
        assert_eq!(
            vector.as_slice(),
            &[10.0, 20.0, 50.0, 28.0, 80.0, 120.0, 3.0, 5.0, 2.0, 2.0, 500.0, 2.0, 1.0, 150.0, 20.0, 1000.0]
        );
        assert_eq!(vector.get_by_name(&order, "Land_Cover"), Some(2.0));
        assert_eq!(vector.get_by_name(&order, "Soil_Type"), Some(2.0));
    }

    /// Every valid observation produces exactly 16 values
    #[test]
    fn test_every_row_assembles_to_full_vector() {
        let dataset = synthetic_dataset(60);
        let order = FeatureOrder::canonical();

        for observation in dataset.observations() {
            let vector = EngineeredFeatures::from_encoded(observation)
                .assemble(&order)
                .unwrap();
            assert_eq!(vector.len(), FEATURE_COUNT);
            assert!(vector.as_slice().iter().all(|v| v.is_finite()));
        }
    }

    /// Field names in the layout are the ones accepted on the wire
    #[test]
    fn test_payload_keys_match_layout() {
        let payload = reference_payload();
        let raw = RawObservation::from_json(&payload).unwrap();
        let features = EngineeredFeatures::from_encoded(&raw.encode().unwrap());

        for name in FEATURE_LAYOUT {
            assert!(features.get(name).is_some(), "{} should resolve", name);
        }
    }

    #[test]
    fn test_missing_rainfall_reported_alone() {
        let mut payload = reference_payload();
        payload.as_object_mut().unwrap().remove("Rainfall_mm");

        match RawObservation::from_json(&payload) {
            Err(ObservationError::MissingFeatures(missing)) => {
                assert_eq!(missing, vec!["Rainfall_mm".to_string()]);
            }
            other => panic!("expected MissingFeatures, got {:?}", other),
        }
    }
}
