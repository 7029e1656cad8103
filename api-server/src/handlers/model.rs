//! Model status handler

use axum::{extract::State, Json};
use chrono::{DateTime, Utc};
use serde::Serialize;

use flood_risk_core::logic::model::ProbabilisticClassifier;

use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct ModelStatus {
    ml_loaded: bool,
    artifact_dir: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    loaded: Option<LoadedModel>,
}

#[derive(Debug, Serialize)]
pub struct LoadedModel {
    loaded_at: DateTime<Utc>,
    trained_at: DateTime<Utc>,
    feature_version: u8,
    layout_hash: String,
    feature_columns: Vec<String>,
    n_features: usize,
    n_estimators: usize,
}

/// GET /api/model/
pub async fn status(State(state): State<AppState>) -> Json<ModelStatus> {
    let loaded = state.artifacts.get().map(|bundle| {
        let layout = bundle.layout_info();
        LoadedModel {
            loaded_at: bundle.loaded_at(),
            trained_at: bundle.trained_at(),
            feature_version: layout.version,
            layout_hash: format!("{:08x}", layout.hash),
            feature_columns: layout.feature_names,
            n_features: bundle.model().n_features(),
            n_estimators: bundle.model().trees().len(),
        }
    });

    Json(ModelStatus {
        ml_loaded: loaded.is_some(),
        artifact_dir: state.store.dir().display().to_string(),
        loaded,
    })
}
