//! Flood risk prediction handler

use axum::{body::Bytes, extract::State, Json};
use serde::Serialize;
use serde_json::Value;

use flood_risk_core::logic::inference::prepare;

use crate::error::{AppError, AppResult};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct PredictResponse {
    /// Rounded to 3 decimals
    probability: f64,
    risk: &'static str,
    ml_loaded: bool,
}

/// POST /api/predict/
///
/// The body is parsed by hand so malformed JSON gets the API's own 400 body.
/// Validation happens before the artifacts are looked up.
pub async fn predict(State(state): State<AppState>, body: Bytes) -> AppResult<Json<PredictResponse>> {
    let production = state.config.is_production();

    let payload: Value = serde_json::from_slice(&body)
        .map_err(|e| AppError::MalformedPayload(e.to_string()))?;

    let features = prepare(&payload).map_err(|e| AppError::from_inference(e, production))?;

    let bundle = state.current_bundle().await?;
    let result = bundle
        .service()
        .predict_engineered(&features)
        .map_err(|e| AppError::from_inference(e, production))?;

    tracing::info!(
        probability = result.probability,
        risk = result.risk.label(),
        "Prediction served"
    );

    Ok(Json(PredictResponse {
        probability: result.rounded_probability(),
        risk: result.risk.label(),
        ml_loaded: true,
    }))
}
