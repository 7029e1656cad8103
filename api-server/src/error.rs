//! Error handling

use axum::{
    response::{IntoResponse, Response},
    http::StatusCode,
    Json,
};
use serde_json::json;

use flood_risk_core::{ArtifactError, InferenceError};

pub type AppResult<T> = Result<T, AppError>;

/// Longest diagnostic returned to clients outside production
const MAX_DETAIL_LEN: usize = 200;

#[derive(Debug)]
pub enum AppError {
    // Auth errors
    Unauthorized,

    // Routing errors
    MethodNotAllowed,

    // Validation errors
    MissingFeatures(Vec<String>),
    InvalidCategory { field: String, value: String },
    MalformedPayload(String),

    // Artifacts not loaded (degraded mode)
    ModelUnavailable(String),

    // Reload failed while the previous bundle keeps serving
    ReloadFailed { message: String, expose_details: bool },

    // Generic errors
    InternalError { message: String, expose_details: bool },
}

impl AppError {
    pub fn internal(message: impl Into<String>, production: bool) -> Self {
        AppError::InternalError {
            message: message.into(),
            expose_details: !production,
        }
    }

    pub fn from_inference(err: InferenceError, production: bool) -> Self {
        match err {
            InferenceError::MissingFeatures(missing) => AppError::MissingFeatures(missing),
            InferenceError::InvalidCategory { field, value } => AppError::InvalidCategory { field, value },
            InferenceError::MalformedPayload(msg) => AppError::MalformedPayload(msg),
            InferenceError::ModelUnavailable(msg) => AppError::ModelUnavailable(msg),
            InferenceError::Internal(msg) => AppError::internal(msg, production),
        }
    }

    pub fn from_artifact(err: ArtifactError, production: bool) -> Self {
        Self::from_inference(err.into(), production)
    }

    pub fn reload_failed(err: ArtifactError, production: bool) -> Self {
        AppError::ReloadFailed {
            message: err.to_string(),
            expose_details: !production,
        }
    }
}

fn truncate(message: &str) -> String {
    match message.char_indices().nth(MAX_DETAIL_LEN) {
        Some((end, _)) => format!("{}...", &message[..end]),
        None => message.to_string(),
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            AppError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                json!({ "error": "Authentication required" }),
            ),
            AppError::MethodNotAllowed => (
                StatusCode::METHOD_NOT_ALLOWED,
                json!({ "error": "Only POST requests are allowed" }),
            ),
            AppError::MissingFeatures(missing) => {
                tracing::debug!("Missing features: {:?}", missing);
                (
                    StatusCode::BAD_REQUEST,
                    json!({
                        "error": "Missing required features",
                        "missing_features": missing,
                    }),
                )
            }
            AppError::InvalidCategory { field, value } => {
                tracing::debug!("Invalid categorical value {:?} for {}", value, field);
                (
                    StatusCode::BAD_REQUEST,
                    json!({ "error": "Invalid categorical value" }),
                )
            }
            AppError::MalformedPayload(msg) => {
                tracing::debug!("Malformed payload: {}", msg);
                (
                    StatusCode::BAD_REQUEST,
                    json!({ "error": "Invalid JSON payload" }),
                )
            }
            AppError::ModelUnavailable(msg) => {
                tracing::warn!("Model unavailable: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({
                        "status": "degraded",
                        "ml_loaded": false,
                        "error": "Model file not found",
                    }),
                )
            }
            AppError::ReloadFailed { message, expose_details } => {
                tracing::error!("Artifact reload failed, keeping current bundle: {}", message);
                let mut body = json!({
                    "status": "reload_failed",
                    "ml_loaded": true,
                    "error": "Artifact reload failed",
                });
                if *expose_details {
                    body["details"] = json!(truncate(message));
                }
                (StatusCode::INTERNAL_SERVER_ERROR, body)
            }
            AppError::InternalError { message, expose_details } => {
                tracing::error!("Internal error: {}", message);
                let body = if *expose_details {
                    json!({
                        "error": "Internal server error",
                        "details": truncate(message),
                    })
                } else {
                    json!({ "error": "Internal server error" })
                };
                (StatusCode::INTERNAL_SERVER_ERROR, body)
            }
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_long_details() {
        let long = "x".repeat(500);
        let short = truncate(&long);
        assert_eq!(short.len(), MAX_DETAIL_LEN + 3);
        assert_eq!(truncate("short"), "short");
    }

    #[test]
    fn test_inference_mapping() {
        let err = AppError::from_inference(InferenceError::Internal("boom".into()), true);
        assert!(matches!(err, AppError::InternalError { expose_details: false, .. }));

        let err = AppError::from_inference(InferenceError::MissingFeatures(vec!["Rainfall_mm".into()]), false);
        assert!(matches!(err, AppError::MissingFeatures(ref m) if m == &["Rainfall_mm"]));
    }

    #[test]
    fn test_reload_failure_hides_details_in_production() {
        let missing = || ArtifactError::NotFound("scaler.json".into());

        let err = AppError::reload_failed(missing(), true);
        assert!(matches!(err, AppError::ReloadFailed { expose_details: false, .. }));

        let err = AppError::reload_failed(missing(), false);
        assert!(matches!(err, AppError::ReloadFailed { ref message, expose_details: true } if message.contains("scaler.json")));
    }
}
