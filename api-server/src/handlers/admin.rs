//! Admin handlers

use axum::{extract::State, http::HeaderMap, Json};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::state::AppState;

pub const ADMIN_TOKEN_HEADER: &str = "x-admin-token";

#[derive(Debug, Serialize)]
pub struct ReloadResponse {
    status: &'static str,
    ml_loaded: bool,
    layout_hash: String,
    loaded_at: DateTime<Utc>,
}

/// Without ADMIN_TOKEN the endpoint is open, except in production
fn authorize(state: &AppState, headers: &HeaderMap) -> AppResult<()> {
    match &state.config.admin_token {
        Some(expected) => {
            let provided = headers
                .get(ADMIN_TOKEN_HEADER)
                .and_then(|v| v.to_str().ok());
            if provided == Some(expected.as_str()) {
                Ok(())
            } else {
                Err(AppError::Unauthorized)
            }
        }
        None if state.config.is_production() => Err(AppError::Unauthorized),
        None => Ok(()),
    }
}

/// POST /api/admin/reload/
pub async fn reload(State(state): State<AppState>, headers: HeaderMap) -> AppResult<Json<ReloadResponse>> {
    authorize(&state, &headers)?;

    let bundle = state.reload().await?;

    Ok(Json(ReloadResponse {
        status: "reloaded",
        ml_loaded: true,
        layout_hash: format!("{:08x}", bundle.feature_order().layout_hash()),
        loaded_at: bundle.loaded_at(),
    }))
}
