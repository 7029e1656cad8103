//! HTTP handlers

pub mod admin;
pub mod health;
pub mod model;
pub mod predict;

use crate::error::AppError;

/// Any method other than POST on a POST-only route
pub async fn post_only() -> AppError {
    AppError::MethodNotAllowed
}
