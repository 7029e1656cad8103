//! Configuration module

use std::env;
use std::path::PathBuf;

use flood_risk_core::constants::DEFAULT_ARTIFACT_DIR;

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Server port
    pub port: u16,

    /// Directory holding model.json, scaler.json and feature_columns.json
    pub artifact_dir: PathBuf,

    /// Environment (development, production)
    pub environment: String,

    /// Shared secret for admin endpoints
    pub admin_token: Option<String>,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self {
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8000),

            artifact_dir: env::var("ARTIFACT_DIR")
                .or_else(|_| env::var("FLOOD_ARTIFACT_DIR"))
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(DEFAULT_ARTIFACT_DIR)),

            environment: env::var("ENVIRONMENT")
                .unwrap_or_else(|_| "development".to_string()),

            admin_token: env::var("ADMIN_TOKEN")
                .ok()
                .filter(|t| !t.is_empty()),
        }
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}
