//! Shared application state

use std::sync::Arc;

use flood_risk_core::{ArtifactBundle, ArtifactSlot, ArtifactStore};

use crate::config::Config;
use crate::error::{AppError, AppResult};

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub store: Arc<ArtifactStore>,
    pub artifacts: Arc<ArtifactSlot>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let store = ArtifactStore::new(&config.artifact_dir);
        Self {
            config,
            store: Arc::new(store),
            artifacts: Arc::new(ArtifactSlot::new()),
        }
    }

    /// Loaded bundle, or a fresh attempt from disk while degraded
    pub async fn current_bundle(&self) -> AppResult<Arc<ArtifactBundle>> {
        match self.artifacts.get() {
            Some(bundle) => Ok(bundle),
            None => self.load_and_swap(false).await,
        }
    }

    /// Read the bundle from disk and swap it in. The current bundle is kept
    /// when loading fails.
    pub async fn reload(&self) -> AppResult<Arc<ArtifactBundle>> {
        self.load_and_swap(self.artifacts.is_loaded()).await
    }

    async fn load_and_swap(&self, serving: bool) -> AppResult<Arc<ArtifactBundle>> {
        let store = self.store.clone();
        let production = self.config.is_production();

        let loaded = tokio::task::spawn_blocking(move || store.load_bundle())
            .await
            .map_err(|e| AppError::internal(format!("artifact loader panicked: {}", e), production))?;

        let bundle = match loaded {
            Ok(bundle) => bundle,
            Err(e) if serving => return Err(AppError::reload_failed(e, production)),
            Err(e) => return Err(AppError::from_artifact(e, production)),
        };

        tracing::info!(
            layout_hash = %format!("{:08x}", bundle.feature_order().layout_hash()),
            "Artifacts loaded from {}",
            self.store.dir().display()
        );

        let bundle = Arc::new(bundle);
        self.artifacts.replace(bundle.clone());
        Ok(bundle)
    }
}
