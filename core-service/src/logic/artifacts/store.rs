//! Artifact storage on disk (JSON, atomic writes)

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::bundle::{ArtifactBundle, ModelArtifact};
use super::ArtifactError;
use crate::logic::features::FeatureOrder;
use crate::logic::pipeline::ScalingParameters;

pub const MODEL_FILE: &str = "model.json";
pub const SCALER_FILE: &str = "scaler.json";
pub const FEATURE_COLUMNS_FILE: &str = "feature_columns.json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArtifactPaths {
    pub model: PathBuf,
    pub scaler: PathBuf,
    pub feature_columns: PathBuf,
}

impl ArtifactPaths {
    pub fn in_dir(dir: &Path) -> Self {
        Self {
            model: dir.join(MODEL_FILE),
            scaler: dir.join(SCALER_FILE),
            feature_columns: dir.join(FEATURE_COLUMNS_FILE),
        }
    }
}

/// `feature_columns.json` is either a versioned order or a bare list of names
#[derive(Deserialize)]
#[serde(untagged)]
enum StoredOrder {
    Versioned(FeatureOrder),
    Columns(Vec<String>),
}

#[derive(Debug, Clone)]
pub struct ArtifactStore {
    dir: PathBuf,
    paths: ArtifactPaths,
}

impl ArtifactStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        let paths = ArtifactPaths::in_dir(&dir);
        Self { dir, paths }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn paths(&self) -> &ArtifactPaths {
        &self.paths
    }

    /// All three files present
    pub fn exists(&self) -> bool {
        self.paths.model.is_file() && self.paths.scaler.is_file() && self.paths.feature_columns.is_file()
    }

    // ------------------------------------------------------------------------
    // Individual artifacts
    // ------------------------------------------------------------------------

    pub fn save_model(&self, model: &ModelArtifact) -> Result<(), ArtifactError> {
        write_json(&self.paths.model, model)
    }

    pub fn load_model(&self) -> Result<ModelArtifact, ArtifactError> {
        read_json(&self.paths.model)
    }

    pub fn save_scaler(&self, scaler: &ScalingParameters) -> Result<(), ArtifactError> {
        write_json(&self.paths.scaler, scaler)
    }

    pub fn load_scaler(&self) -> Result<ScalingParameters, ArtifactError> {
        let scaler: ScalingParameters = read_json(&self.paths.scaler)?;
        scaler.validate()?;
        Ok(scaler)
    }

    pub fn save_feature_order(&self, order: &FeatureOrder) -> Result<(), ArtifactError> {
        write_json(&self.paths.feature_columns, order)
    }

    pub fn load_feature_order(&self) -> Result<FeatureOrder, ArtifactError> {
        let order = match read_json::<StoredOrder>(&self.paths.feature_columns)? {
            StoredOrder::Versioned(order) => {
                order.validate()?;
                order
            }
            StoredOrder::Columns(columns) => FeatureOrder::from_columns(&columns)?,
        };
        Ok(order)
    }

    // ------------------------------------------------------------------------
    // Bundle
    // ------------------------------------------------------------------------

    /// Persist a bundle. The model is written last so a reader never sees a
    /// new model next to an old scaler or order.
    pub fn save_bundle(&self, bundle: &ArtifactBundle) -> Result<(), ArtifactError> {
        self.save_feature_order(bundle.feature_order())?;
        self.save_scaler(bundle.scaler())?;
        self.save_model(bundle.model_artifact())?;

        log::info!("Artifacts saved to {}", self.dir.display());
        Ok(())
    }

    /// Load and cross-validate all three artifacts
    pub fn load_bundle(&self) -> Result<ArtifactBundle, ArtifactError> {
        let order = self.load_feature_order()?;
        let scaler = self.load_scaler()?;
        let model = self.load_model()?;

        let bundle = ArtifactBundle::new(model, scaler, order)?;
        log::info!(
            "Artifacts loaded from {} (layout hash {:08x})",
            self.dir.display(),
            bundle.feature_order().layout_hash()
        );
        Ok(bundle)
    }
}

// ============================================================================
// JSON HELPERS
// ============================================================================

/// Write to `<file>.tmp` then rename over the target
fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), ArtifactError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|source| ArtifactError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    let json = serde_json::to_vec_pretty(value).map_err(|source| ArtifactError::Corrupt {
        path: path.to_path_buf(),
        source,
    })?;

    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, json).map_err(|source| ArtifactError::Io {
        path: tmp.clone(),
        source,
    })?;
    fs::rename(&tmp, path).map_err(|source| ArtifactError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    Ok(())
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, ArtifactError> {
    let data = fs::read(path).map_err(|source| match source.kind() {
        ErrorKind::NotFound => ArtifactError::NotFound(path.to_path_buf()),
        _ => ArtifactError::Io {
            path: path.to_path_buf(),
            source,
        },
    })?;

    serde_json::from_slice(&data).map_err(|source| ArtifactError::Corrupt {
        path: path.to_path_buf(),
        source,
    })
}
