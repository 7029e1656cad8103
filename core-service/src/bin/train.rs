//! Flood Risk - training job
//!
//! Loads the processed dataset, runs the staged pipeline and writes
//! `model.json`, `scaler.json` and `feature_columns.json`.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use flood_risk_core::constants::{APP_NAME, APP_VERSION};
use flood_risk_core::logic::config::PipelineConfig;
use flood_risk_core::logic::dataset::load_csv;
use flood_risk_core::logic::pipeline::train_and_persist;

#[derive(Parser, Debug)]
#[command(name = "train", about = "Train the flood-risk model and write its artifacts")]
struct Args {
    /// Dataset CSV (overrides FLOOD_DATA_PATH)
    #[arg(long)]
    data: Option<PathBuf>,

    /// Artifact directory (overrides FLOOD_ARTIFACT_DIR)
    #[arg(long)]
    artifact_dir: Option<PathBuf>,
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let mut config = PipelineConfig::from_env();
    if let Some(data) = args.data {
        config.data_path = data;
    }
    if let Some(dir) = args.artifact_dir {
        config.artifact_dir = dir;
    }
    log::info!("{} v{} - training", APP_NAME, APP_VERSION);
    log::info!("Dataset: {}", config.data_path.display());
    log::info!("Artifacts: {}", config.artifact_dir.display());

    let dataset = load_csv(&config.data_path, &config.target_column)
        .with_context(|| format!("loading dataset {}", config.data_path.display()))?;

    let store = config.artifact_store();
    let summary = train_and_persist(&dataset, &config.split, &config.forest, &store)
        .context("training failed")?;

    log::info!(
        "Training complete: {} train / {} test rows, {} trees, training accuracy {:.4}",
        summary.train_rows,
        summary.test_rows,
        summary.n_estimators,
        summary.train_accuracy
    );
    log::info!("Model saved to {}", store.paths().model.display());
    log::info!("Scaler saved to {}", store.paths().scaler.display());
    log::info!("Feature order saved to {}", store.paths().feature_columns.display());

    Ok(())
}
