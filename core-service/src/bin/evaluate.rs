//! Flood Risk - evaluation job
//!
//! Re-creates the held-out partition with the training seed and scores the
//! persisted artifacts on it. `--metrics-out <path>` also writes the report
//! as JSON.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use flood_risk_core::constants::{APP_NAME, APP_VERSION};
use flood_risk_core::logic::config::PipelineConfig;
use flood_risk_core::logic::dataset::load_csv;
use flood_risk_core::logic::evaluation::Evaluator;

#[derive(Parser, Debug)]
#[command(name = "evaluate", about = "Score the persisted flood-risk artifacts on the held-out split")]
struct Args {
    /// Write the evaluation report as JSON to this path
    #[arg(long)]
    metrics_out: Option<PathBuf>,

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
    log::info!("{} v{} - evaluation", APP_NAME, APP_VERSION);

    let store = config.artifact_store();
    let bundle = store
        .load_bundle()
        .with_context(|| format!("loading artifacts from {}", store.dir().display()))?;

    let dataset = load_csv(&config.data_path, &config.target_column)
        .with_context(|| format!("loading dataset {}", config.data_path.display()))?;

    let report = Evaluator::new(&bundle, config.split)
        .evaluate(&dataset)
        .context("evaluation failed")?;

    println!("{}", report);

    if let Some(path) = args.metrics_out {
        let json = serde_json::to_vec_pretty(&report).context("serializing metrics")?;
        fs::write(&path, json).with_context(|| format!("writing {}", path.display()))?;
        log::info!("Metrics written to {}", path.display());
    }

    Ok(())
}
