//! Training job: dataset → persisted artifact bundle

use serde::Serialize;

use super::split::SplitConfig;
use super::stages::TrainingPipeline;
use super::PipelineError;
use crate::logic::artifacts::{ArtifactBundle, ArtifactStore, ModelArtifact};
use crate::logic::dataset::LabeledDataset;
use crate::logic::model::{ForestConfig, ForestTrainer};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrainingSummary {
    pub train_rows: usize,
    pub test_rows: usize,
    /// `[negatives, positives]`
    pub train_class_counts: [usize; 2],
    pub test_class_counts: [usize; 2],
    pub train_accuracy: f64,
    pub n_estimators: usize,
    pub layout_hash: u32,
}

/// Run the staged pipeline and wrap the result in a bundle
pub fn train_bundle(
    dataset: &LabeledDataset,
    split: &SplitConfig,
    forest: &ForestConfig,
) -> Result<(ArtifactBundle, TrainingSummary), PipelineError> {
    let [negatives, positives] = dataset.class_counts();
    log::info!(
        "Training on {} rows ({} flood, {} no flood)",
        dataset.len(),
        positives,
        negatives
    );

    let trained = TrainingPipeline::engineer(dataset)
        .split(split)?
        .fit_scaler()?
        .train(&ForestTrainer::new(*forest))?;

    let summary = TrainingSummary {
        train_rows: trained.train_partition().len(),
        test_rows: trained.test_partition().len(),
        train_class_counts: trained.train_partition().class_counts(),
        test_class_counts: trained.test_partition().class_counts(),
        train_accuracy: trained.train_accuracy()?,
        n_estimators: forest.n_estimators,
        layout_hash: trained.order().layout_hash(),
    };

    log::info!(
        "Train class balance {:?}, test class balance {:?}",
        summary.train_class_counts,
        summary.test_class_counts
    );
    log::info!("Training accuracy: {:.4}", summary.train_accuracy);

    let (model, scaler, order) = trained.into_parts();
    let bundle = ArtifactBundle::new(ModelArtifact::new(model, &order), scaler, order)?;

    Ok((bundle, summary))
}

/// Train and write `model.json`, `scaler.json` and `feature_columns.json`
pub fn train_and_persist(
    dataset: &LabeledDataset,
    split: &SplitConfig,
    forest: &ForestConfig,
    store: &ArtifactStore,
) -> Result<TrainingSummary, PipelineError> {
    let (bundle, summary) = train_bundle(dataset, split, forest)?;
    store.save_bundle(&bundle)?;
    Ok(summary)
}
