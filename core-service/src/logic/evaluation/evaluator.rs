//! Held-out evaluation against persisted artifacts
//!
//! Rebuilds the test partition exactly as training did (same loader, same
//! engineer, same seed and fraction), then goes through the persisted
//! order, scaler and model only.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

use super::metrics::{roc_auc, ClassificationReport, ConfusionMatrix, MetricsError};
use crate::logic::artifacts::ArtifactBundle;
use crate::logic::dataset::LabeledDataset;
use crate::logic::features::LayoutError;
use crate::logic::model::{predicted_label, ModelError, ProbabilisticClassifier, DECISION_THRESHOLD};
use crate::logic::pipeline::{stratified_split, EngineeredDataset, ScalerError, SplitConfig, SplitError};

/// Probabilities shown in the report
pub const SAMPLE_SIZE: usize = 10;

#[derive(Debug, Error)]
pub enum EvaluationError {
    #[error("split failed: {0}")]
    Split(#[from] SplitError),

    #[error(transparent)]
    Layout(#[from] LayoutError),

    #[error("scaling failed: {0}")]
    Scaler(#[from] ScalerError),

    #[error("prediction failed: {0}")]
    Model(#[from] ModelError),

    #[error(transparent)]
    Metrics(#[from] MetricsError),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EvaluationReport {
    pub roc_auc: f64,
    pub threshold: f64,
    pub classification: ClassificationReport,
    pub confusion: ConfusionMatrix,
    pub test_size: usize,
    /// First probabilities of the test partition, 3 decimals
    pub sample_probabilities: Vec<f64>,
    pub layout_hash: u32,
    pub evaluated_at: DateTime<Utc>,
}

impl fmt::Display for EvaluationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Test rows: {}", self.test_size)?;
        writeln!(f, "ROC-AUC: {:.4}", self.roc_auc)?;
        writeln!(f)?;
        writeln!(f, "Classification report (threshold {}):", self.threshold)?;
        writeln!(f, "{}", self.classification)?;
        writeln!(f, "Confusion matrix:")?;
        writeln!(f, "{}", self.confusion)?;
        writeln!(f)?;
        write!(f, "Sample probabilities: {:?}", self.sample_probabilities)
    }
}

pub struct Evaluator<'a> {
    bundle: &'a ArtifactBundle,
    split: SplitConfig,
}

impl<'a> Evaluator<'a> {
    /// `split` must match the configuration used for training
    pub fn new(bundle: &'a ArtifactBundle, split: SplitConfig) -> Self {
        Self { bundle, split }
    }

    pub fn evaluate(&self, dataset: &LabeledDataset) -> Result<EvaluationReport, EvaluationError> {
        let order = self.bundle.feature_order();

        let engineered = EngineeredDataset::from_dataset(dataset).select_columns(order)?;
        let indices = stratified_split(engineered.labels(), &self.split)?;
        let test = engineered.rows(&indices.test);

        let scaled = self.bundle.scaler().apply(test.features.view())?;
        let probabilities = self.bundle.model().predict_proba_batch(scaled.view())?;

        let predicted: Vec<u8> = probabilities.iter().map(|&p| predicted_label(p)).collect();
        let confusion = ConfusionMatrix::from_predictions(&test.labels, &predicted);

        let report = EvaluationReport {
            roc_auc: roc_auc(&test.labels, &probabilities)?,
            threshold: DECISION_THRESHOLD,
            classification: ClassificationReport::from_confusion(&confusion),
            confusion,
            test_size: test.len(),
            sample_probabilities: probabilities
                .iter()
                .take(SAMPLE_SIZE)
                .map(|p| (p * 1000.0).round() / 1000.0)
                .collect(),
            layout_hash: order.layout_hash(),
            evaluated_at: Utc::now(),
        };

        log::info!(
            "Evaluated {} test rows: ROC-AUC={:.4} accuracy={:.4}",
            report.test_size,
            report.roc_auc,
            report.classification.accuracy
        );

        Ok(report)
    }
}
