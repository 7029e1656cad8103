//! Evaluation Module - held-out metrics

pub mod evaluator;
pub mod metrics;

pub use evaluator::{EvaluationError, EvaluationReport, Evaluator, SAMPLE_SIZE};
pub use metrics::{roc_auc, ClassMetrics, ClassificationReport, ConfusionMatrix, MetricsError};
