//! Classifier contract
//!
//! Training and inference only rely on these two traits: a trainer that
//! fits on a scaled matrix, and a model that returns the flood probability
//! for a scaled row in the persisted feature order.

use ndarray::ArrayView2;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ModelError {
    #[error("training set is empty")]
    EmptyTrainingSet,

    #[error("training labels contain a single class")]
    SingleClass,

    #[error("{rows} rows but {labels} labels")]
    LengthMismatch { rows: usize, labels: usize },

    #[error("expected {expected} features, got {actual}")]
    FeatureCount { expected: usize, actual: usize },

    #[error("invalid model configuration: {0}")]
    InvalidConfig(String),

    #[error("model produced an invalid probability: {0}")]
    InvalidProbability(f64),
}

/// Fitted model exposing the positive-class probability
pub trait ProbabilisticClassifier: Send + Sync {
    /// Number of input features the model was fit on
    fn n_features(&self) -> usize;

    /// Probability of flood for one scaled row
    fn predict_proba(&self, row: &[f64]) -> Result<f64, ModelError>;

    /// Probability of flood for every row of a scaled matrix
    fn predict_proba_batch(&self, x: ArrayView2<f64>) -> Result<Vec<f64>, ModelError> {
        x.rows()
            .into_iter()
            .map(|row| match row.as_slice() {
                Some(slice) => self.predict_proba(slice),
                None => self.predict_proba(&row.to_vec()),
            })
            .collect()
    }
}

/// Supervised learning algorithm producing a [`ProbabilisticClassifier`]
pub trait ModelTrainer {
    type Model: ProbabilisticClassifier;

    fn fit(&self, x: ArrayView2<f64>, y: &[u8]) -> Result<Self::Model, ModelError>;
}
