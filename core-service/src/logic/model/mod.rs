//! Model Module - flood classifier
//!
//! The pipeline and inference only see the [`ProbabilisticClassifier`]
//! contract; the random forest is the concrete model that gets persisted.

pub mod classifier;
pub mod forest;
pub mod risk;
pub mod tree;

// Re-export common types
pub use classifier::{ModelError, ModelTrainer, ProbabilisticClassifier};
pub use forest::{ClassWeight, ForestConfig, ForestTrainer, MaxFeatures, RandomForest};
pub use risk::{predicted_label, RiskLevel, DECISION_THRESHOLD, HIGH_RISK_LOWER, LOW_RISK_UPPER};
pub use tree::{DecisionTree, Node, TreeParams};
