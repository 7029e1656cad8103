//! Random Forest - bagged CART ensemble
//!
//! Each tree is grown on a bootstrap sample with its own ChaCha8 stream
//! derived from the forest seed, so a fixed seed reproduces the model
//! exactly. The flood probability is the mean of the tree probabilities.

use ndarray::ArrayView2;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use super::classifier::{ModelError, ModelTrainer, ProbabilisticClassifier};
use super::tree::{DecisionTree, TreeParams};
use crate::constants::{
    DEFAULT_MAX_DEPTH, DEFAULT_MIN_SAMPLES_LEAF, DEFAULT_MIN_SAMPLES_SPLIT, DEFAULT_N_ESTIMATORS,
    DEFAULT_RANDOM_STATE,
};

// ============================================================================
// CONFIGURATION
// ============================================================================

/// Features considered at each split
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaxFeatures {
    Sqrt,
    All,
    Fixed(usize),
}

impl MaxFeatures {
    pub fn resolve(self, n_features: usize) -> usize {
        let k = match self {
            MaxFeatures::Sqrt => (n_features as f64).sqrt() as usize,
            MaxFeatures::All => n_features,
            MaxFeatures::Fixed(k) => k,
        };
        k.clamp(1, n_features.max(1))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassWeight {
    /// n_samples / (n_classes * class_count)
    Balanced,
    Uniform,
}

impl ClassWeight {
    /// Weight for label 0 and label 1
    pub fn weights(self, labels: &[u8]) -> [f64; 2] {
        match self {
            ClassWeight::Uniform => [1.0, 1.0],
            ClassWeight::Balanced => {
                let n = labels.len() as f64;
                let positives = labels.iter().filter(|&&l| l == 1).count() as f64;
                let negatives = n - positives;
                [n / (2.0 * negatives), n / (2.0 * positives)]
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForestConfig {
    pub n_estimators: usize,
    pub max_depth: usize,
    pub min_samples_split: usize,
    pub min_samples_leaf: usize,
    pub max_features: MaxFeatures,
    pub class_weight: ClassWeight,
    pub bootstrap: bool,
    pub seed: u64,
}

impl Default for ForestConfig {
    fn default() -> Self {
        Self {
            n_estimators: DEFAULT_N_ESTIMATORS,
            max_depth: DEFAULT_MAX_DEPTH,
            min_samples_split: DEFAULT_MIN_SAMPLES_SPLIT,
            min_samples_leaf: DEFAULT_MIN_SAMPLES_LEAF,
            max_features: MaxFeatures::Sqrt,
            class_weight: ClassWeight::Balanced,
            bootstrap: true,
            seed: DEFAULT_RANDOM_STATE,
        }
    }
}

impl ForestConfig {
    pub fn validate(&self) -> Result<(), ModelError> {
        if self.n_estimators == 0 {
            return Err(ModelError::InvalidConfig("n_estimators must be at least 1".into()));
        }
        if self.max_depth == 0 {
            return Err(ModelError::InvalidConfig("max_depth must be at least 1".into()));
        }
        if self.min_samples_split < 2 {
            return Err(ModelError::InvalidConfig("min_samples_split must be at least 2".into()));
        }
        if self.min_samples_leaf == 0 {
            return Err(ModelError::InvalidConfig("min_samples_leaf must be at least 1".into()));
        }
        if self.max_features == MaxFeatures::Fixed(0) {
            return Err(ModelError::InvalidConfig("max_features must be at least 1".into()));
        }
        Ok(())
    }
}

// ============================================================================
// MODEL
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RandomForest {
    config: ForestConfig,
    n_features: usize,
    trees: Vec<DecisionTree>,
}

impl RandomForest {
    /// Fit on a scaled matrix with binary labels
    pub fn fit(config: &ForestConfig, x: ArrayView2<f64>, y: &[u8]) -> Result<Self, ModelError> {
        config.validate()?;

        let n = x.nrows();
        if n == 0 {
            return Err(ModelError::EmptyTrainingSet);
        }
        if y.len() != n {
            return Err(ModelError::LengthMismatch { rows: n, labels: y.len() });
        }
        let positives = y.iter().filter(|&&l| l == 1).count();
        if positives == 0 || positives == n {
            return Err(ModelError::SingleClass);
        }

        let class_weight = config.class_weight.weights(y);
        let params = TreeParams {
            max_depth: config.max_depth,
            min_samples_split: config.min_samples_split,
            min_samples_leaf: config.min_samples_leaf,
            max_features: config.max_features.resolve(x.ncols()),
        };

        let mut master = ChaCha8Rng::seed_from_u64(config.seed);
        let mut trees = Vec::with_capacity(config.n_estimators);

        for _ in 0..config.n_estimators {
            let mut rng = ChaCha8Rng::seed_from_u64(master.gen::<u64>());

            let mut counts = vec![0.0; n];
            if config.bootstrap {
                for _ in 0..n {
                    counts[rng.gen_range(0..n)] += 1.0;
                }
            } else {
                counts.fill(1.0);
            }

            let weights: Vec<f64> = counts
                .iter()
                .zip(y)
                .map(|(count, &label)| count * class_weight[usize::from(label)])
                .collect();

            trees.push(DecisionTree::fit(x, y, &weights, &params, &mut rng));
        }

        log::debug!(
            "Forest fitted: {} trees, {} features, max depth reached {}",
            trees.len(),
            x.ncols(),
            trees.iter().map(DecisionTree::depth).max().unwrap_or(0)
        );

        Ok(Self {
            config: *config,
            n_features: x.ncols(),
            trees,
        })
    }

    pub fn config(&self) -> &ForestConfig {
        &self.config
    }

    pub fn trees(&self) -> &[DecisionTree] {
        &self.trees
    }

    /// Structural check for a model read back from disk
    pub fn validate(&self) -> Result<(), ModelError> {
        if self.trees.is_empty() {
            return Err(ModelError::InvalidConfig("forest has no trees".into()));
        }
        self.trees
            .iter()
            .try_for_each(|tree| tree.validate(self.n_features))
    }
}

impl ProbabilisticClassifier for RandomForest {
    fn n_features(&self) -> usize {
        self.n_features
    }

    fn predict_proba(&self, row: &[f64]) -> Result<f64, ModelError> {
        if row.len() != self.n_features {
            return Err(ModelError::FeatureCount {
                expected: self.n_features,
                actual: row.len(),
            });
        }
        if self.trees.is_empty() {
            return Err(ModelError::InvalidConfig("forest has no trees".into()));
        }

        let sum: f64 = self.trees.iter().map(|t| t.predict_proba(row)).sum();
        Ok(sum / self.trees.len() as f64)
    }
}

/// [`ModelTrainer`] for [`RandomForest`]
#[derive(Debug, Clone, Default)]
pub struct ForestTrainer {
    pub config: ForestConfig,
}

impl ForestTrainer {
    pub fn new(config: ForestConfig) -> Self {
        Self { config }
    }
}

impl ModelTrainer for ForestTrainer {
    type Model = RandomForest;

    fn fit(&self, x: ArrayView2<f64>, y: &[u8]) -> Result<RandomForest, ModelError> {
        RandomForest::fit(&self.config, x, y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array2;

    fn small_config() -> ForestConfig {
        ForestConfig {
            n_estimators: 15,
            max_depth: 6,
            min_samples_split: 2,
            min_samples_leaf: 1,
            ..Default::default()
        }
    }

    /// Two informative columns, one constant
    fn separable(rows: usize) -> (Array2<f64>, Vec<u8>) {
        let x = Array2::from_shape_fn((rows, 3), |(r, c)| match c {
            0 => r as f64,
            1 => (r % 7) as f64,
            _ => 1.0,
        });
        let y = (0..rows).map(|r| u8::from(r >= rows / 2)).collect();
        (x, y)
    }

    #[test]
    fn test_defaults() {
        let config = ForestConfig::default();
        assert_eq!(config.n_estimators, 300);
        assert_eq!(config.max_depth, 12);
        assert_eq!(config.min_samples_split, 10);
        assert_eq!(config.min_samples_leaf, 5);
        assert_eq!(config.class_weight, ClassWeight::Balanced);
        assert_eq!(config.seed, 42);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_max_features_resolution() {
        assert_eq!(MaxFeatures::Sqrt.resolve(16), 4);
        assert_eq!(MaxFeatures::Sqrt.resolve(3), 1);
        assert_eq!(MaxFeatures::All.resolve(16), 16);
        assert_eq!(MaxFeatures::Fixed(40).resolve(16), 16);
    }

    #[test]
    fn test_balanced_weights() {
        let y = [0u8, 0, 0, 1];
        let w = ClassWeight::Balanced.weights(&y);
        assert!((w[0] - 4.0 / 6.0).abs() < 1e-12);
        assert!((w[1] - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_same_seed_same_model() {
        let (x, y) = separable(60);
        let a = RandomForest::fit(&small_config(), x.view(), &y).unwrap();
        let b = RandomForest::fit(&small_config(), x.view(), &y).unwrap();
        assert_eq!(a, b);

        let c = RandomForest::fit(&ForestConfig { seed: 7, ..small_config() }, x.view(), &y).unwrap();
        assert_ne!(a, c);
    }

    #[test]
    fn test_separates_classes() {
        let (x, y) = separable(80);
        let forest = RandomForest::fit(&small_config(), x.view(), &y).unwrap();

        assert!(forest.predict_proba(&[5.0, 5.0, 1.0]).unwrap() < 0.2);
        assert!(forest.predict_proba(&[75.0, 5.0, 1.0]).unwrap() > 0.8);

        let probs = forest.predict_proba_batch(x.view()).unwrap();
        assert!(probs.iter().all(|p| (0.0..=1.0).contains(p)));
        assert!(forest.validate().is_ok());
    }

    #[test]
    fn test_rejects_single_class() {
        let x = Array2::<f64>::zeros((10, 3));
        assert_eq!(
            RandomForest::fit(&small_config(), x.view(), &[1u8; 10]),
            Err(ModelError::SingleClass)
        );
    }

    #[test]
    fn test_rejects_bad_input() {
        let (x, y) = separable(10);
        assert!(matches!(
            RandomForest::fit(&small_config(), x.view(), &y[..5]),
            Err(ModelError::LengthMismatch { .. })
        ));

        let empty = Array2::<f64>::zeros((0, 3));
        assert_eq!(
            RandomForest::fit(&small_config(), empty.view(), &[]),
            Err(ModelError::EmptyTrainingSet)
        );

        let bad = ForestConfig { n_estimators: 0, ..small_config() };
        assert!(matches!(
            RandomForest::fit(&bad, x.view(), &y),
            Err(ModelError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_wrong_row_width() {
        let (x, y) = separable(20);
        let forest = ForestTrainer::new(small_config()).fit(x.view(), &y).unwrap();
        assert_eq!(
            forest.predict_proba(&[1.0]),
            Err(ModelError::FeatureCount { expected: 3, actual: 1 })
        );
    }
}
