//! Staged Training Pipeline
//!
//! engineered → split → scaled → trained
//!
//! Each stage is a distinct type, so the scaler can only be fit once a
//! split exists and only ever sees the training partition.

use ndarray::{Array2, ArrayView2, Axis};

use super::scaler::ScalingParameters;
use super::split::{stratified_split, SplitConfig, SplitIndices};
use super::PipelineError;
use crate::logic::dataset::LabeledDataset;
use crate::logic::features::{EngineeredFeatures, FeatureOrder, LayoutError};
use crate::logic::model::{predicted_label, ModelTrainer, ProbabilisticClassifier};

// ============================================================================
// ENGINEERED MATRIX
// ============================================================================

/// Every dataset row engineered to 16 features, columns per `order`
#[derive(Debug, Clone, PartialEq)]
pub struct EngineeredDataset {
    order: FeatureOrder,
    features: Array2<f64>,
    labels: Vec<u8>,
}

impl EngineeredDataset {
    /// Engineer all rows in canonical order
    pub fn from_dataset(dataset: &LabeledDataset) -> Self {
        let order = FeatureOrder::canonical();
        let width = order.len();
        let mut features = Array2::zeros((dataset.len(), width));

        for (mut row, observation) in features.axis_iter_mut(Axis(0)).zip(dataset.observations()) {
            let engineered = EngineeredFeatures::from_encoded(observation);
            for (slot, value) in row.iter_mut().zip(engineered.canonical()) {
                *slot = *value;
            }
        }

        Self {
            order,
            features,
            labels: dataset.labels().to_vec(),
        }
    }

    /// Reorder columns to a persisted feature order
    pub fn select_columns(&self, order: &FeatureOrder) -> Result<Self, LayoutError> {
        let source: Vec<usize> = order
            .columns()
            .iter()
            .map(|name| {
                self.order
                    .position(name)
                    .ok_or_else(|| LayoutError::UnknownColumn(name.clone()))
            })
            .collect::<Result<_, _>>()?;

        Ok(Self {
            order: order.clone(),
            features: self.features.select(Axis(1), &source),
            labels: self.labels.clone(),
        })
    }

    pub fn order(&self) -> &FeatureOrder {
        &self.order
    }

    pub fn features(&self) -> ArrayView2<f64> {
        self.features.view()
    }

    pub fn labels(&self) -> &[u8] {
        &self.labels
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Copy the given rows out as a partition
    pub fn rows(&self, indices: &[usize]) -> Partition {
        Partition {
            features: self.features.select(Axis(0), indices),
            labels: indices.iter().map(|&i| self.labels[i]).collect(),
        }
    }
}

/// One side of the split
#[derive(Debug, Clone, PartialEq)]
pub struct Partition {
    pub features: Array2<f64>,
    pub labels: Vec<u8>,
}

impl Partition {
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// `[negatives, positives]`
    pub fn class_counts(&self) -> [usize; 2] {
        let positives = self.labels.iter().filter(|&&l| l == 1).count();
        [self.labels.len() - positives, positives]
    }
}

// ============================================================================
// STAGES
// ============================================================================

pub struct Engineered {
    data: EngineeredDataset,
}

pub struct Split {
    order: FeatureOrder,
    indices: SplitIndices,
    train: Partition,
    test: Partition,
}

pub struct Scaled {
    order: FeatureOrder,
    indices: SplitIndices,
    scaler: ScalingParameters,
    train: Partition,
    test: Partition,
}

pub struct Trained<M> {
    order: FeatureOrder,
    indices: SplitIndices,
    scaler: ScalingParameters,
    model: M,
    train: Partition,
    test: Partition,
}

/// Training pipeline in stage `S`
pub struct TrainingPipeline<S> {
    state: S,
}

impl TrainingPipeline<Engineered> {
    pub fn engineer(dataset: &LabeledDataset) -> Self {
        Self {
            state: Engineered {
                data: EngineeredDataset::from_dataset(dataset),
            },
        }
    }

    pub fn dataset(&self) -> &EngineeredDataset {
        &self.state.data
    }

    pub fn split(self, config: &SplitConfig) -> Result<TrainingPipeline<Split>, PipelineError> {
        let data = self.state.data;
        let indices = stratified_split(data.labels(), config)?;
        let train = data.rows(&indices.train);
        let test = data.rows(&indices.test);

        log::info!(
            "Split {} rows: train={} test={} (seed={}, test_fraction={})",
            data.len(),
            train.len(),
            test.len(),
            config.seed,
            config.test_fraction
        );

        Ok(TrainingPipeline {
            state: Split {
                order: data.order,
                indices,
                train,
                test,
            },
        })
    }
}

impl TrainingPipeline<Split> {
    pub fn indices(&self) -> &SplitIndices {
        &self.state.indices
    }

    pub fn train_partition(&self) -> &Partition {
        &self.state.train
    }

    pub fn test_partition(&self) -> &Partition {
        &self.state.test
    }

    /// Fit on train only, then standardize both partitions
    pub fn fit_scaler(self) -> Result<TrainingPipeline<Scaled>, PipelineError> {
        let Split { order, indices, train, test } = self.state;

        let scaler = ScalingParameters::fit(train.features.view(), &order)?;
        let train = Partition {
            features: scaler.apply(train.features.view())?,
            labels: train.labels,
        };
        let test = Partition {
            features: scaler.apply(test.features.view())?,
            labels: test.labels,
        };

        Ok(TrainingPipeline {
            state: Scaled { order, indices, scaler, train, test },
        })
    }
}

impl TrainingPipeline<Scaled> {
    pub fn scaler(&self) -> &ScalingParameters {
        &self.state.scaler
    }

    pub fn train<T: ModelTrainer>(
        self,
        trainer: &T,
    ) -> Result<TrainingPipeline<Trained<T::Model>>, PipelineError> {
        let Scaled { order, indices, scaler, train, test } = self.state;
        let model = trainer.fit(train.features.view(), &train.labels)?;

        Ok(TrainingPipeline {
            state: Trained { order, indices, scaler, model, train, test },
        })
    }
}

impl<M: ProbabilisticClassifier> TrainingPipeline<Trained<M>> {
    pub fn model(&self) -> &M {
        &self.state.model
    }

    pub fn scaler(&self) -> &ScalingParameters {
        &self.state.scaler
    }

    pub fn order(&self) -> &FeatureOrder {
        &self.state.order
    }

    pub fn indices(&self) -> &SplitIndices {
        &self.state.indices
    }

    pub fn train_partition(&self) -> &Partition {
        &self.state.train
    }

    /// Scaled held-out partition
    pub fn test_partition(&self) -> &Partition {
        &self.state.test
    }

    /// Accuracy at the 0.5 cut-off on the (scaled) training partition
    pub fn train_accuracy(&self) -> Result<f64, PipelineError> {
        let probabilities = self.state.model.predict_proba_batch(self.state.train.features.view())?;
        let correct = probabilities
            .iter()
            .zip(&self.state.train.labels)
            .filter(|(p, &label)| predicted_label(**p) == label)
            .count();
        Ok(correct as f64 / self.state.train.len() as f64)
    }

    /// Model, scaler and order, ready to persist
    pub fn into_parts(self) -> (M, ScalingParameters, FeatureOrder) {
        (self.state.model, self.state.scaler, self.state.order)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::model::{ForestConfig, ForestTrainer};
    use crate::logic::testing::synthetic_dataset;

    #[test]
    fn test_engineered_matrix_shape() {
        let dataset = synthetic_dataset(30);
        let engineered = EngineeredDataset::from_dataset(&dataset);

        assert_eq!(engineered.features().dim(), (30, 16));
        assert_eq!(engineered.labels(), dataset.labels());

        let first = EngineeredFeatures::from_encoded(&dataset.observations()[0]);
        assert_eq!(engineered.features().row(0).to_vec(), first.canonical().to_vec());
    }

    #[test]
    fn test_select_columns_follows_order() {
        let dataset = synthetic_dataset(10);
        let engineered = EngineeredDataset::from_dataset(&dataset);

        let mut columns = FeatureOrder::canonical().columns().to_vec();
        columns.reverse();
        let reversed = FeatureOrder::from_columns(&columns).unwrap();
        let selected = engineered.select_columns(&reversed).unwrap();

        assert_eq!(selected.order(), &reversed);
        assert_eq!(selected.features()[[3, 0]], engineered.features()[[3, 15]]);
        assert_eq!(selected.features()[[3, 15]], engineered.features()[[3, 0]]);
    }

    #[test]
    fn test_scaler_sees_only_train_rows() {
        let dataset = synthetic_dataset(100);
        let split = TrainingPipeline::engineer(&dataset)
            .split(&SplitConfig::default())
            .unwrap();

        let expected = ScalingParameters::fit(
            split.train_partition().features.view(),
            &FeatureOrder::canonical(),
        )
        .unwrap();

        let scaled = split.fit_scaler().unwrap();
        assert_eq!(scaled.scaler().mean, expected.mean);
        assert_eq!(scaled.scaler().scale, expected.scale);
        assert_eq!(scaled.scaler().n_samples, 80);
    }

    #[test]
    fn test_full_pipeline_trains() {
        let dataset = synthetic_dataset(120);
        let trainer = ForestTrainer::new(ForestConfig {
            n_estimators: 20,
            ..Default::default()
        });

        let trained = TrainingPipeline::engineer(&dataset)
            .split(&SplitConfig::default())
            .unwrap()
            .fit_scaler()
            .unwrap()
            .train(&trainer)
            .unwrap();

        assert_eq!(trained.test_partition().len(), 24);
        assert!(trained.train_accuracy().unwrap() > 0.8);

        let (model, scaler, order) = trained.into_parts();
        assert_eq!(model.n_features(), 16);
        assert_eq!(scaler.layout_hash, order.layout_hash());
    }
}
