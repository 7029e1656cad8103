//! CART decision tree (Gini, weighted samples)
//!
//! Nodes are stored flat with the root at index 0. Sample weights carry
//! both the bootstrap multiplicity and the class weight.

use ndarray::ArrayView2;
use rand::seq::SliceRandom;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use super::classifier::ModelError;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TreeParams {
    pub max_depth: usize,
    pub min_samples_split: usize,
    pub min_samples_leaf: usize,
    /// Features drawn per split
    pub max_features: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Node {
    Leaf {
        proba: f64,
    },
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionTree {
    nodes: Vec<Node>,
}

impl DecisionTree {
    /// Grow a tree on the rows with a positive weight
    pub fn fit(
        x: ArrayView2<f64>,
        y: &[u8],
        weights: &[f64],
        params: &TreeParams,
        rng: &mut ChaCha8Rng,
    ) -> Self {
        let mut samples: Vec<usize> = (0..x.nrows()).filter(|&i| weights[i] > 0.0).collect();

        let mut builder = Builder {
            x: x.reborrow(),
            y,
            weights,
            params,
            rng,
            nodes: Vec::new(),
        };
        builder.grow(&mut samples, 0);

        Self { nodes: builder.nodes }
    }

    /// Weighted fraction of flood samples in the leaf reached by `row`
    pub fn predict_proba(&self, row: &[f64]) -> f64 {
        let mut index = 0;
        while let Some(node) = self.nodes.get(index) {
            match *node {
                Node::Leaf { proba } => return proba,
                Node::Split { feature, threshold, left, right } => {
                    index = if row[feature] <= threshold { left } else { right };
                }
            }
        }
        0.5
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Children must come after their parent and stay inside the node list,
    /// which keeps every walk from the root finite
    pub fn validate(&self, n_features: usize) -> Result<(), ModelError> {
        if self.nodes.is_empty() {
            return Err(ModelError::InvalidConfig("tree has no nodes".into()));
        }
        for (index, node) in self.nodes.iter().enumerate() {
            let Node::Split { feature, threshold, left, right } = *node else {
                continue;
            };
            if feature >= n_features {
                return Err(ModelError::InvalidConfig(format!(
                    "node {} splits on feature {} of {}",
                    index, feature, n_features
                )));
            }
            if !threshold.is_finite() {
                return Err(ModelError::InvalidConfig(format!("node {} has a non-finite threshold", index)));
            }
            for child in [left, right] {
                if child <= index || child >= self.nodes.len() {
                    return Err(ModelError::InvalidConfig(format!(
                        "node {} points to invalid child {}",
                        index, child
                    )));
                }
            }
        }
        Ok(())
    }

    pub fn depth(&self) -> usize {
        fn walk(nodes: &[Node], index: usize) -> usize {
            match nodes.get(index) {
                Some(Node::Split { left, right, .. }) => 1 + walk(nodes, *left).max(walk(nodes, *right)),
                _ => 0,
            }
        }
        walk(&self.nodes, 0)
    }
}

// ============================================================================
// BUILDER
// ============================================================================

struct Builder<'a> {
    x: ArrayView2<'a, f64>,
    y: &'a [u8],
    weights: &'a [f64],
    params: &'a TreeParams,
    rng: &'a mut ChaCha8Rng,
    nodes: Vec<Node>,
}

struct Candidate {
    feature: usize,
    threshold: f64,
    score: f64,
}

/// Weighted Gini impurity mass: total * gini
fn gini_mass(negatives: f64, positives: f64) -> f64 {
    let total = negatives + positives;
    if total <= 0.0 {
        return 0.0;
    }
    total - (negatives * negatives + positives * positives) / total
}

impl<'a> Builder<'a> {
    fn class_weights(&self, samples: &[usize]) -> (f64, f64) {
        samples.iter().fold((0.0, 0.0), |(neg, pos), &s| {
            if self.y[s] == 1 {
                (neg, pos + self.weights[s])
            } else {
                (neg + self.weights[s], pos)
            }
        })
    }

    fn grow(&mut self, samples: &mut [usize], depth: usize) -> usize {
        let (negatives, positives) = self.class_weights(samples);
        let total = negatives + positives;
        let proba = if total > 0.0 { positives / total } else { 0.5 };

        let node = self.nodes.len();
        self.nodes.push(Node::Leaf { proba });

        let stop = depth >= self.params.max_depth
            || samples.len() < self.params.min_samples_split
            || samples.len() < 2 * self.params.min_samples_leaf
            || negatives == 0.0
            || positives == 0.0;
        if stop {
            return node;
        }

        let Some(best) = self.best_split(samples, negatives, positives) else {
            return node;
        };

        // Partition in place: rows going left first
        let mut mid = 0;
        for i in 0..samples.len() {
            if self.x[[samples[i], best.feature]] <= best.threshold {
                samples.swap(i, mid);
                mid += 1;
            }
        }

        let (left_samples, right_samples) = samples.split_at_mut(mid);
        let left = self.grow(left_samples, depth + 1);
        let right = self.grow(right_samples, depth + 1);

        self.nodes[node] = Node::Split {
            feature: best.feature,
            threshold: best.threshold,
            left,
            right,
        };
        node
    }

    fn best_split(&mut self, samples: &[usize], negatives: f64, positives: f64) -> Option<Candidate> {
        let mut features: Vec<usize> = (0..self.x.ncols()).collect();
        features.shuffle(&mut *self.rng);

        let min_leaf = self.params.min_samples_leaf.max(1);
        let mut order = samples.to_vec();
        let mut best: Option<Candidate> = None;
        let mut visited = 0;

        // Features constant within the node do not count towards max_features
        for &feature in &features {
            if visited >= self.params.max_features {
                break;
            }

            let column = self.x.column(feature);
            order.sort_by(|&a, &b| column[a].total_cmp(&column[b]));
            if column[order[0]] >= column[order[order.len() - 1]] {
                continue;
            }
            visited += 1;

            let (mut left_neg, mut left_pos) = (0.0, 0.0);
            for i in 0..order.len() - 1 {
                let s = order[i];
                if self.y[s] == 1 {
                    left_pos += self.weights[s];
                } else {
                    left_neg += self.weights[s];
                }

                let left_count = i + 1;
                if left_count < min_leaf || order.len() - left_count < min_leaf {
                    continue;
                }

                let value = column[s];
                let next = column[order[i + 1]];
                if next <= value {
                    continue;
                }

                let score = gini_mass(left_neg, left_pos)
                    + gini_mass(negatives - left_neg, positives - left_pos);

                if best.as_ref().map_or(true, |b| score < b.score - 1e-12) {
                    let mut threshold = value / 2.0 + next / 2.0;
                    if threshold >= next || threshold < value {
                        threshold = value;
                    }
                    best = Some(Candidate { feature, threshold, score });
                }
            }
        }

        best
    }
}
