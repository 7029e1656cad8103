//! Stratified train/test split
//!
//! Deterministic for a given seed and input order: rows are grouped by
//! label, each group is shuffled with a ChaCha8 stream seeded from the
//! config, and every class contributes to the test partition in proportion
//! to its size.

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::{DEFAULT_RANDOM_STATE, DEFAULT_TEST_SIZE};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SplitError {
    #[error("test fraction must be in (0, 1), got {0}")]
    InvalidFraction(f64),

    #[error("class {label} has {count} row(s); stratification needs at least 2")]
    ClassTooSmall { label: u8, count: usize },

    #[error("test fraction {fraction} leaves an empty partition for {rows} rows")]
    EmptyPartition { fraction: f64, rows: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SplitConfig {
    pub test_fraction: f64,
    pub seed: u64,
}

impl Default for SplitConfig {
    fn default() -> Self {
        Self {
            test_fraction: DEFAULT_TEST_SIZE,
            seed: DEFAULT_RANDOM_STATE,
        }
    }
}

/// Row indices of each partition, ascending
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitIndices {
    pub train: Vec<usize>,
    pub test: Vec<usize>,
}

/// Split row indices so both partitions keep the class proportions of `labels`
pub fn stratified_split(labels: &[u8], config: &SplitConfig) -> Result<SplitIndices, SplitError> {
    let fraction = config.test_fraction;
    if !(fraction > 0.0 && fraction < 1.0) {
        return Err(SplitError::InvalidFraction(fraction));
    }

    let rows = labels.len();
    let n_test = (rows as f64 * fraction).ceil() as usize;
    if n_test == 0 || n_test >= rows {
        return Err(SplitError::EmptyPartition { fraction, rows });
    }

    // Group row indices by class, keeping input order within each group
    let mut classes: Vec<u8> = labels.to_vec();
    classes.sort_unstable();
    classes.dedup();

    let groups: Vec<Vec<usize>> = classes
        .iter()
        .map(|&class| (0..rows).filter(|&i| labels[i] == class).collect())
        .collect();

    for (class, group) in classes.iter().zip(&groups) {
        if group.len() < 2 {
            return Err(SplitError::ClassTooSmall {
                label: *class,
                count: group.len(),
            });
        }
    }

    let allocation = allocate(&groups, n_test, rows);

    let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
    let mut train = Vec::with_capacity(rows - n_test);
    let mut test = Vec::with_capacity(n_test);

    for (mut group, take) in groups.into_iter().zip(allocation) {
        group.shuffle(&mut rng);
        let (held_out, kept) = group.split_at(take);
        test.extend_from_slice(held_out);
        train.extend_from_slice(kept);
    }

    train.sort_unstable();
    test.sort_unstable();

    Ok(SplitIndices { train, test })
}

/// Test rows per class: proportional floor, remainder to the largest
/// fractional parts (ties go to the lower label). Each class keeps at least
/// one training row.
fn allocate(groups: &[Vec<usize>], n_test: usize, rows: usize) -> Vec<usize> {
    let exact: Vec<f64> = groups
        .iter()
        .map(|g| g.len() as f64 * n_test as f64 / rows as f64)
        .collect();

    let mut take: Vec<usize> = exact.iter().map(|e| e.floor() as usize).collect();
    let mut remaining = n_test.saturating_sub(take.iter().sum());

    let mut by_fraction: Vec<usize> = (0..groups.len()).collect();
    by_fraction.sort_by(|&a, &b| {
        let fa = exact[a] - exact[a].floor();
        let fb = exact[b] - exact[b].floor();
        fb.total_cmp(&fa).then(a.cmp(&b))
    });

    for &class in by_fraction.iter().cycle().take(groups.len() * 2) {
        if remaining == 0 {
            break;
        }
        if take[class] + 1 < groups[class].len() {
            take[class] += 1;
            remaining -= 1;
        }
    }

    for (t, group) in take.iter_mut().zip(groups) {
        *t = (*t).min(group.len() - 1);
    }

    take
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(positives: usize, negatives: usize) -> Vec<u8> {
        // Interleave so classes are not contiguous
        let mut out = Vec::new();
        let (mut p, mut n) = (positives, negatives);
        while p > 0 || n > 0 {
            if n > 0 {
                out.push(0);
                n -= 1;
            }
            if n > 0 {
                out.push(0);
                n -= 1;
            }
            if p > 0 {
                out.push(1);
                p -= 1;
            }
        }
        out
    }

    #[test]
    fn test_same_seed_same_partition() {
        let y = labels(40, 160);
        let config = SplitConfig::default();

        let first = stratified_split(&y, &config).unwrap();
        let second = stratified_split(&y, &config).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_different_seed_different_partition() {
        let y = labels(40, 160);
        let a = stratified_split(&y, &SplitConfig { seed: 1, ..Default::default() }).unwrap();
        let b = stratified_split(&y, &SplitConfig { seed: 2, ..Default::default() }).unwrap();
        assert_ne!(a.test, b.test);
    }

    #[test]
    fn test_partitions_disjoint_and_complete() {
        let y = labels(33, 101);
        let split = stratified_split(&y, &SplitConfig::default()).unwrap();

        let mut all: Vec<usize> = split.train.iter().chain(&split.test).copied().collect();
        all.sort_unstable();
        assert_eq!(all, (0..y.len()).collect::<Vec<_>>());
    }

    #[test]
    fn test_class_proportions_preserved() {
        let y = labels(50, 200);
        let split = stratified_split(&y, &SplitConfig::default()).unwrap();

        assert_eq!(split.test.len(), 50);
        assert_eq!(split.train.len(), 200);

        let test_pos = split.test.iter().filter(|&&i| y[i] == 1).count();
        let train_pos = split.train.iter().filter(|&&i| y[i] == 1).count();
        assert_eq!(test_pos, 10);
        assert_eq!(train_pos, 40);
    }

    #[test]
    fn test_uneven_sizes_round_up_test() {
        let y = labels(7, 14);
        let split = stratified_split(&y, &SplitConfig::default()).unwrap();

        // ceil(21 * 0.2) = 5
        assert_eq!(split.test.len(), 5);
        let test_pos = split.test.iter().filter(|&&i| y[i] == 1).count();
        assert!(test_pos == 1 || test_pos == 2);
    }

    #[test]
    fn test_rejects_bad_fraction() {
        let y = labels(10, 10);
        for fraction in [0.0, 1.0, -0.2, 1.5, f64::NAN] {
            let config = SplitConfig { test_fraction: fraction, seed: 42 };
            assert!(matches!(
                stratified_split(&y, &config),
                Err(SplitError::InvalidFraction(_))
            ));
        }
    }

    #[test]
    fn test_rejects_singleton_class() {
        let mut y = vec![0u8; 20];
        y[7] = 1;
        assert_eq!(
            stratified_split(&y, &SplitConfig::default()),
            Err(SplitError::ClassTooSmall { label: 1, count: 1 })
        );
    }
}
