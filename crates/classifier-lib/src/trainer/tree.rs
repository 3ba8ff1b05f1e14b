//! CART decision tree
//!
//! Grows axis-aligned binary splits chosen by Gini impurity over a random
//! feature subset at each node, the standard building block for a bagged
//! forest.

use crate::models::NUM_FEATURES;
use rand::rngs::StdRng;
use rand::Rng;

/// Training rows shared across the recursion, referenced by index.
pub(crate) struct TreeData<'a> {
    pub rows: &'a [[f64; NUM_FEATURES]],
    pub labels: &'a [usize],
    pub n_classes: usize,
}

/// Growth limits and per-split feature subsampling width.
pub(crate) struct TreeParams {
    pub max_depth: usize,
    pub min_samples_split: usize,
    pub max_features: usize,
}

#[derive(Debug, Clone)]
enum Node {
    Leaf {
        label: usize,
    },
    Split {
        feature: usize,
        threshold: f64,
        left: Box<Node>,
        right: Box<Node>,
    },
}

#[derive(Debug, Clone)]
pub(crate) struct DecisionTree {
    root: Node,
}

impl DecisionTree {
    /// Fit a tree on the given sample indices (bootstrap duplicates allowed).
    pub fn fit(data: &TreeData, indices: &[usize], params: &TreeParams, rng: &mut StdRng) -> Self {
        Self {
            root: grow(data, indices, 0, params, rng),
        }
    }

    /// Walk the tree to a leaf label. Deterministic, no allocation.
    pub fn predict(&self, features: &[f64; NUM_FEATURES]) -> usize {
        let mut node = &self.root;
        loop {
            match node {
                Node::Leaf { label } => return *label,
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    node = if features[*feature] <= *threshold {
                        left
                    } else {
                        right
                    };
                }
            }
        }
    }
}

fn grow(
    data: &TreeData,
    indices: &[usize],
    depth: usize,
    params: &TreeParams,
    rng: &mut StdRng,
) -> Node {
    let counts = class_counts(data, indices);
    let label = majority(&counts);

    let is_pure = counts.iter().filter(|&&c| c > 0).count() <= 1;
    if is_pure || depth >= params.max_depth || indices.len() < params.min_samples_split {
        return Node::Leaf { label };
    }

    match best_split(data, indices, params, rng) {
        Some((feature, threshold)) => {
            let (left_idx, right_idx): (Vec<usize>, Vec<usize>) = indices
                .iter()
                .copied()
                .partition(|&i| data.rows[i][feature] <= threshold);
            Node::Split {
                feature,
                threshold,
                left: Box::new(grow(data, &left_idx, depth + 1, params, rng)),
                right: Box::new(grow(data, &right_idx, depth + 1, params, rng)),
            }
        }
        None => Node::Leaf { label },
    }
}

/// Find the impurity-minimizing (feature, threshold) over a random subset
/// of features, or None when no feature has two distinct values to cut
/// between. Zero-gain cuts are allowed, as in standard CART; recursion
/// still terminates because both sides of a cut are non-empty.
fn best_split(
    data: &TreeData,
    indices: &[usize],
    params: &TreeParams,
    rng: &mut StdRng,
) -> Option<(usize, f64)> {
    let n = indices.len();
    let mut best: Option<(usize, f64)> = None;
    let mut best_score = f64::INFINITY;

    for feature in sample_features(params.max_features, rng) {
        let mut ordered: Vec<(f64, usize)> = indices
            .iter()
            .map(|&i| (data.rows[i][feature], data.labels[i]))
            .collect();
        ordered.sort_by(|a, b| a.0.total_cmp(&b.0));

        let mut left = vec![0usize; data.n_classes];
        let mut right = class_counts(data, indices);

        for i in 1..n {
            let (value, label) = ordered[i - 1];
            left[label] += 1;
            right[label] -= 1;

            // Only cut between distinct values
            if ordered[i].0 <= value {
                continue;
            }
            let score = (i as f64 * gini(&left, i)
                + (n - i) as f64 * gini(&right, n - i))
                / n as f64;
            if score < best_score {
                best_score = score;
                best = Some((feature, (value + ordered[i].0) / 2.0));
            }
        }
    }

    best
}

/// Sample `count` distinct feature indices by partial Fisher-Yates.
fn sample_features(count: usize, rng: &mut StdRng) -> Vec<usize> {
    let mut features: Vec<usize> = (0..NUM_FEATURES).collect();
    let count = count.min(NUM_FEATURES);
    for i in 0..count {
        let j = rng.random_range(i..NUM_FEATURES);
        features.swap(i, j);
    }
    features.truncate(count);
    features
}

fn class_counts(data: &TreeData, indices: &[usize]) -> Vec<usize> {
    let mut counts = vec![0usize; data.n_classes];
    for &i in indices {
        counts[data.labels[i]] += 1;
    }
    counts
}

/// Majority label, ties broken toward the lower label.
fn majority(counts: &[usize]) -> usize {
    let mut best = 0;
    for (label, &count) in counts.iter().enumerate() {
        if count > counts[best] {
            best = label;
        }
    }
    best
}

fn gini(counts: &[usize], total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let total = total as f64;
    1.0 - counts
        .iter()
        .map(|&c| {
            let p = c as f64 / total;
            p * p
        })
        .sum::<f64>()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn xor_data() -> (Vec<[f64; NUM_FEATURES]>, Vec<usize>) {
        // Two informative features, the rest constant
        let mut rows = Vec::new();
        let mut labels = Vec::new();
        for (a, b, label) in [
            (0.0, 0.0, 0),
            (0.0, 1.0, 1),
            (1.0, 0.0, 1),
            (1.0, 1.0, 0),
        ] {
            for _ in 0..8 {
                let mut row = [0.5; NUM_FEATURES];
                row[0] = a;
                row[1] = b;
                rows.push(row);
                labels.push(label);
            }
        }
        (rows, labels)
    }

    #[test]
    fn test_tree_fits_xor() {
        let (rows, labels) = xor_data();
        let data = TreeData {
            rows: &rows,
            labels: &labels,
            n_classes: 2,
        };
        let indices: Vec<usize> = (0..rows.len()).collect();
        let params = TreeParams {
            max_depth: 8,
            min_samples_split: 2,
            max_features: NUM_FEATURES,
        };
        let mut rng = StdRng::seed_from_u64(7);
        let tree = DecisionTree::fit(&data, &indices, &params, &mut rng);

        for (row, &label) in rows.iter().zip(labels.iter()) {
            assert_eq!(tree.predict(row), label);
        }
    }

    #[test]
    fn test_pure_node_becomes_leaf() {
        let rows = vec![[1.0; NUM_FEATURES]; 10];
        let labels = vec![2usize; 10];
        let data = TreeData {
            rows: &rows,
            labels: &labels,
            n_classes: 3,
        };
        let indices: Vec<usize> = (0..10).collect();
        let params = TreeParams {
            max_depth: 8,
            min_samples_split: 2,
            max_features: 4,
        };
        let mut rng = StdRng::seed_from_u64(7);
        let tree = DecisionTree::fit(&data, &indices, &params, &mut rng);
        assert_eq!(tree.predict(&[1.0; NUM_FEATURES]), 2);
        assert_eq!(tree.predict(&[9.0; NUM_FEATURES]), 2);
    }

    #[test]
    fn test_gini_bounds() {
        assert_eq!(gini(&[10, 0], 10), 0.0);
        assert!((gini(&[5, 5], 10) - 0.5).abs() < 1e-12);
        assert_eq!(gini(&[], 0), 0.0);
    }

    #[test]
    fn test_majority_tie_prefers_lower_label() {
        assert_eq!(majority(&[3, 3, 1]), 0);
        assert_eq!(majority(&[1, 4, 4]), 1);
    }

    #[test]
    fn test_sample_features_distinct() {
        let mut rng = StdRng::seed_from_u64(7);
        let sampled = sample_features(4, &mut rng);
        assert_eq!(sampled.len(), 4);
        let mut unique = sampled.clone();
        unique.sort_unstable();
        unique.dedup();
        assert_eq!(unique.len(), 4);
    }
}
