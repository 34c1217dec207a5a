//! Random forest of CART trees for binary classification.

use anyhow::Result;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::ml::N_FEATURES;

/// One node of a fitted tree. Samples with `feature <= threshold` go left.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum TreeNode {
    Leaf {
        /// Fraction of positive-class samples that reached this leaf.
        proba: f64,
    },
    Split {
        feature: usize,
        threshold: f64,
        left: Box<TreeNode>,
        right: Box<TreeNode>,
    },
}

impl TreeNode {
    fn predict(&self, x: &[f64; N_FEATURES]) -> f64 {
        match self {
            TreeNode::Leaf { proba } => *proba,
            TreeNode::Split {
                feature,
                threshold,
                left,
                right,
            } => {
                if x[*feature] <= *threshold {
                    left.predict(x)
                } else {
                    right.predict(x)
                }
            }
        }
    }
}

/// Random forest classifier: bootstrap-sampled CART trees with gini splits
/// over a random feature subset per node. `predict_proba` averages the leaf
/// positive-class fractions across trees.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RandomForestClassifier {
    n_estimators: usize,
    max_depth: usize,
    min_samples_split: usize,
    max_features: usize,
    seed: u64,
    trees: Vec<TreeNode>,
    feature_importances: Vec<f64>,
}

impl RandomForestClassifier {
    pub fn new() -> Self {
        Self {
            n_estimators: 50,
            max_depth: 12,
            min_samples_split: 2,
            max_features: 2,
            seed: 42,
            trees: Vec::new(),
            feature_importances: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_n_estimators(mut self, n_estimators: usize) -> Self {
        self.n_estimators = n_estimators;
        self
    }

    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Fits the forest on raw feature rows and 0/1 labels.
    pub fn fit(&mut self, x: &[[f64; N_FEATURES]], y: &[u8]) -> Result<()> {
        anyhow::ensure!(!x.is_empty(), "training set is empty");
        anyhow::ensure!(
            x.len() == y.len(),
            "feature rows ({}) and labels ({}) differ in length",
            x.len(),
            y.len()
        );

        let n = x.len();
        let mut rng = StdRng::seed_from_u64(self.seed);
        let mut trees = Vec::with_capacity(self.n_estimators);
        let mut importances = vec![0.0; N_FEATURES];

        for _ in 0..self.n_estimators {
            let sample: Vec<usize> = (0..n).map(|_| rng.gen_range(0..n)).collect();
            let mut tree_importances = [0.0; N_FEATURES];
            let root = self.build_node(x, y, sample, 0, n, &mut rng, &mut tree_importances);

            let total: f64 = tree_importances.iter().sum();
            if total > 0.0 {
                for (acc, imp) in importances.iter_mut().zip(&tree_importances) {
                    *acc += imp / total;
                }
            }
            trees.push(root);
        }

        let total: f64 = importances.iter().sum();
        if total > 0.0 {
            for imp in &mut importances {
                *imp /= total;
            }
        }

        self.trees = trees;
        self.feature_importances = importances;
        Ok(())
    }

    #[allow(clippy::too_many_arguments)]
    fn build_node(
        &self,
        x: &[[f64; N_FEATURES]],
        y: &[u8],
        indices: Vec<usize>,
        depth: usize,
        n_root: usize,
        rng: &mut StdRng,
        importances: &mut [f64; N_FEATURES],
    ) -> TreeNode {
        let n = indices.len();
        let positives = indices.iter().filter(|&&i| y[i] == 1).count();
        let proba = positives as f64 / n as f64;

        if depth >= self.max_depth
            || n < self.min_samples_split
            || positives == 0
            || positives == n
        {
            return TreeNode::Leaf { proba };
        }

        let node_gini = gini(positives, n);
        let mut best: Option<(usize, f64, f64)> = None;

        for feature in random_feature_subset(rng, self.max_features) {
            if let Some((threshold, split_gini)) = best_split(x, y, &indices, feature) {
                if best.is_none_or(|(_, _, g)| split_gini < g) {
                    best = Some((feature, threshold, split_gini));
                }
            }
        }

        let Some((feature, threshold, split_gini)) = best else {
            return TreeNode::Leaf { proba };
        };
        let decrease = node_gini - split_gini;
        if decrease <= 1e-12 {
            return TreeNode::Leaf { proba };
        }

        importances[feature] += decrease * n as f64 / n_root as f64;

        let (left_idx, right_idx): (Vec<usize>, Vec<usize>) = indices
            .into_iter()
            .partition(|&i| x[i][feature] <= threshold);

        let left = self.build_node(x, y, left_idx, depth + 1, n_root, rng, importances);
        let right = self.build_node(x, y, right_idx, depth + 1, n_root, rng, importances);
        TreeNode::Split {
            feature,
            threshold,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    /// Mean positive-class probability across all trees.
    pub fn predict_proba(&self, x: &[f64; N_FEATURES]) -> f64 {
        if self.trees.is_empty() {
            return 0.0;
        }
        let sum: f64 = self.trees.iter().map(|t| t.predict(x)).sum();
        sum / self.trees.len() as f64
    }

    /// Normalized mean-decrease-in-impurity importances, in feature order.
    pub fn feature_importances(&self) -> &[f64] {
        &self.feature_importances
    }

    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }
}

impl Default for RandomForestClassifier {
    fn default() -> Self {
        Self::new()
    }
}

fn gini(positives: usize, n: usize) -> f64 {
    let p = positives as f64 / n as f64;
    2.0 * p * (1.0 - p)
}

/// Distinct feature indices, `count` of them, in random order.
fn random_feature_subset(rng: &mut StdRng, count: usize) -> Vec<usize> {
    rand::seq::index::sample(rng, N_FEATURES, count.min(N_FEATURES)).into_vec()
}

/// Best threshold for one feature by weighted gini of the two sides, found
/// with a single sweep over the sorted values. Returns None when the feature
/// is constant over the node.
fn best_split(
    x: &[[f64; N_FEATURES]],
    y: &[u8],
    indices: &[usize],
    feature: usize,
) -> Option<(f64, f64)> {
    let mut values: Vec<(f64, u8)> = indices.iter().map(|&i| (x[i][feature], y[i])).collect();
    values.sort_by(|a, b| a.0.total_cmp(&b.0));

    let n = values.len();
    let total_pos: usize = values.iter().filter(|(_, label)| *label == 1).count();

    let mut best: Option<(f64, f64)> = None;
    let mut left_n = 0usize;
    let mut left_pos = 0usize;
    for k in 0..n - 1 {
        left_n += 1;
        left_pos += usize::from(values[k].1);
        if values[k].0 == values[k + 1].0 {
            continue;
        }
        let right_n = n - left_n;
        let right_pos = total_pos - left_pos;
        let weighted = (left_n as f64 * gini(left_pos, left_n)
            + right_n as f64 * gini(right_pos, right_n))
            / n as f64;
        if best.is_none_or(|(_, g)| weighted < g) {
            let threshold = (values[k].0 + values[k + 1].0) / 2.0;
            best = Some((threshold, weighted));
        }
    }
    best
}
