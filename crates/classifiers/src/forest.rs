//! CART Decision Trees and Random Forest

use crate::{argmax, check_width, Classifier, ClassifierError, Dataset};
use ndarray::{Array2, ArrayView1};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use tracing::debug;

#[derive(Debug, Clone)]
enum Node {
    Leaf {
        /// Class frequencies at this leaf, summing to 1
        distribution: Vec<f64>,
    },
    Split {
        feature: usize,
        threshold: f64,
        left: Box<Node>,
        right: Box<Node>,
    },
}

impl Node {
    fn distribution(&self, sample: ArrayView1<'_, f64>) -> &[f64] {
        let mut node = self;
        loop {
            match node {
                Node::Leaf { distribution } => return distribution,
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    node = if sample[*feature] <= *threshold { &**left } else { &**right };
                }
            }
        }
    }

    fn depth(&self) -> usize {
        match self {
            Node::Leaf { .. } => 0,
            Node::Split { left, right, .. } => 1 + left.depth().max(right.depth()),
        }
    }
}

/// Growth limits for a single tree
#[derive(Debug, Clone, Copy)]
struct TreeLimits {
    max_depth: Option<usize>,
    min_samples_split: usize,
    max_features: usize,
}

/// Gini impurity of a class histogram holding `total` samples
fn gini(counts: &[usize], total: f64) -> f64 {
    if total == 0.0 {
        return 0.0;
    }
    1.0 - counts
        .iter()
        .map(|&c| {
            let p = c as f64 / total;
            p * p
        })
        .sum::<f64>()
}

fn class_counts(targets: &[usize], indices: &[usize], n_classes: usize) -> Vec<usize> {
    let mut counts = vec![0; n_classes];
    for &i in indices {
        counts[targets[i]] += 1;
    }
    counts
}

/// Best (feature, threshold) by weighted Gini impurity.
///
/// Features are visited in random order; the search stops once
/// `max_features` non-constant features were inspected and a split exists.
fn best_split(
    x: &Array2<f64>,
    targets: &[usize],
    indices: &[usize],
    n_classes: usize,
    max_features: usize,
    rng: &mut StdRng,
) -> Option<(usize, f64)> {
    let n = indices.len() as f64;
    let parent = class_counts(targets, indices, n_classes);

    let mut order: Vec<usize> = (0..x.ncols()).collect();
    order.shuffle(rng);

    let mut best: Option<(usize, f64, f64)> = None;
    let mut inspected = 0;
    let mut sorted = indices.to_vec();

    for feature in order {
        if inspected >= max_features && best.is_some() {
            break;
        }
        sorted.sort_by(|&a, &b| x[[a, feature]].total_cmp(&x[[b, feature]]));
        let lo = x[[sorted[0], feature]];
        let hi = x[[sorted[sorted.len() - 1], feature]];
        if lo == hi {
            continue;
        }
        inspected += 1;

        let mut left = vec![0usize; n_classes];
        let mut right = parent.clone();
        for pos in 0..sorted.len() - 1 {
            let class = targets[sorted[pos]];
            left[class] += 1;
            right[class] -= 1;

            let value = x[[sorted[pos], feature]];
            let next = x[[sorted[pos + 1], feature]];
            if value == next {
                continue;
            }

            let n_left = (pos + 1) as f64;
            let n_right = n - n_left;
            let score = n_left * gini(&left, n_left) + n_right * gini(&right, n_right);
            if best.map_or(true, |(_, _, s)| score < s) {
                let mid = value + (next - value) / 2.0;
                let threshold = if mid < next { mid } else { value };
                if !threshold.is_finite() {
                    continue;
                }
                best = Some((feature, threshold, score));
            }
        }
    }

    best.map(|(f, t, _)| (f, t))
}

fn grow(
    x: &Array2<f64>,
    targets: &[usize],
    indices: Vec<usize>,
    n_classes: usize,
    depth: usize,
    limits: TreeLimits,
    rng: &mut StdRng,
) -> Node {
    let counts = class_counts(targets, &indices, n_classes);
    let total = indices.len() as f64;
    let leaf = |counts: &[usize]| Node::Leaf {
        distribution: counts.iter().map(|&c| c as f64 / total).collect(),
    };

    let pure = counts.iter().filter(|&&c| c > 0).count() <= 1;
    let depth_reached = limits.max_depth.map_or(false, |d| depth >= d);
    if pure || depth_reached || indices.len() < limits.min_samples_split {
        return leaf(&counts);
    }

    let Some((feature, threshold)) =
        best_split(x, targets, &indices, n_classes, limits.max_features, rng)
    else {
        return leaf(&counts);
    };

    let (left_idx, right_idx): (Vec<usize>, Vec<usize>) =
        indices.into_iter().partition(|&i| x[[i, feature]] <= threshold);
    if left_idx.is_empty() || right_idx.is_empty() {
        return leaf(&counts);
    }

    Node::Split {
        feature,
        threshold,
        left: Box::new(grow(x, targets, left_idx, n_classes, depth + 1, limits, rng)),
        right: Box::new(grow(x, targets, right_idx, n_classes, depth + 1, limits, rng)),
    }
}

/// A single CART classification tree
#[derive(Debug, Clone)]
pub struct DecisionTree {
    root: Option<Node>,
    n_features: usize,
    limits: TreeLimits,
    seed: u64,
}

impl DecisionTree {
    /// Tree considering every feature at each split
    pub fn new(max_depth: Option<usize>, min_samples_split: usize, seed: u64) -> Self {
        Self {
            root: None,
            n_features: 0,
            limits: TreeLimits {
                max_depth,
                min_samples_split: min_samples_split.max(2),
                max_features: usize::MAX,
            },
            seed,
        }
    }

    fn fit_indices(&mut self, data: &Dataset, indices: Vec<usize>, rng: &mut StdRng) {
        self.n_features = data.n_features();
        self.root = Some(grow(
            data.features(),
            data.targets(),
            indices,
            data.n_classes(),
            0,
            self.limits,
            rng,
        ));
    }

    /// Depth of the fitted tree (0 for a single leaf)
    pub fn depth(&self) -> Option<usize> {
        self.root.as_ref().map(Node::depth)
    }

    fn distribution(&self, sample: ArrayView1<'_, f64>) -> Result<&[f64], ClassifierError> {
        let root = self.root.as_ref().ok_or(ClassifierError::NotFitted("decision_tree"))?;
        Ok(root.distribution(sample))
    }
}

impl Classifier for DecisionTree {
    fn kind(&self) -> &'static str {
        "decision_tree"
    }

    fn fit(&mut self, data: &Dataset) -> Result<(), ClassifierError> {
        if data.is_empty() {
            return Err(ClassifierError::EmptyTrainingSet);
        }
        let mut rng = StdRng::seed_from_u64(self.seed);
        self.fit_indices(data, (0..data.n_samples()).collect(), &mut rng);
        Ok(())
    }

    fn predict(&self, features: &Array2<f64>) -> Result<Vec<usize>, ClassifierError> {
        if self.root.is_none() {
            return Err(ClassifierError::NotFitted("decision_tree"));
        }
        check_width(self.n_features, features)?;
        features
            .rows()
            .into_iter()
            .map(|row| self.distribution(row).map(argmax))
            .collect()
    }
}

/// Bagged ensemble of randomized CART trees.
///
/// Each tree is grown on a bootstrap sample and considers `max_features`
/// (default ⌊√d⌋) features per split. Prediction averages the leaf class
/// distributions of all trees. All randomness derives from `seed`.
#[derive(Debug, Clone)]
pub struct RandomForest {
    n_estimators: usize,
    max_depth: Option<usize>,
    min_samples_split: usize,
    max_features: Option<usize>,
    bootstrap: bool,
    seed: u64,
    trees: Vec<DecisionTree>,
    n_classes: usize,
}

impl RandomForest {
    pub fn new(
        n_estimators: usize,
        max_depth: Option<usize>,
        min_samples_split: usize,
        max_features: Option<usize>,
        bootstrap: bool,
        seed: u64,
    ) -> Result<Self, ClassifierError> {
        if n_estimators == 0 {
            return Err(ClassifierError::InvalidHyperparameter(
                "n_estimators must be at least 1".into(),
            ));
        }
        if max_features == Some(0) {
            return Err(ClassifierError::InvalidHyperparameter(
                "max_features must be at least 1".into(),
            ));
        }
        Ok(Self {
            n_estimators,
            max_depth,
            min_samples_split,
            max_features,
            bootstrap,
            seed,
            trees: Vec::new(),
            n_classes: 0,
        })
    }

    /// Fitted trees
    pub fn trees(&self) -> &[DecisionTree] {
        &self.trees
    }
}

impl Classifier for RandomForest {
    fn kind(&self) -> &'static str {
        "random_forest"
    }

    fn fit(&mut self, data: &Dataset) -> Result<(), ClassifierError> {
        if data.is_empty() {
            return Err(ClassifierError::EmptyTrainingSet);
        }
        let n = data.n_samples();
        let d = data.n_features();
        let max_features = self
            .max_features
            .unwrap_or_else(|| ((d as f64).sqrt().floor() as usize).max(1))
            .min(d.max(1));

        let mut master = StdRng::seed_from_u64(self.seed);
        self.trees = (0..self.n_estimators)
            .map(|_| {
                let mut rng = StdRng::seed_from_u64(master.gen());
                let indices: Vec<usize> = if self.bootstrap {
                    (0..n).map(|_| rng.gen_range(0..n)).collect()
                } else {
                    (0..n).collect()
                };
                let mut tree = DecisionTree::new(self.max_depth, self.min_samples_split, 0);
                tree.limits.max_features = max_features;
                tree.fit_indices(data, indices, &mut rng);
                tree
            })
            .collect();
        self.n_classes = data.n_classes();

        debug!(
            "Random forest: {} trees, max_features={}, deepest={}",
            self.trees.len(),
            max_features,
            self.trees.iter().filter_map(DecisionTree::depth).max().unwrap_or(0)
        );
        Ok(())
    }

    fn predict(&self, features: &Array2<f64>) -> Result<Vec<usize>, ClassifierError> {
        let first = self.trees.first().ok_or(ClassifierError::NotFitted("random_forest"))?;
        check_width(first.n_features, features)?;

        features
            .rows()
            .into_iter()
            .map(|row| -> Result<usize, ClassifierError> {
                let mut proba = vec![0.0; self.n_classes];
                for tree in &self.trees {
                    for (p, q) in proba.iter_mut().zip(tree.distribution(row)?) {
                        *p += q;
                    }
                }
                Ok(argmax(&proba))
            })
            .collect()
    }
}
