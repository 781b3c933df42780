//! Isolation Forest anomaly detector
//!
//! Each tree isolates points with random axis-aligned splits; anomalies
//! need fewer splits, so a short average path length means a high anomaly
//! score. Scores follow Liu et al. (2008): `s = 2^(-E[h(x)] / c(psi))`.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const EULER_GAMMA: f64 = 0.577_215_664_901_532_9;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ForestParams {
    pub n_estimators: usize,
    pub max_samples: usize,
    /// Expected share of anomalies in the training data
    pub contamination: f64,
    pub seed: u64,
}

impl Default for ForestParams {
    fn default() -> Self {
        Self {
            n_estimators: 100,
            max_samples: 256,
            contamination: 0.1,
            seed: 42,
        }
    }
}

#[derive(Debug, Clone)]
enum Node {
    Leaf {
        size: usize,
    },
    Split {
        feature: usize,
        threshold: f64,
        left: Box<Node>,
        right: Box<Node>,
    },
}

impl Node {
    fn build(rows: &[&[f64]], depth: usize, max_depth: usize, rng: &mut StdRng) -> Node {
        if depth >= max_depth || rows.len() <= 1 {
            return Node::Leaf { size: rows.len() };
        }

        let dims = rows[0].len();
        let splittable: Vec<(usize, f64, f64)> = (0..dims)
            .filter_map(|feature| {
                let (lo, hi) = rows.iter().fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), r| {
                    (lo.min(r[feature]), hi.max(r[feature]))
                });
                (lo < hi).then_some((feature, lo, hi))
            })
            .collect();

        if splittable.is_empty() {
            return Node::Leaf { size: rows.len() };
        }

        let (feature, lo, hi) = splittable[rng.gen_range(0..splittable.len())];
        let threshold = rng.gen_range(lo..hi);
        let (left, right): (Vec<&[f64]>, Vec<&[f64]>) =
            rows.iter().partition(|r| r[feature] < threshold);

        Node::Split {
            feature,
            threshold,
            left: Box::new(Node::build(&left, depth + 1, max_depth, rng)),
            right: Box::new(Node::build(&right, depth + 1, max_depth, rng)),
        }
    }

    fn path_length(&self, point: &[f64]) -> f64 {
        let mut node = self;
        let mut depth = 0.0;
        loop {
            match node {
                Node::Leaf { size } => return depth + average_path_length(*size),
                Node::Split { feature, threshold, left, right } => {
                    node = if point[*feature] < *threshold { &**left } else { &**right };
                    depth += 1.0;
                }
            }
        }
    }
}

/// Average path length of an unsuccessful BST search over `n` points
fn average_path_length(n: usize) -> f64 {
    match n {
        0 | 1 => 0.0,
        2 => 1.0,
        _ => {
            let n = n as f64;
            2.0 * ((n - 1.0).ln() + EULER_GAMMA) - 2.0 * (n - 1.0) / n
        }
    }
}

#[derive(Debug, Clone)]
pub struct IsolationForest {
    trees: Vec<Node>,
    sample_size: usize,
    /// Scores above this are anomalies
    threshold: f64,
}

impl IsolationForest {
    /// Fit on `rows`. Returns `None` for an empty training set.
    pub fn fit(rows: &[Vec<f64>], params: ForestParams) -> Option<Self> {
        if rows.is_empty() {
            return None;
        }

        let mut rng = StdRng::seed_from_u64(params.seed);
        let sample_size = params.max_samples.clamp(1, rows.len());
        let max_depth = (sample_size as f64).log2().ceil() as usize;

        let trees = (0..params.n_estimators.max(1))
            .map(|_| {
                let sample: Vec<&[f64]> = rand::seq::index::sample(&mut rng, rows.len(), sample_size)
                    .into_iter()
                    .map(|i| rows[i].as_slice())
                    .collect();
                Node::build(&sample, 0, max_depth, &mut rng)
            })
            .collect();

        let mut forest = Self { trees, sample_size, threshold: f64::INFINITY };

        let mut scores: Vec<f64> = rows.iter().map(|r| forest.score(r)).collect();
        scores.sort_by(f64::total_cmp);
        forest.threshold = quantile(&scores, 1.0 - params.contamination.clamp(0.0, 0.5));

        Some(forest)
    }

    /// Anomaly score in (0, 1]; higher is more anomalous
    pub fn score(&self, point: &[f64]) -> f64 {
        let mean_path = self.trees.iter().map(|t| t.path_length(point)).sum::<f64>()
            / self.trees.len() as f64;
        let normalizer = average_path_length(self.sample_size);
        if normalizer == 0.0 {
            return 0.5;
        }
        2f64.powf(-mean_path / normalizer)
    }

    /// `-1` for an anomaly, `+1` for a normal point
    pub fn predict(&self, point: &[f64]) -> i8 {
        if self.score(point) > self.threshold {
            -1
        } else {
            1
        }
    }
}

/// Linear-interpolated quantile of sorted, non-empty `values`
fn quantile(sorted: &[f64], q: f64) -> f64 {
    let pos = q * (sorted.len() - 1) as f64;
    let lower = pos.floor() as usize;
    let upper = pos.ceil() as usize;
    let frac = pos - lower as f64;
    sorted[lower] + (sorted[upper] - sorted[lower]) * frac
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cluster(n: usize) -> Vec<Vec<f64>> {
        let mut rng = StdRng::seed_from_u64(7);
        (0..n)
            .map(|_| vec![rng.gen_range(-1.0..1.0), rng.gen_range(-1.0..1.0)])
            .collect()
    }

    #[test]
    fn outlier_scores_higher_than_inlier() {
        let forest = IsolationForest::fit(&cluster(500), ForestParams::default()).unwrap();

        let inlier = forest.score(&[0.0, 0.0]);
        let outlier = forest.score(&[25.0, -30.0]);

        assert!(outlier > inlier);
        assert_eq!(forest.predict(&[25.0, -30.0]), -1);
        assert_eq!(forest.predict(&[0.0, 0.0]), 1);
    }

    #[test]
    fn flags_roughly_the_contamination_share() {
        let data = cluster(1000);
        let forest = IsolationForest::fit(&data, ForestParams::default()).unwrap();

        let flagged = data.iter().filter(|r| forest.predict(r) == -1).count();
        assert!(flagged > 50 && flagged < 150, "flagged {}", flagged);
    }

    #[test]
    fn same_seed_same_scores() {
        let data = cluster(300);
        let a = IsolationForest::fit(&data, ForestParams::default()).unwrap();
        let b = IsolationForest::fit(&data, ForestParams::default()).unwrap();
        assert_eq!(a.score(&[0.3, 0.9]), b.score(&[0.3, 0.9]));
    }

    #[test]
    fn empty_training_set() {
        assert!(IsolationForest::fit(&[], ForestParams::default()).is_none());
    }

    #[test]
    fn path_length_correction() {
        assert_eq!(average_path_length(1), 0.0);
        assert_eq!(average_path_length(2), 1.0);
        assert!(average_path_length(256) > average_path_length(16));
    }
}
