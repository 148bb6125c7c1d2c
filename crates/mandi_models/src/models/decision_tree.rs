//! CART regression tree over time-position features.
//!
//! Features per observation are `[months since first observation, calendar month]`.
//! Splits minimise the summed squared error of the two children. When two
//! candidate splits reduce the error equally, the one found first wins; the
//! order in which features are scanned is shuffled per node from a seeded
//! `StdRng`, so a fixed seed always produces the same tree.
//!
//! A tree cannot extrapolate: every prediction, including months after the
//! observed range, is the mean of some leaf and so stays within the range of
//! observed prices.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use mandi_core::types::{PriceHistory, YearMonth};

use crate::error::TrainingError;

const N_FEATURES: usize = 2;

#[derive(Debug, Clone, PartialEq)]
enum Node {
    Leaf {
        value: f64,
    },
    Split {
        feature: usize,
        threshold: f64,
        left: Box<Node>,
        right: Box<Node>,
    },
}

/// Fitted regression tree.
#[derive(Debug, Clone, PartialEq)]
pub struct DecisionTreeModel {
    origin: YearMonth,
    root: Node,
    depth: usize,
    leaves: usize,
    seed: u64,
}

struct Sample {
    x: [f64; N_FEATURES],
    y: f64,
}

struct Builder {
    max_depth: usize,
    min_samples_leaf: usize,
    rng: StdRng,
    depth: usize,
    leaves: usize,
}

impl DecisionTreeModel {
    /// Grow a tree on `history`.
    ///
    /// # Errors
    ///
    /// `TrainingError::InsufficientHistory` for fewer than 2 observations.
    pub fn fit(
        history: &PriceHistory,
        max_depth: usize,
        min_samples_leaf: usize,
        seed: u64,
    ) -> Result<Self, TrainingError> {
        let n = history.len();
        if n < 2 {
            return Err(TrainingError::InsufficientHistory { got: n, need: 2 });
        }

        let origin = history.first().period;
        let mut samples: Vec<Sample> = history
            .records()
            .iter()
            .map(|r| Sample {
                x: features(origin, r.period),
                y: r.price,
            })
            .collect();

        let mut builder = Builder {
            max_depth,
            min_samples_leaf: min_samples_leaf.max(1),
            rng: StdRng::seed_from_u64(seed),
            depth: 0,
            leaves: 0,
        };
        let root = builder.grow(&mut samples, 0);

        Ok(Self {
            origin,
            root,
            depth: builder.depth,
            leaves: builder.leaves,
            seed,
        })
    }

    /// Predicted price for `period`.
    pub fn predict(&self, period: YearMonth) -> f64 {
        let x = features(self.origin, period);
        let mut node = &self.root;
        loop {
            match node {
                Node::Leaf { value } => return *value,
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    node = if x[*feature] <= *threshold { left } else { right };
                }
            }
        }
    }

    /// Depth of the deepest leaf.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Number of leaves.
    pub fn leaf_count(&self) -> usize {
        self.leaves
    }

    /// Seed used for split tie-breaking.
    pub fn seed(&self) -> u64 {
        self.seed
    }
}

fn features(origin: YearMonth, period: YearMonth) -> [f64; N_FEATURES] {
    [
        period.months_since(origin) as f64,
        f64::from(period.month()),
    ]
}

struct SplitCandidate {
    feature: usize,
    threshold: f64,
    sse: f64,
}

impl Builder {
    fn grow(&mut self, samples: &mut [Sample], depth: usize) -> Node {
        self.depth = self.depth.max(depth);

        let n = samples.len();
        let mean = samples.iter().map(|s| s.y).sum::<f64>() / n as f64;
        let sse: f64 = samples.iter().map(|s| (s.y - mean).powi(2)).sum();

        if depth >= self.max_depth || n < 2 * self.min_samples_leaf || sse <= 0.0 {
            return self.leaf(mean);
        }

        let mut order: Vec<usize> = (0..N_FEATURES).collect();
        order.shuffle(&mut self.rng);

        let mut best: Option<SplitCandidate> = None;
        for &feature in &order {
            if let Some(candidate) = self.best_split(samples, feature) {
                let better = best.as_ref().map_or(true, |b| candidate.sse < b.sse);
                if better {
                    best = Some(candidate);
                }
            }
        }

        match best {
            Some(split) if split.sse < sse => {
                samples.sort_by(|a, b| a.x[split.feature].total_cmp(&b.x[split.feature]));
                let cut = samples.partition_point(|s| s.x[split.feature] <= split.threshold);
                let (left, right) = samples.split_at_mut(cut);

                let left = Box::new(self.grow(left, depth + 1));
                let right = Box::new(self.grow(right, depth + 1));
                Node::Split {
                    feature: split.feature,
                    threshold: split.threshold,
                    left,
                    right,
                }
            }
            _ => self.leaf(mean),
        }
    }

    fn leaf(&mut self, value: f64) -> Node {
        self.leaves += 1;
        Node::Leaf { value }
    }

    /// Lowest-SSE threshold on one feature, scanning sorted values with
    /// running sums.
    fn best_split(&self, samples: &mut [Sample], feature: usize) -> Option<SplitCandidate> {
        samples.sort_by(|a, b| a.x[feature].total_cmp(&b.x[feature]));

        let n = samples.len();
        let total_sum: f64 = samples.iter().map(|s| s.y).sum();
        let total_sq: f64 = samples.iter().map(|s| s.y * s.y).sum();

        let mut left_sum = 0.0;
        let mut left_sq = 0.0;
        let mut best: Option<SplitCandidate> = None;

        for i in 0..n - 1 {
            left_sum += samples[i].y;
            left_sq += samples[i].y * samples[i].y;

            let n_left = i + 1;
            let n_right = n - n_left;
            if n_left < self.min_samples_leaf || n_right < self.min_samples_leaf {
                continue;
            }
            if samples[i].x[feature] == samples[i + 1].x[feature] {
                continue;
            }

            let right_sum = total_sum - left_sum;
            let right_sq = total_sq - left_sq;
            let sse = (left_sq - left_sum * left_sum / n_left as f64)
                + (right_sq - right_sum * right_sum / n_right as f64);

            if best.as_ref().map_or(true, |b| sse < b.sse) {
                best = Some(SplitCandidate {
                    feature,
                    threshold: 0.5 * (samples[i].x[feature] + samples[i + 1].x[feature]),
                    sse,
                });
            }
        }

        best
    }
}
