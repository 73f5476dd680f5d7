//! CART Decision Tree
//!
//! Binary classification tree grown with weighted Gini impurity. Nodes are
//! stored in a flat arena so the tree serializes without recursion.

use crate::dataset::Dataset;
use rand::seq::index::sample;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Growth limits for a single tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeParams {
    /// Maximum depth (the root is at depth 0)
    pub max_depth: usize,
    /// Minimum distinct samples a node needs before it may split
    pub min_samples_split: usize,
    /// Minimum distinct samples on each side of a split
    pub min_samples_leaf: usize,
    /// Features drawn as split candidates at each node
    pub max_features: usize,
}

/// Tree node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Node {
    /// Rows with `x[feature] <= threshold` go left
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    /// Normalized class distribution `[p(normal), p(fraud)]`
    Leaf { proba: [f64; 2] },
}

/// Fitted decision tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionTree {
    nodes: Vec<Node>,
}

#[derive(Debug, Clone, Copy)]
struct Split {
    feature: usize,
    threshold: f64,
    /// Weighted child impurity `w_left * gini_left + w_right * gini_right`
    score: f64,
}

fn gini(dist: [f64; 2]) -> f64 {
    let total = dist[0] + dist[1];
    if total <= 0.0 {
        return 0.0;
    }
    let p0 = dist[0] / total;
    let p1 = dist[1] / total;
    1.0 - p0 * p0 - p1 * p1
}

fn normalize(dist: [f64; 2]) -> [f64; 2] {
    let total = dist[0] + dist[1];
    if total <= 0.0 {
        [1.0, 0.0]
    } else {
        [dist[0] / total, dist[1] / total]
    }
}

impl DecisionTree {
    /// Grow a tree over `indices` with per-sample `weights`.
    ///
    /// Returns the tree and its unnormalized impurity decrease per feature.
    pub fn fit<R: Rng>(
        data: &Dataset,
        weights: &[f64],
        indices: &mut [usize],
        params: &TreeParams,
        rng: &mut R,
    ) -> (Self, Vec<f64>) {
        let mut builder = Builder {
            data,
            weights,
            params,
            rng,
            nodes: Vec::new(),
            importances: vec![0.0; data.n_features()],
        };
        builder.build(indices, 0);

        (
            Self {
                nodes: builder.nodes,
            },
            builder.importances,
        )
    }

    /// Class distribution of the leaf reached by `x`.
    ///
    /// `x` must have at least as many entries as the training rows.
    pub fn leaf_proba(&self, x: &[f64]) -> [f64; 2] {
        let mut id = 0;
        loop {
            match &self.nodes[id] {
                Node::Leaf { proba } => return *proba,
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    id = if x[*feature] <= *threshold { *left } else { *right };
                }
            }
        }
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Depth of the deepest leaf
    pub fn depth(&self) -> usize {
        fn walk(nodes: &[Node], id: usize) -> usize {
            match &nodes[id] {
                Node::Leaf { .. } => 0,
                Node::Split { left, right, .. } => 1 + walk(nodes, *left).max(walk(nodes, *right)),
            }
        }
        walk(&self.nodes, 0)
    }
}

struct Builder<'a, R> {
    data: &'a Dataset,
    weights: &'a [f64],
    params: &'a TreeParams,
    rng: &'a mut R,
    nodes: Vec<Node>,
    importances: Vec<f64>,
}

impl<R: Rng> Builder<'_, R> {
    fn distribution(&self, indices: &[usize]) -> [f64; 2] {
        let mut dist = [0.0; 2];
        for &i in indices {
            dist[self.data.label(i) as usize] += self.weights[i];
        }
        dist
    }

    fn build(&mut self, indices: &mut [usize], depth: usize) -> usize {
        let dist = self.distribution(indices);
        let node_id = self.nodes.len();
        self.nodes.push(Node::Leaf {
            proba: normalize(dist),
        });

        let impurity = gini(dist);
        if depth >= self.params.max_depth
            || indices.len() < self.params.min_samples_split
            || indices.len() < 2 * self.params.min_samples_leaf
            || impurity <= f64::EPSILON
        {
            return node_id;
        }

        let Some(split) = self.best_split(indices, dist) else {
            return node_id;
        };

        // Partition in place: rows going left end up first
        let mut mid = 0;
        for k in 0..indices.len() {
            if self.data.row(indices[k])[split.feature] <= split.threshold {
                indices.swap(k, mid);
                mid += 1;
            }
        }

        let total = dist[0] + dist[1];
        self.importances[split.feature] += total * impurity - split.score;

        let (left_indices, right_indices) = indices.split_at_mut(mid);
        let left = self.build(left_indices, depth + 1);
        let right = self.build(right_indices, depth + 1);

        self.nodes[node_id] = Node::Split {
            feature: split.feature,
            threshold: split.threshold,
            left,
            right,
        };
        node_id
    }

    fn best_split(&mut self, indices: &[usize], parent: [f64; 2]) -> Option<Split> {
        let data = self.data;
        let weights = self.weights;
        let min_leaf = self.params.min_samples_leaf.max(1);
        let n_features = data.n_features();
        let n_candidates = self.params.max_features.clamp(1, n_features);
        let candidates = sample(&mut *self.rng, n_features, n_candidates);

        let mut best: Option<Split> = None;
        let mut order = indices.to_vec();

        for feature in candidates.iter() {
            order.sort_by(|&a, &b| data.row(a)[feature].total_cmp(&data.row(b)[feature]));

            let mut left = [0.0; 2];
            for pos in 0..order.len() - 1 {
                let i = order[pos];
                left[data.label(i) as usize] += weights[i];

                let current = data.row(i)[feature];
                let next = data.row(order[pos + 1])[feature];
                if next <= current {
                    continue;
                }

                let n_left = pos + 1;
                if n_left < min_leaf || order.len() - n_left < min_leaf {
                    continue;
                }

                let right = [parent[0] - left[0], parent[1] - left[1]];
                let score = (left[0] + left[1]) * gini(left) + (right[0] + right[1]) * gini(right);

                if best.map_or(true, |b| score < b.score) {
                    let mut threshold = current + (next - current) / 2.0;
                    if threshold >= next || !threshold.is_finite() {
                        threshold = current;
                    }
                    best = Some(Split {
                        feature,
                        threshold,
                        score,
                    });
                }
            }
        }

        best
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn params(max_depth: usize) -> TreeParams {
        TreeParams {
            max_depth,
            min_samples_split: 2,
            min_samples_leaf: 1,
            max_features: 2,
        }
    }

    fn threshold_data() -> Dataset {
        // Fraud iff the first feature exceeds 10; the second is noise
        let rows: Vec<Vec<f64>> = (0..20).map(|i| vec![i as f64, (i % 3) as f64]).collect();
        let labels = (0..20).map(|i| i > 10).collect();
        Dataset::new(rows, labels).unwrap()
    }

    #[test]
    fn test_learns_threshold() {
        let data = threshold_data();
        let weights = vec![1.0; data.len()];
        let mut indices: Vec<usize> = (0..data.len()).collect();
        let mut rng = StdRng::seed_from_u64(7);

        let (tree, importances) =
            DecisionTree::fit(&data, &weights, &mut indices, &params(10), &mut rng);

        assert_eq!(tree.leaf_proba(&[2.0, 0.0]), [1.0, 0.0]);
        assert_eq!(tree.leaf_proba(&[15.0, 1.0]), [0.0, 1.0]);
        assert!(importances[0] > 0.0);
    }

    #[test]
    fn test_depth_limit() {
        let data = threshold_data();
        let weights = vec![1.0; data.len()];
        let mut indices: Vec<usize> = (0..data.len()).collect();
        let mut rng = StdRng::seed_from_u64(7);

        let (stump, _) = DecisionTree::fit(&data, &weights, &mut indices, &params(0), &mut rng);

        assert_eq!(stump.node_count(), 1);
        assert_eq!(stump.depth(), 0);
        let proba = stump.leaf_proba(&[0.0, 0.0]);
        assert!((proba[1] - 9.0 / 20.0).abs() < 1e-12);
    }

    #[test]
    fn test_pure_node_is_leaf() {
        let data = Dataset::new(vec![vec![1.0], vec![2.0], vec![3.0]], vec![true; 3]).unwrap();
        let weights = vec![1.0; 3];
        let mut indices = vec![0, 1, 2];
        let mut rng = StdRng::seed_from_u64(1);

        let (tree, importances) =
            DecisionTree::fit(&data, &weights, &mut indices, &params(5), &mut rng);

        assert_eq!(tree.node_count(), 1);
        assert_eq!(importances, vec![0.0]);
    }
}
