//! Random Forest Classifier

use crate::dataset::Dataset;
use crate::tree::{DecisionTree, TreeParams};
use crate::{Classifier, ModelError};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Forest hyper-parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForestParams {
    /// Number of trees
    pub n_estimators: usize,
    /// Maximum depth of each tree
    pub max_depth: usize,
    /// Minimum samples required to split a node
    pub min_samples_split: usize,
    /// Minimum samples required in each leaf
    pub min_samples_leaf: usize,
    /// Split candidates per node; `None` uses `floor(sqrt(n_features))`
    pub max_features: Option<usize>,
    /// Reweight classes inversely to their frequency
    pub balanced: bool,
    /// RNG seed for bootstrap sampling and feature selection
    pub seed: u64,
}

impl Default for ForestParams {
    fn default() -> Self {
        Self {
            n_estimators: 100,
            max_depth: 15,
            min_samples_split: 5,
            min_samples_leaf: 2,
            max_features: None,
            balanced: true,
            seed: 42,
        }
    }
}

/// Bagged ensemble of CART trees
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RandomForest {
    trees: Vec<DecisionTree>,
    n_features: usize,
    feature_importances: Vec<f64>,
    params: ForestParams,
}

/// `floor(sqrt(n_features))`, at least 1
pub fn default_max_features(n_features: usize) -> usize {
    ((n_features as f64).sqrt() as usize).max(1)
}

impl RandomForest {
    /// Fit a forest on `data`
    pub fn fit(data: &Dataset, params: &ForestParams) -> Result<Self, ModelError> {
        if params.n_estimators == 0 {
            return Err(ModelError::InvalidParams(
                "n_estimators must be at least 1".to_string(),
            ));
        }
        if data.is_empty() {
            return Err(ModelError::EmptyDataset);
        }

        let n_samples = data.len();
        let n_features = data.n_features();
        let max_features = params
            .max_features
            .unwrap_or_else(|| default_max_features(n_features))
            .clamp(1, n_features.max(1));
        let tree_params = TreeParams {
            max_depth: params.max_depth,
            min_samples_split: params.min_samples_split,
            min_samples_leaf: params.min_samples_leaf,
            max_features,
        };
        let class_weights = if params.balanced {
            data.balanced_class_weights()
        } else {
            [1.0, 1.0]
        };

        info!(
            "Fitting random forest: trees={}, samples={}, features={}, max_features={}",
            params.n_estimators, n_samples, n_features, max_features
        );

        let mut rng = StdRng::seed_from_u64(params.seed);
        let mut trees = Vec::with_capacity(params.n_estimators);
        let mut importances = vec![0.0; n_features];

        for t in 0..params.n_estimators {
            // Bootstrap multiplicities become sample weights
            let mut counts = vec![0u32; n_samples];
            for _ in 0..n_samples {
                counts[rng.gen_range(0..n_samples)] += 1;
            }
            let weights: Vec<f64> = counts
                .iter()
                .enumerate()
                .map(|(i, &c)| c as f64 * class_weights[data.label(i) as usize])
                .collect();
            let mut indices: Vec<usize> = (0..n_samples).filter(|&i| counts[i] > 0).collect();

            let (tree, tree_importances) =
                DecisionTree::fit(data, &weights, &mut indices, &tree_params, &mut rng);

            let total: f64 = tree_importances.iter().sum();
            if total > 0.0 {
                for (acc, value) in importances.iter_mut().zip(&tree_importances) {
                    *acc += value / total;
                }
            }

            debug!(
                "Tree {} grown: nodes={}, depth={}",
                t,
                tree.node_count(),
                tree.depth()
            );
            trees.push(tree);
        }

        let total: f64 = importances.iter().sum();
        if total > 0.0 {
            importances.iter_mut().for_each(|v| *v /= total);
        }

        Ok(Self {
            trees,
            n_features,
            feature_importances: importances,
            params: params.clone(),
        })
    }

    /// Averaged class distribution `[p(normal), p(fraud)]`
    pub fn predict_distribution(&self, features: &[f64]) -> Result<[f64; 2], ModelError> {
        if features.len() != self.n_features {
            return Err(ModelError::ShapeMismatch {
                expected: self.n_features,
                actual: features.len(),
            });
        }

        let mut sum = [0.0; 2];
        for tree in &self.trees {
            let proba = tree.leaf_proba(features);
            sum[0] += proba[0];
            sum[1] += proba[1];
        }
        let n = self.trees.len().max(1) as f64;
        Ok([sum[0] / n, sum[1] / n])
    }

    /// Normalized mean impurity decrease per feature (sums to 1)
    pub fn feature_importances(&self) -> &[f64] {
        &self.feature_importances
    }

    pub fn n_features(&self) -> usize {
        self.n_features
    }

    pub fn n_estimators(&self) -> usize {
        self.trees.len()
    }

    pub fn params(&self) -> &ForestParams {
        &self.params
    }
}

impl Classifier for RandomForest {
    fn predict_proba(&self, features: &[f64]) -> Result<f64, ModelError> {
        Ok(self.predict_distribution(features)?[1])
    }

    fn predict(&self, features: &[f64]) -> Result<bool, ModelError> {
        let dist = self.predict_distribution(features)?;
        Ok(dist[1] > dist[0])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Fraud iff large amount at night; the other columns are noise
    fn separable_data() -> Dataset {
        let mut rows = Vec::new();
        let mut labels = Vec::new();
        for i in 0..200 {
            let fraud = i % 5 == 0;
            let amount = if fraud { 2000.0 + (i * 7 % 1500) as f64 } else { 20.0 + (i * 13 % 400) as f64 };
            let hour = if fraud { (i % 5) as f64 } else { 8.0 + (i % 12) as f64 };
            rows.push(vec![amount, (i % 4) as f64, (i % 6) as f64, hour, (i % 7) as f64]);
            labels.push(fraud);
        }
        Dataset::new(rows, labels).unwrap()
    }

    fn small_params() -> ForestParams {
        ForestParams {
            n_estimators: 15,
            ..Default::default()
        }
    }

    #[test]
    fn test_fits_separable_data() {
        let data = separable_data();
        let forest = RandomForest::fit(&data, &small_params()).unwrap();

        assert_eq!(forest.n_estimators(), 15);
        for (row, &label) in data.rows().zip(data.labels()) {
            assert_eq!(forest.predict(row).unwrap(), label);
        }

        let low = forest.predict_proba(&[150.0, 1.0, 2.0, 14.0, 3.0]).unwrap();
        let high = forest.predict_proba(&[3500.0, 0.0, 1.0, 2.0, 1.0]).unwrap();
        assert!(low < 0.3, "low score was {low}");
        assert!(high >= 0.5, "high score was {high}");
    }

    #[test]
    fn test_importances_normalized() {
        let forest = RandomForest::fit(&separable_data(), &small_params()).unwrap();
        let importances = forest.feature_importances();

        assert_eq!(importances.len(), 5);
        assert!(importances.iter().all(|&v| v >= 0.0));
        assert!((importances.iter().sum::<f64>() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_deterministic_for_seed() {
        let data = separable_data();
        let a = RandomForest::fit(&data, &small_params()).unwrap();
        let b = RandomForest::fit(&data, &small_params()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_shape_mismatch() {
        let forest = RandomForest::fit(&separable_data(), &small_params()).unwrap();
        let err = forest.predict_proba(&[1.0, 2.0]).unwrap_err();
        assert!(matches!(err, ModelError::ShapeMismatch { expected: 5, actual: 2 }));
    }

    #[test]
    fn test_default_max_features_truncates() {
        assert_eq!(default_max_features(0), 1);
        assert_eq!(default_max_features(1), 1);
        assert_eq!(default_max_features(3), 1);
        assert_eq!(default_max_features(5), 2);
        assert_eq!(default_max_features(8), 2);
        assert_eq!(default_max_features(16), 4);
    }

    #[test]
    fn test_zero_estimators_rejected() {
        let params = ForestParams {
            n_estimators: 0,
            ..Default::default()
        };
        assert!(matches!(
            RandomForest::fit(&separable_data(), &params),
            Err(ModelError::InvalidParams(_))
        ));
    }
}
