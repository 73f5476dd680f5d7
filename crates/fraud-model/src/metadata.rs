//! Model Metadata Record

use serde::{Deserialize, Serialize};

/// Importance weight of one feature
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureImportance {
    pub feature: String,
    pub importance: f64,
}

/// Descriptive record written next to the model artifacts.
///
/// Only the fields the introspection endpoint needs are mandatory; the rest
/// default so that hand-written metadata files still load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelMetadata {
    pub model_type: String,
    #[serde(default)]
    pub n_estimators: Option<usize>,
    #[serde(default)]
    pub max_depth: Option<usize>,
    #[serde(default)]
    pub train_samples: Option<usize>,
    #[serde(default)]
    pub test_samples: Option<usize>,
    #[serde(default)]
    pub fraud_samples: Option<usize>,
    #[serde(default)]
    pub normal_samples: Option<usize>,
    /// Feature names in feature-vector order
    pub features: Vec<String>,
    #[serde(default)]
    pub train_accuracy: Option<f64>,
    #[serde(default)]
    pub test_accuracy: Option<f64>,
    /// Older metadata files carry a single accuracy figure
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accuracy: Option<f64>,
    #[serde(default)]
    pub auc_roc: Option<f64>,
    /// Sorted by descending importance
    pub feature_importance: Vec<FeatureImportance>,
    pub created_at: String,
    /// Known merchant category vocabulary
    pub categories: Vec<String>,
    /// Known location vocabulary
    pub locations: Vec<String>,
    #[serde(default)]
    pub dataset_file: Option<String>,
    #[serde(default)]
    pub dataset_size: Option<usize>,
    #[serde(default)]
    pub fraud_rate: Option<f64>,
}

impl ModelMetadata {
    /// Headline accuracy: test accuracy, else the legacy figure, else 1.0
    pub fn headline_accuracy(&self) -> f64 {
        self.test_accuracy.or(self.accuracy).unwrap_or(1.0)
    }
}
