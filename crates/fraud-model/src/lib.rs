//! Fraud Model
//!
//! Label encoders, a CART random forest, evaluation metrics and the artifact
//! bundle shared by the trainer and the scoring service.

mod artifacts;
mod dataset;
mod encoder;
mod evaluation;
mod forest;
mod metadata;
mod tree;

pub use artifacts::{
    ArtifactBundle, ArtifactPaths, CATEGORY_ENCODER_FILE, LOCATION_ENCODER_FILE, METADATA_FILE,
    MODEL_FILE,
};
pub use dataset::Dataset;
pub use encoder::LabelEncoder;
pub use evaluation::{accuracy, roc_auc, ClassMetrics, ClassificationReport, ConfusionMatrix};
pub use forest::{default_max_features, ForestParams, RandomForest};
pub use metadata::{FeatureImportance, ModelMetadata};
pub use tree::{DecisionTree, TreeParams};

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while training, scoring or persisting a model
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("Failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to decode artifact {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: postcard::Error,
    },
    #[error("Failed to encode artifact: {0}")]
    Encode(#[from] postcard::Error),
    #[error("Invalid metadata in {path}: {source}")]
    Metadata {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("Invalid input shape: expected {expected} features, got {actual}")]
    ShapeMismatch { expected: usize, actual: usize },
    #[error("Training set is empty")]
    EmptyDataset,
    #[error("Row {row} has {actual} features, expected {expected}")]
    InconsistentRow {
        row: usize,
        expected: usize,
        actual: usize,
    },
    #[error("Got {rows} feature rows but {labels} labels")]
    LabelCountMismatch { rows: usize, labels: usize },
    #[error("Invalid training parameters: {0}")]
    InvalidParams(String),
}

/// Binary classifier consumed by the scoring pipeline.
///
/// Implementations must be immutable after construction so a single
/// instance can be shared across request handlers.
pub trait Classifier: Send + Sync {
    /// Probability mass assigned to the positive (fraud) class, in `[0, 1]`.
    fn predict_proba(&self, features: &[f64]) -> Result<f64, ModelError>;

    /// Binary label. Ties go to the negative class.
    fn predict(&self, features: &[f64]) -> Result<bool, ModelError> {
        Ok(self.predict_proba(features)? > 0.5)
    }
}
