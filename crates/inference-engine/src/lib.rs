//! Fraud Inference Engine
//!
//! Scores transactions with the loaded classifier and maps the fraud
//! probability to a risk tier, confidence label and recommendation.

mod batch;
mod engine;
mod risk;
mod self_test;

pub use batch::{BatchFailure, BatchItem, BatchReport};
pub use engine::{ModelInfo, PredictionResponse, Predictor, Score};
pub use risk::{Confidence, RiskTier};
pub use self_test::{
    fraud_transaction, normal_transaction, CaseOutcome, SelfTestCase, SelfTestCases, SelfTestReport,
};

use feature_engine::FeatureError;
use fraud_model::ModelError;
use thiserror::Error;

/// Errors during prediction
#[derive(Debug, Error)]
pub enum PredictError {
    #[error(transparent)]
    Feature(#[from] FeatureError),
    #[error("Inference failed: {0}")]
    Inference(#[from] ModelError),
    #[error("No transactions provided")]
    EmptyBatch,
}

/// Local ISO-8601 timestamp with microseconds
pub fn timestamp() -> String {
    chrono::Local::now()
        .naive_local()
        .format("%Y-%m-%dT%H:%M:%S%.6f")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timestamp_format() {
        let ts = timestamp();
        assert!(chrono::NaiveDateTime::parse_from_str(&ts, "%Y-%m-%dT%H:%M:%S%.f").is_ok());
        // Microsecond precision, no offset
        assert_eq!(ts.split('.').nth(1).map(str::len), Some(6));
    }
}
