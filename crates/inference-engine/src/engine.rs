//! Inference Engine Implementation

use crate::risk::{Confidence, RiskTier};
use crate::{timestamp, PredictError};
use feature_engine::{
    transaction_id, FeatureAssembler, FeatureVector, TransactionInput, UnknownLabelPolicy,
};
use fraud_model::{ArtifactBundle, Classifier, FeatureImportance, ModelMetadata};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info};

/// Raw classifier output for one vector
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Score {
    pub is_fraud: bool,
    pub fraud_score: f64,
}

/// Response record for a single transaction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResponse {
    /// Caller's identifier, `null` when absent
    pub transaction_id: Value,
    pub is_fraud: bool,
    /// Probability of the fraud class
    pub fraud_score: f64,
    /// `fraud_score` as a percentage with two decimals
    pub fraud_probability: String,
    pub risk_level: RiskTier,
    pub risk_color: String,
    pub timestamp: String,
    pub confidence: Confidence,
    pub recommendation: String,
}

impl PredictionResponse {
    fn new(transaction_id: Value, score: Score) -> Self {
        let tier = RiskTier::from_score(score.fraud_score);
        Self {
            transaction_id,
            is_fraud: score.is_fraud,
            fraud_score: score.fraud_score,
            fraud_probability: format!("{:.2}%", score.fraud_score * 100.0),
            risk_level: tier,
            risk_color: tier.color().to_string(),
            timestamp: timestamp(),
            confidence: Confidence::from_score(score.fraud_score),
            recommendation: tier.recommendation().to_string(),
        }
    }
}

/// Summary served by the model introspection endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelInfo {
    pub model_type: String,
    pub accuracy: f64,
    pub train_samples: Option<usize>,
    pub features: Vec<String>,
    pub feature_importance: Vec<FeatureImportance>,
    pub created_at: String,
    pub categories: Vec<String>,
    pub locations: Vec<String>,
}

/// Immutable scoring pipeline built once from the loaded artifacts
pub struct Predictor {
    classifier: Box<dyn Classifier>,
    assembler: FeatureAssembler,
    metadata: ModelMetadata,
}

impl Predictor {
    /// Create a predictor from its parts
    pub fn new(
        classifier: Box<dyn Classifier>,
        assembler: FeatureAssembler,
        metadata: ModelMetadata,
    ) -> Self {
        Self {
            classifier,
            assembler,
            metadata,
        }
    }

    /// Create a predictor from a loaded artifact bundle
    pub fn from_bundle(bundle: ArtifactBundle, policy: UnknownLabelPolicy) -> Self {
        let assembler =
            FeatureAssembler::new(bundle.category_encoder, bundle.location_encoder, policy);
        Self::new(Box::new(bundle.classifier), assembler, bundle.metadata)
    }

    /// Run the classifier on an assembled vector
    pub fn score(&self, features: &FeatureVector) -> Result<Score, PredictError> {
        let values = features.as_slice();
        let is_fraud = self.classifier.predict(values)?;
        let fraud_score = self.classifier.predict_proba(values)?;
        Ok(Score {
            is_fraud,
            fraud_score,
        })
    }

    /// Score one JSON payload
    pub fn predict(&self, payload: &Value) -> Result<PredictionResponse, PredictError> {
        let result = self.predict_inner(payload);
        if result.is_err() {
            metrics::counter!("fraud_prediction_errors_total").increment(1);
        }
        result
    }

    fn predict_inner(&self, payload: &Value) -> Result<PredictionResponse, PredictError> {
        let input = TransactionInput::from_json(payload)?;
        let features = self.assembler.assemble(&input)?;
        debug!("Assembled features: {:?}", features.values);
        if !features.fallback_fields.is_empty() {
            debug!("Fallback code used for: {:?}", features.fallback_fields);
        }

        let score = self.score(&features)?;
        let response = PredictionResponse::new(transaction_id(payload), score);

        metrics::counter!("fraud_predictions_total", "risk_level" => response.risk_level.as_str())
            .increment(1);
        info!(
            "Prediction made: is_fraud={} (score: {:.4})",
            response.is_fraud, response.fraud_score
        );

        Ok(response)
    }

    /// Summary of the metadata record
    pub fn model_info(&self) -> ModelInfo {
        let m = &self.metadata;
        ModelInfo {
            model_type: m.model_type.clone(),
            accuracy: m.headline_accuracy(),
            train_samples: m.train_samples,
            features: m.features.clone(),
            feature_importance: m.feature_importance.clone(),
            created_at: m.created_at.clone(),
            categories: m.categories.clone(),
            locations: m.locations.clone(),
        }
    }

    pub fn metadata(&self) -> &ModelMetadata {
        &self.metadata
    }

    pub fn assembler(&self) -> &FeatureAssembler {
        &self.assembler
    }
}
