//! Feature Vector Assembly

use crate::error::FeatureError;
use crate::input::TransactionInput;
use fraud_model::LabelEncoder;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Code used for labels outside the encoder vocabulary
pub const FALLBACK_CODE: usize = 0;

/// What to do with a categorical label the encoder has never seen
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnknownLabelPolicy {
    /// Encode as [`FALLBACK_CODE`] and log a warning
    #[default]
    Fallback,
    /// Fail the request
    Reject,
}

/// Feature vector for ML inference
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FeatureVector {
    /// `[amount, category_code, location_code, hour_of_day, day_of_week]`
    /// for raw input, or the caller's vector verbatim
    pub values: Vec<f64>,
    /// Categorical fields that fell back to the default code
    pub fallback_fields: Vec<&'static str>,
}

impl FeatureVector {
    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }
}

/// Encodes transactions with the encoders fitted at training time
#[derive(Debug, Clone)]
pub struct FeatureAssembler {
    category_encoder: LabelEncoder,
    location_encoder: LabelEncoder,
    policy: UnknownLabelPolicy,
}

impl FeatureAssembler {
    /// Create a new assembler
    pub fn new(
        category_encoder: LabelEncoder,
        location_encoder: LabelEncoder,
        policy: UnknownLabelPolicy,
    ) -> Self {
        Self {
            category_encoder,
            location_encoder,
            policy,
        }
    }

    /// Build the feature vector for one transaction
    pub fn assemble(&self, input: &TransactionInput) -> Result<FeatureVector, FeatureError> {
        let tx = match input {
            TransactionInput::Encoded(values) => {
                return Ok(FeatureVector {
                    values: values.clone(),
                    fallback_fields: Vec::new(),
                })
            }
            TransactionInput::Raw(tx) => tx,
        };

        let mut fallback_fields = Vec::new();
        let category = self.encode(
            &self.category_encoder,
            "merchant_category",
            &tx.merchant_category,
            &mut fallback_fields,
        )?;
        let location = self.encode(
            &self.location_encoder,
            "location",
            &tx.location,
            &mut fallback_fields,
        )?;

        Ok(FeatureVector {
            values: vec![
                tx.amount,
                category as f64,
                location as f64,
                tx.hour_of_day as f64,
                tx.day_of_week as f64,
            ],
            fallback_fields,
        })
    }

    fn encode(
        &self,
        encoder: &LabelEncoder,
        field: &'static str,
        label: &str,
        fallback_fields: &mut Vec<&'static str>,
    ) -> Result<usize, FeatureError> {
        if let Some(code) = encoder.transform(label) {
            return Ok(code);
        }

        match self.policy {
            UnknownLabelPolicy::Fallback => {
                warn!(
                    "Unknown {} '{}', using default code {}",
                    field, label, FALLBACK_CODE
                );
                metrics::counter!("fraud_unknown_labels_total", "field" => field).increment(1);
                fallback_fields.push(field);
                Ok(FALLBACK_CODE)
            }
            UnknownLabelPolicy::Reject => Err(FeatureError::UnknownLabel {
                field,
                label: label.to_string(),
            }),
        }
    }

    pub fn category_encoder(&self) -> &LabelEncoder {
        &self.category_encoder
    }

    pub fn location_encoder(&self) -> &LabelEncoder {
        &self.location_encoder
    }

    pub fn policy(&self) -> UnknownLabelPolicy {
        self.policy
    }
}
