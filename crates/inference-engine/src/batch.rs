//! Batch Prediction

use crate::engine::{PredictionResponse, Predictor};
use crate::{timestamp, PredictError};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info, warn};

/// Per-item record for a transaction that could not be scored
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchFailure {
    pub error: String,
    pub details: String,
    /// The element exactly as submitted
    pub transaction: Value,
}

/// One slot of a batch report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BatchItem {
    Prediction(Box<PredictionResponse>),
    Failed(BatchFailure),
}

impl BatchItem {
    pub fn is_error(&self) -> bool {
        matches!(self, BatchItem::Failed(_))
    }
}

/// Aggregated batch result, in input order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchReport {
    pub total_predictions: usize,
    pub results: Vec<BatchItem>,
    pub timestamp: String,
}

impl Predictor {
    /// Score every transaction independently.
    ///
    /// Item failures are recorded in place and never abort the batch.
    pub fn predict_batch(&self, transactions: &[Value]) -> Result<BatchReport, PredictError> {
        if transactions.is_empty() {
            return Err(PredictError::EmptyBatch);
        }

        metrics::counter!("fraud_batch_requests_total").increment(1);
        debug!("Processing batch of {} transactions", transactions.len());

        let results: Vec<BatchItem> = transactions
            .iter()
            .enumerate()
            .map(|(index, tx)| match self.predict(tx) {
                Ok(response) => BatchItem::Prediction(Box::new(response)),
                Err(e) => {
                    warn!("Batch item {} failed: {}", index, e);
                    BatchItem::Failed(BatchFailure {
                        error: "Prediction failed".to_string(),
                        details: e.to_string(),
                        transaction: tx.clone(),
                    })
                }
            })
            .collect();

        let failed = results.iter().filter(|r| r.is_error()).count();
        info!(
            "Batch completed: {} predictions, {} failed",
            results.len(),
            failed
        );

        Ok(BatchReport {
            total_predictions: results.len(),
            results,
            timestamp: timestamp(),
        })
    }
}
