//! Canonical Smoke Test

use crate::engine::{PredictionResponse, Predictor};
use crate::timestamp;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Outcome of one canonical case
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CaseOutcome {
    Prediction(Box<PredictionResponse>),
    Error { error: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelfTestCase {
    pub input: Value,
    pub output: CaseOutcome,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelfTestCases {
    pub normal_transaction: SelfTestCase,
    pub fraud_transaction: SelfTestCase,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelfTestReport {
    pub test_cases: SelfTestCases,
    pub timestamp: String,
}

/// Everyday grocery purchase in the afternoon
pub fn normal_transaction() -> Value {
    json!({
        "transaction_id": "TEST_NORMAL",
        "amount": 150.0,
        "merchant_category": "Groceries",
        "location": "Paris, France",
        "hour_of_day": 14,
        "day_of_week": 3
    })
}

/// Large crypto purchase abroad at night
pub fn fraud_transaction() -> Value {
    json!({
        "transaction_id": "TEST_FRAUD",
        "amount": 3500.0,
        "merchant_category": "Cryptocurrency",
        "location": "Dubai, UAE",
        "hour_of_day": 2,
        "day_of_week": 1
    })
}

impl Predictor {
    /// Score both canonical transactions
    pub fn self_test(&self) -> SelfTestReport {
        SelfTestReport {
            test_cases: SelfTestCases {
                normal_transaction: self.run_case(normal_transaction()),
                fraud_transaction: self.run_case(fraud_transaction()),
            },
            timestamp: timestamp(),
        }
    }

    fn run_case(&self, input: Value) -> SelfTestCase {
        let output = match self.predict(&input) {
            Ok(response) => CaseOutcome::Prediction(Box::new(response)),
            Err(e) => CaseOutcome::Error {
                error: e.to_string(),
            },
        };
        SelfTestCase { input, output }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::tests::predictor;
    use crate::RiskTier;

    #[test]
    fn test_canonical_cases() {
        let report = predictor().self_test();

        let CaseOutcome::Prediction(normal) = &report.test_cases.normal_transaction.output else {
            panic!("normal case failed");
        };
        let CaseOutcome::Prediction(fraud) = &report.test_cases.fraud_transaction.output else {
            panic!("fraud case failed");
        };

        assert_eq!(normal.transaction_id, json!("TEST_NORMAL"));
        assert_eq!(normal.risk_level, RiskTier::Low);
        assert!(!normal.is_fraud);
        assert!(fraud.risk_level >= RiskTier::High);
        assert_eq!(report.test_cases.fraud_transaction.input, fraud_transaction());
    }
}
