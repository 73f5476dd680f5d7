//! Risk Tiering

use serde::{Deserialize, Serialize};

/// Lower bound of the CRITICAL band
pub const CRITICAL_THRESHOLD: f64 = 0.8;
/// Lower bound of the HIGH band
pub const HIGH_THRESHOLD: f64 = 0.5;
/// Lower bound of the MEDIUM band
pub const MEDIUM_THRESHOLD: f64 = 0.3;

/// Scores strictly above this are high confidence
pub const CONFIDENT_FRAUD_ABOVE: f64 = 0.8;
/// Scores strictly below this are high confidence
pub const CONFIDENT_NORMAL_BELOW: f64 = 0.2;

/// Discrete risk tier derived from the fraud probability
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RiskTier {
    Low,
    Medium,
    High,
    Critical,
}

impl RiskTier {
    /// Half-open bands closed on the lower side, checked high to low
    pub fn from_score(score: f64) -> Self {
        if score >= CRITICAL_THRESHOLD {
            RiskTier::Critical
        } else if score >= HIGH_THRESHOLD {
            RiskTier::High
        } else if score >= MEDIUM_THRESHOLD {
            RiskTier::Medium
        } else {
            RiskTier::Low
        }
    }

    /// Get string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskTier::Low => "LOW",
            RiskTier::Medium => "MEDIUM",
            RiskTier::High => "HIGH",
            RiskTier::Critical => "CRITICAL",
        }
    }

    /// Display color for dashboards
    pub fn color(&self) -> &'static str {
        match self {
            RiskTier::Low => "green",
            RiskTier::Medium => "yellow",
            RiskTier::High => "orange",
            RiskTier::Critical => "red",
        }
    }

    /// Get recommended action
    pub fn recommendation(&self) -> &'static str {
        match self {
            RiskTier::Low => "ALLOW - Normal transaction, no action required",
            RiskTier::Medium => "MONITOR - Watch the customer's upcoming transactions",
            RiskTier::High => "VERIFICATION REQUIRED - Request additional authentication",
            RiskTier::Critical => {
                "BLOCK TRANSACTION - Contact the customer and the security team immediately"
            }
        }
    }
}

/// How far the score sits from the undecided middle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    High,
    Medium,
}

impl Confidence {
    /// Uses 0.2/0.8 cut-offs, which differ from the tier bands
    pub fn from_score(score: f64) -> Self {
        if score > CONFIDENT_FRAUD_ABOVE || score < CONFIDENT_NORMAL_BELOW {
            Confidence::High
        } else {
            Confidence::Medium
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_band_boundaries() {
        assert_eq!(RiskTier::from_score(0.0), RiskTier::Low);
        assert_eq!(RiskTier::from_score(0.299_999), RiskTier::Low);
        assert_eq!(RiskTier::from_score(0.3), RiskTier::Medium);
        assert_eq!(RiskTier::from_score(0.499_999), RiskTier::Medium);
        assert_eq!(RiskTier::from_score(0.5), RiskTier::High);
        assert_eq!(RiskTier::from_score(0.799_999), RiskTier::High);
        assert_eq!(RiskTier::from_score(0.8), RiskTier::Critical);
        assert_eq!(RiskTier::from_score(1.0), RiskTier::Critical);
    }

    #[test]
    fn test_confidence_boundaries() {
        assert_eq!(Confidence::from_score(0.19), Confidence::High);
        assert_eq!(Confidence::from_score(0.2), Confidence::Medium);
        assert_eq!(Confidence::from_score(0.8), Confidence::Medium);
        assert_eq!(Confidence::from_score(0.81), Confidence::High);
    }

    #[test]
    fn test_serialized_names() {
        assert_eq!(serde_json::to_string(&RiskTier::Critical).unwrap(), "\"CRITICAL\"");
        assert_eq!(serde_json::to_string(&Confidence::Medium).unwrap(), "\"medium\"");
        assert_eq!(RiskTier::High.color(), "orange");
        assert!(RiskTier::Critical.recommendation().starts_with("BLOCK"));
    }

    proptest! {
        #[test]
        fn prop_tier_monotonic(a in 0.0f64..=1.0, b in 0.0f64..=1.0) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(RiskTier::from_score(lo) <= RiskTier::from_score(hi));
        }

        #[test]
        fn prop_confidence_high_iff_extreme(score in 0.0f64..=1.0) {
            let high = Confidence::from_score(score) == Confidence::High;
            prop_assert_eq!(high, score < 0.2 || score > 0.8);
        }
    }
}
