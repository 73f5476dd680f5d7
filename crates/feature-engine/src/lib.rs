//! Feature Engineering Engine
//!
//! Turns transaction payloads into the fixed-length numeric vector the
//! fraud classifier expects.

mod error;
mod features;
mod input;

pub use error::FeatureError;
pub use features::{FeatureAssembler, FeatureVector, UnknownLabelPolicy, FALLBACK_CODE};
pub use input::{transaction_id, RawTransaction, TransactionInput, REQUIRED_FIELDS};

/// Number of features in the vector
pub const FEATURE_DIMENSION: usize = 5;

/// Feature names in vector order, as recorded in the model metadata
pub const FEATURE_NAMES: [&str; FEATURE_DIMENSION] = [
    "amount",
    "merchant_category_encoded",
    "location_encoded",
    "hour_of_day",
    "day_of_week",
];
