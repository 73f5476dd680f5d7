//! Feature Assembly Error Types

use thiserror::Error;

/// Errors while turning a payload into a feature vector
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FeatureError {
    /// Payload is not a JSON object
    #[error("Transaction must be a JSON object")]
    NotAnObject,

    /// Missing required field
    #[error("Missing required field: '{0}'")]
    MissingField(&'static str),

    /// Value could not be coerced to the expected type
    #[error("Invalid value for '{field}': {reason}")]
    InvalidField { field: &'static str, reason: String },

    /// Label outside the encoder vocabulary, under the reject policy
    #[error("Unknown {field} label: '{label}'")]
    UnknownLabel { field: &'static str, label: String },
}
