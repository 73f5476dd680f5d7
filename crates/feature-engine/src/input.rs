//! Transaction Payload Parsing

use crate::error::FeatureError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Raw fields, in the order they are checked
pub const REQUIRED_FIELDS: [&str; 5] = [
    "amount",
    "merchant_category",
    "location",
    "hour_of_day",
    "day_of_week",
];

/// Un-encoded transaction attributes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawTransaction {
    pub amount: f64,
    pub merchant_category: String,
    pub location: String,
    /// Opaque integer, no range enforcement
    pub hour_of_day: i64,
    /// Opaque integer, no range enforcement
    pub day_of_week: i64,
}

/// One scoring request
#[derive(Debug, Clone, PartialEq)]
pub enum TransactionInput {
    /// Pre-encoded vector, used verbatim
    Encoded(Vec<f64>),
    /// Raw attributes that still need encoding
    Raw(RawTransaction),
}

impl TransactionInput {
    /// Parse a JSON payload.
    ///
    /// A `features` key wins over everything else in the object. Otherwise
    /// all of [`REQUIRED_FIELDS`] must be present.
    pub fn from_json(value: &Value) -> Result<Self, FeatureError> {
        let object = value.as_object().ok_or(FeatureError::NotAnObject)?;

        if let Some(features) = object.get("features") {
            return parse_vector(features).map(Self::Encoded);
        }

        Ok(Self::Raw(RawTransaction {
            amount: coerce_float("amount", required(object, "amount")?)?,
            merchant_category: coerce_label(required(object, "merchant_category")?),
            location: coerce_label(required(object, "location")?),
            hour_of_day: coerce_int("hour_of_day", required(object, "hour_of_day")?)?,
            day_of_week: coerce_int("day_of_week", required(object, "day_of_week")?)?,
        }))
    }
}

/// Passthrough identifier, `null` when absent
pub fn transaction_id(value: &Value) -> Value {
    value.get("transaction_id").cloned().unwrap_or(Value::Null)
}

fn required<'a>(object: &'a Map<String, Value>, field: &'static str) -> Result<&'a Value, FeatureError> {
    object.get(field).ok_or(FeatureError::MissingField(field))
}

fn invalid(field: &'static str, expected: &str, value: &Value) -> FeatureError {
    FeatureError::InvalidField {
        field,
        reason: format!("expected {}, got {}", expected, value),
    }
}

fn parse_vector(value: &Value) -> Result<Vec<f64>, FeatureError> {
    let items = value
        .as_array()
        .ok_or_else(|| invalid("features", "an array of numbers", value))?;
    items
        .iter()
        .map(|v| v.as_f64().ok_or_else(|| invalid("features", "a number", v)))
        .collect()
}

fn coerce_float(field: &'static str, value: &Value) -> Result<f64, FeatureError> {
    match value {
        Value::Number(n) => n.as_f64().ok_or_else(|| invalid(field, "a number", value)),
        Value::String(s) => s
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|f| f.is_finite())
            .ok_or_else(|| invalid(field, "a finite number", value)),
        Value::Bool(b) => Ok(if *b { 1.0 } else { 0.0 }),
        _ => Err(invalid(field, "a number", value)),
    }
}

fn coerce_int(field: &'static str, value: &Value) -> Result<i64, FeatureError> {
    match value {
        Value::Number(n) => match (n.as_i64(), n.as_f64()) {
            (Some(i), _) => Ok(i),
            // Floats truncate toward zero
            (None, Some(f)) if f.is_finite() && f.abs() < i64::MAX as f64 => Ok(f.trunc() as i64),
            _ => Err(invalid(field, "an integer", value)),
        },
        Value::String(s) => s.trim().parse().map_err(|_| invalid(field, "an integer", value)),
        Value::Bool(b) => Ok(i64::from(*b)),
        _ => Err(invalid(field, "an integer", value)),
    }
}

fn coerce_label(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
