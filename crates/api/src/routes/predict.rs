//! Prediction Routes
//!
//! Bodies are taken as raw bytes and parsed here so that a missing or wrong
//! `Content-Type` still gets a JSON error body instead of an extractor
//! rejection.

use axum::{body::Bytes, extract::State, Json};
use inference_engine::{BatchReport, PredictionResponse};
use serde_json::Value;
use std::sync::Arc;

use crate::{ApiError, ApiResult, AppState};

fn parse_body(body: &Bytes) -> ApiResult<Value> {
    Ok(serde_json::from_slice(body)?)
}

/// Score a single transaction
pub async fn predict(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> ApiResult<Json<PredictionResponse>> {
    let predictor = state.model.predictor()?;
    let payload = parse_body(&body)?;

    Ok(Json(predictor.predict(&payload)?))
}

/// Score every transaction in `{"transactions": [...]}`
pub async fn predict_batch(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> ApiResult<Json<BatchReport>> {
    let predictor = state.model.predictor()?;
    let payload = parse_body(&body)?;

    let object = payload
        .as_object()
        .ok_or_else(|| ApiError::Malformed("Request body must be a JSON object".to_string()))?;

    let transactions = match object.get("transactions") {
        None | Some(Value::Null) => return Err(ApiError::EmptyBatch),
        Some(Value::Array(items)) => items,
        Some(_) => {
            return Err(ApiError::Malformed(
                "'transactions' must be an array".to_string(),
            ))
        }
    };

    Ok(Json(predictor.predict_batch(transactions)?))
}
