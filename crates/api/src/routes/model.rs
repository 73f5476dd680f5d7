//! Model Introspection Routes

use axum::{extract::State, Json};
use inference_engine::{ModelInfo, SelfTestReport};
use std::sync::Arc;

use crate::{ApiResult, AppState};

/// Metadata summary of the loaded model
pub async fn info(State(state): State<Arc<AppState>>) -> ApiResult<Json<ModelInfo>> {
    Ok(Json(state.model.predictor()?.model_info()))
}

/// Score the two canonical transactions
pub async fn self_test(State(state): State<Arc<AppState>>) -> ApiResult<Json<SelfTestReport>> {
    Ok(Json(state.model.predictor()?.self_test()))
}
