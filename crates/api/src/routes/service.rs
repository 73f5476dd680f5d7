//! Service Routes

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;
use std::collections::BTreeMap;
use inference_engine::timestamp;
use std::sync::Arc;

use crate::AppState;

/// Service descriptor
#[derive(Debug, Serialize)]
pub struct ServiceInfo {
    pub service: &'static str,
    pub version: String,
    pub status: &'static str,
    pub uptime_seconds: u64,
    pub endpoints: BTreeMap<&'static str, &'static str>,
}

/// Health response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub model: &'static str,
    /// Why the artifacts failed to load
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    pub timestamp: String,
}

/// Describe the service and its routes
pub async fn index(State(state): State<Arc<AppState>>) -> Json<ServiceInfo> {
    let endpoints = BTreeMap::from([
        ("/", "API information"),
        ("/health", "API health check"),
        ("/predict", "Fraud prediction (POST)"),
        ("/predict/batch", "Batch predictions (POST)"),
        ("/model/info", "Model information"),
        ("/test", "Test with canonical examples"),
    ]);

    Json(ServiceInfo {
        service: "DigitalBank Fraud Detection API",
        version: state.version.clone(),
        status: if state.model.is_loaded() { "running" } else { "error" },
        uptime_seconds: state.start_time.elapsed().as_secs(),
        endpoints,
    })
}

/// Health check handler
pub async fn health(State(state): State<Arc<AppState>>) -> (StatusCode, Json<HealthResponse>) {
    let (code, status, model) = if state.model.is_loaded() {
        (StatusCode::OK, "healthy", "loaded")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "unhealthy", "not loaded")
    };

    (
        code,
        Json(HealthResponse {
            status,
            model,
            reason: state.model.reason().map(str::to_string),
            timestamp: timestamp(),
        }),
    )
}
