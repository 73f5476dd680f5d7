//! Error handling

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use feature_engine::{FeatureError, REQUIRED_FIELDS};
use inference_engine::PredictError;
use serde_json::json;
use thiserror::Error;

pub type ApiResult<T> = Result<T, ApiError>;

/// Request-level failures and their HTTP mapping
#[derive(Debug, Error)]
pub enum ApiError {
    /// Artifacts failed to load at startup
    #[error("Model not loaded")]
    ModelNotLoaded,

    #[error("Missing required field: '{0}'")]
    MissingField(&'static str),

    #[error("{0}")]
    BadRequest(String),

    #[error("No transactions provided")]
    EmptyBatch,

    /// Unparseable body, coercion failure or scoring error
    #[error("{0}")]
    Malformed(String),
}

impl From<PredictError> for ApiError {
    fn from(err: PredictError) -> Self {
        match err {
            PredictError::Feature(FeatureError::MissingField(field)) => ApiError::MissingField(field),
            PredictError::Feature(e @ FeatureError::UnknownLabel { .. }) => {
                ApiError::BadRequest(e.to_string())
            }
            PredictError::EmptyBatch => ApiError::EmptyBatch,
            other => ApiError::Malformed(other.to_string()),
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::Malformed(err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let message = self.to_string();
        let (status, body) = match &self {
            ApiError::ModelNotLoaded => (StatusCode::SERVICE_UNAVAILABLE, json!({ "error": message })),
            ApiError::MissingField(_) => (
                StatusCode::BAD_REQUEST,
                json!({ "error": message, "required_fields": REQUIRED_FIELDS }),
            ),
            ApiError::BadRequest(_) | ApiError::EmptyBatch => {
                (StatusCode::BAD_REQUEST, json!({ "error": message }))
            }
            ApiError::Malformed(_) => {
                tracing::error!("Prediction error: {}", message);
                (StatusCode::INTERNAL_SERVER_ERROR, json!({ "error": message }))
            }
        };

        (status, Json(body)).into_response()
    }
}
