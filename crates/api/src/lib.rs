//! Fraud Scoring API Server
//!
//! REST API serving the trained fraud classifier.

use axum::{
    routing::{get, post},
    Router,
};
use feature_engine::UnknownLabelPolicy;
use fraud_model::{ArtifactBundle, ArtifactPaths};
use inference_engine::Predictor;
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

pub mod config;
pub mod error;
mod routes;

pub use config::{ApiConfig, LogFormat, LoggingConfig};
pub use error::{ApiError, ApiResult};

/// Outcome of the one-time artifact load at startup
pub enum ModelStatus {
    Loaded(Arc<Predictor>),
    Unavailable { reason: String },
}

impl ModelStatus {
    /// Load artifacts; a failure is recorded rather than returned
    pub fn load(paths: &ArtifactPaths, policy: UnknownLabelPolicy) -> Self {
        info!("Loading model and encoders...");
        match ArtifactBundle::load(paths) {
            Ok(bundle) => {
                info!("Model loaded successfully");
                info!("   - Type: {}", bundle.metadata.model_type);
                info!("   - Accuracy: {:.4}", bundle.metadata.headline_accuracy());
                Self::Loaded(Arc::new(Predictor::from_bundle(bundle, policy)))
            }
            Err(e) => {
                error!("Failed to load model: {}", e);
                Self::Unavailable {
                    reason: e.to_string(),
                }
            }
        }
    }

    pub fn is_loaded(&self) -> bool {
        matches!(self, Self::Loaded(_))
    }

    /// Load failure message, if any
    pub fn reason(&self) -> Option<&str> {
        match self {
            Self::Loaded(_) => None,
            Self::Unavailable { reason } => Some(reason),
        }
    }

    /// The predictor, or 503 for inference-dependent routes
    pub fn predictor(&self) -> ApiResult<&Predictor> {
        match self {
            Self::Loaded(predictor) => Ok(predictor.as_ref()),
            Self::Unavailable { .. } => Err(ApiError::ModelNotLoaded),
        }
    }
}

/// Application state shared across handlers
pub struct AppState {
    /// Loaded artifacts, immutable for the process lifetime
    pub model: ModelStatus,
    /// Version string
    pub version: String,
    /// Start time
    pub start_time: std::time::Instant,
}

impl AppState {
    /// Create new application state
    pub fn new(model: ModelStatus) -> Self {
        Self {
            model,
            version: env!("CARGO_PKG_VERSION").to_string(),
            start_time: std::time::Instant::now(),
        }
    }
}

/// Create the application router
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(routes::service::index))
        .route("/health", get(routes::service::health))
        .route("/model/info", get(routes::model::info))
        .route("/predict", post(routes::predict::predict))
        .route("/predict/batch", post(routes::predict::predict_batch))
        .route("/test", get(routes::model::self_test))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

/// Initialize logging
pub fn init_logging(config: &LoggingConfig) -> Result<(), Box<dyn std::error::Error>> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true);

    match config.format {
        LogFormat::Json => builder.json().try_init(),
        LogFormat::Pretty => builder.try_init(),
    }
    .map_err(|e| format!("Failed to set tracing subscriber: {}", e))?;

    Ok(())
}

/// Serve Prometheus metrics on a separate listener
pub fn install_metrics_exporter(listen: &str) -> Result<(), Box<dyn std::error::Error>> {
    let addr: SocketAddr = listen.parse()?;
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    info!("Metrics exporter listening on {}", addr);
    Ok(())
}

/// Run the server
pub async fn run_server(config: ApiConfig) -> Result<(), Box<dyn std::error::Error>> {
    let model = ModelStatus::load(
        &config.artifacts.paths(),
        config.features.unknown_label_policy,
    );
    let state = Arc::new(AppState::new(model));
    let app = create_router(state);

    let addr = config.server.addr();
    info!("Starting fraud detection API on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
