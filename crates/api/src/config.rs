//! Server Configuration
//!
//! Layered: built-in defaults, then an optional TOML file, then
//! `FRAUD_API_*` environment variables (`__` separates nested keys, e.g.
//! `FRAUD_API_SERVER__PORT=8080`).

use config::{Config, ConfigError, Environment, File};
use feature_engine::UnknownLabelPolicy;
use fraud_model::{
    ArtifactPaths, CATEGORY_ENCODER_FILE, LOCATION_ENCODER_FILE, METADATA_FILE, MODEL_FILE,
};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Config file used when `FRAUD_API_CONFIG` is unset
pub const DEFAULT_CONFIG_PATH: &str = "config/fraud-api.toml";

/// Main server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    pub server: ServerConfig,
    pub artifacts: ArtifactsConfig,
    pub features: FeaturesConfig,
    pub logging: LoggingConfig,
    #[serde(default)]
    pub metrics: MetricsConfig,
}

/// Listener address
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Where the trainer wrote the model artifacts
#[derive(Debug, Clone, Deserialize)]
pub struct ArtifactsConfig {
    pub dir: PathBuf,
    pub model_file: String,
    pub category_encoder_file: String,
    pub location_encoder_file: String,
    pub metadata_file: String,
}

impl ArtifactsConfig {
    pub fn paths(&self) -> ArtifactPaths {
        ArtifactPaths {
            model: self.dir.join(&self.model_file),
            category_encoder: self.dir.join(&self.category_encoder_file),
            location_encoder: self.dir.join(&self.location_encoder_file),
            metadata: self.dir.join(&self.metadata_file),
        }
    }
}

/// Feature assembly options
#[derive(Debug, Clone, Deserialize)]
pub struct FeaturesConfig {
    pub unknown_label_policy: UnknownLabelPolicy,
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Default filter directive; `RUST_LOG` takes precedence
    pub level: String,
    pub format: LogFormat,
}

/// Prometheus exporter; disabled unless `listen` is set
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MetricsConfig {
    pub listen: Option<String>,
}

impl ApiConfig {
    /// Load from `FRAUD_API_CONFIG` (or the default path) plus the environment
    pub fn load() -> Result<Self, ConfigError> {
        let path = std::env::var("FRAUD_API_CONFIG")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_PATH));
        Self::load_from(Some(&path))
    }

    /// Load from an optional file plus the environment
    pub fn load_from(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder = Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 5000)?
            .set_default("artifacts.dir", ".")?
            .set_default("artifacts.model_file", MODEL_FILE)?
            .set_default("artifacts.category_encoder_file", CATEGORY_ENCODER_FILE)?
            .set_default("artifacts.location_encoder_file", LOCATION_ENCODER_FILE)?
            .set_default("artifacts.metadata_file", METADATA_FILE)?
            .set_default("features.unknown_label_policy", "fallback")?
            .set_default("logging.level", "info")?
            .set_default("logging.format", "pretty")?;

        if let Some(path) = path {
            builder = builder.add_source(File::from(path).required(false));
        }

        builder
            .add_source(
                Environment::with_prefix("FRAUD_API")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()
    }
}
