//! Fraud Scoring API - Main Entry Point

use api::{init_logging, install_metrics_exporter, run_server, ApiConfig};
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = ApiConfig::load()?;
    init_logging(&config.logging)?;

    info!("=== Fraud Detection API v{} ===", env!("CARGO_PKG_VERSION"));

    if let Some(listen) = &config.metrics.listen {
        install_metrics_exporter(listen)?;
    }

    run_server(config).await?;

    Ok(())
}
