//! Fraud Model Trainer - Main Entry Point

use anyhow::Result;
use clap::Parser;
use fraud_model::ForestParams;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;
use trainer::{train, TrainingConfig};

#[derive(Parser, Debug)]
#[command(name = "fraud-trainer", version, about = "Train the fraud detection model")]
struct Args {
    /// Labelled transactions CSV
    #[arg(long, default_value = "sample_transactions.csv")]
    dataset: PathBuf,

    /// Directory receiving the model, encoders and metadata
    #[arg(long, default_value = ".")]
    output_dir: PathBuf,

    #[arg(long, default_value_t = 100)]
    n_estimators: usize,

    #[arg(long, default_value_t = 15)]
    max_depth: usize,

    #[arg(long, default_value_t = 5)]
    min_samples_split: usize,

    #[arg(long, default_value_t = 2)]
    min_samples_leaf: usize,

    /// Fraction of rows held out for evaluation
    #[arg(long, default_value_t = 0.2)]
    test_size: f64,

    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Log filter, overridden by RUST_LOG
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    info!("=== Fraud Model Training ===");

    let config = TrainingConfig {
        dataset: args.dataset,
        output_dir: args.output_dir,
        test_size: args.test_size,
        forest: ForestParams {
            n_estimators: args.n_estimators,
            max_depth: args.max_depth,
            min_samples_split: args.min_samples_split,
            min_samples_leaf: args.min_samples_leaf,
            seed: args.seed,
            ..ForestParams::default()
        },
    };

    let summary = train(&config)?;

    info!(
        "Model trained and exported: test accuracy {:.2}%, artifacts in {}",
        summary.report.accuracy * 100.0,
        config.output_dir.display()
    );
    info!("Next step: start the API with `fraud-api`");

    Ok(())
}
