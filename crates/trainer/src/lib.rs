//! Fraud Model Trainer
//!
//! Fits the random forest and label encoders from a labelled CSV and writes
//! the artifacts loaded by the scoring API.

pub mod dataset;
pub mod pipeline;

pub use dataset::{load_records, stratified_split, ClassDistribution, TransactionRecord};
pub use pipeline::{train, TrainingConfig, TrainingSummary};
