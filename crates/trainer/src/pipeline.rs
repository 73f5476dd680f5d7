//! Training Pipeline
//!
//! CSV -> encoders -> stratified split -> random forest -> evaluation ->
//! artifacts on disk -> canonical smoke check.

use anyhow::{Context, Result};
use feature_engine::{
    FeatureAssembler, RawTransaction, TransactionInput, UnknownLabelPolicy, FEATURE_NAMES,
};
use fraud_model::{
    accuracy, roc_auc, ArtifactBundle, ArtifactPaths, Classifier, ClassificationReport, Dataset,
    FeatureImportance, ForestParams, LabelEncoder, ModelMetadata, RandomForest,
};
use inference_engine::{timestamp, CaseOutcome, Predictor, SelfTestCase, SelfTestReport};
use std::path::PathBuf;
use tracing::{info, warn};

use crate::dataset::{load_records, stratified_split, ClassDistribution, TransactionRecord};

/// Inputs of one training run
#[derive(Debug, Clone)]
pub struct TrainingConfig {
    pub dataset: PathBuf,
    pub output_dir: PathBuf,
    pub test_size: f64,
    pub forest: ForestParams,
}

/// What a run produced
#[derive(Debug, Clone)]
pub struct TrainingSummary {
    pub metadata: ModelMetadata,
    pub report: ClassificationReport,
    pub paths: ArtifactPaths,
    pub smoke_check: SelfTestReport,
}

/// Run the full pipeline and write the artifacts to `config.output_dir`
pub fn train(config: &TrainingConfig) -> Result<TrainingSummary> {
    info!("Loading dataset {}", config.dataset.display());
    let records = load_records(&config.dataset)?;

    let distribution = ClassDistribution::of(records.iter().map(|r| r.is_fraud));
    info!(
        "Class distribution: normal={}, fraud={}",
        distribution.normal, distribution.fraud
    );
    info!("Fraud rate: {:.2}%", distribution.fraud_rate() * 100.0);
    if distribution.fraud == 0 || distribution.normal == 0 {
        warn!("Dataset contains a single class; AUC-ROC will be unavailable");
    }

    info!("Encoding categorical features...");
    let category_encoder = LabelEncoder::fit(records.iter().map(|r| r.merchant_category.as_str()));
    let location_encoder = LabelEncoder::fit(records.iter().map(|r| r.location.as_str()));
    info!("{} categories encoded", category_encoder.len());
    info!("{} locations encoded", location_encoder.len());

    let dataset = encode(&records, &category_encoder, &location_encoder)?;

    let (train_idx, test_idx) = stratified_split(dataset.labels(), config.test_size, config.forest.seed)?;
    let train_set = dataset.subset(&train_idx)?;
    let test_set = dataset.subset(&test_idx)?;
    info!("Train: {} transactions", train_set.len());
    info!("Test: {} transactions", test_set.len());

    info!("Training random forest...");
    let forest = RandomForest::fit(&train_set, &config.forest)?;
    info!("Model trained");

    info!("Evaluating...");
    let (test_pred, test_scores) = predict_all(&forest, &test_set)?;
    let report = ClassificationReport::new(test_set.labels(), &test_pred);
    let test_accuracy = report.accuracy;
    info!("Accuracy: {:.2}%", test_accuracy * 100.0);
    info!("Classification report:\n{}", report);
    info!("Confusion matrix:\n{}", report.confusion);

    let auc_roc = roc_auc(test_set.labels(), &test_scores);
    match auc_roc {
        Some(auc) => info!("AUC-ROC: {:.4}", auc),
        None => warn!("AUC-ROC undefined: test set holds a single class"),
    }

    let (train_pred, _) = predict_all(&forest, &train_set)?;
    let train_accuracy = accuracy(train_set.labels(), &train_pred);

    let feature_importance = ranked_importances(forest.feature_importances());
    info!("Feature importance:");
    for entry in &feature_importance {
        info!("   {:<30} : {:.4}", entry.feature, entry.importance);
    }

    let metadata = ModelMetadata {
        model_type: "RandomForestClassifier".to_string(),
        n_estimators: Some(config.forest.n_estimators),
        max_depth: Some(config.forest.max_depth),
        train_samples: Some(train_set.len()),
        test_samples: Some(test_set.len()),
        fraud_samples: Some(distribution.fraud),
        normal_samples: Some(distribution.normal),
        features: FEATURE_NAMES.iter().map(|f| f.to_string()).collect(),
        train_accuracy: Some(train_accuracy),
        test_accuracy: Some(test_accuracy),
        accuracy: None,
        auc_roc,
        feature_importance,
        created_at: timestamp(),
        categories: category_encoder.classes().to_vec(),
        locations: location_encoder.classes().to_vec(),
        dataset_file: Some(config.dataset.display().to_string()),
        dataset_size: Some(records.len()),
        fraud_rate: Some(distribution.fraud_rate()),
    };

    let bundle = ArtifactBundle {
        classifier: forest,
        category_encoder,
        location_encoder,
        metadata: metadata.clone(),
    };

    info!("Exporting artifacts to {}", config.output_dir.display());
    let paths = ArtifactPaths::in_dir(&config.output_dir);
    bundle
        .save(&paths)
        .with_context(|| format!("Failed to export artifacts to {}", config.output_dir.display()))?;
    info!("Model: {}", paths.model.display());
    info!("Category encoder: {}", paths.category_encoder.display());
    info!("Location encoder: {}", paths.location_encoder.display());
    info!("Metadata: {}", paths.metadata.display());

    // Serving-side path, so unseen canonical labels fall back exactly as they would online
    let predictor = Predictor::from_bundle(bundle, UnknownLabelPolicy::Fallback);
    let smoke_check = predictor.self_test();
    log_case("Normal transaction", &smoke_check.test_cases.normal_transaction);
    log_case("Suspicious transaction", &smoke_check.test_cases.fraud_transaction);

    Ok(TrainingSummary {
        metadata,
        report,
        paths,
        smoke_check,
    })
}

/// Encode records with the same assembly the scoring service uses
fn encode(
    records: &[TransactionRecord],
    category_encoder: &LabelEncoder,
    location_encoder: &LabelEncoder,
) -> Result<Dataset> {
    let assembler = FeatureAssembler::new(
        category_encoder.clone(),
        location_encoder.clone(),
        UnknownLabelPolicy::Reject,
    );

    let rows = records
        .iter()
        .map(|r| {
            let input = TransactionInput::Raw(RawTransaction {
                amount: r.amount,
                merchant_category: r.merchant_category.clone(),
                location: r.location.clone(),
                hour_of_day: r.hour_of_day,
                day_of_week: r.day_of_week,
            });
            assembler.assemble(&input).map(|v| v.values)
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Dataset::new(rows, records.iter().map(|r| r.is_fraud).collect())?)
}

fn predict_all(forest: &RandomForest, data: &Dataset) -> Result<(Vec<bool>, Vec<f64>)> {
    let mut predictions = Vec::with_capacity(data.len());
    let mut scores = Vec::with_capacity(data.len());
    for row in data.rows() {
        predictions.push(forest.predict(row)?);
        scores.push(forest.predict_proba(row)?);
    }
    Ok((predictions, scores))
}

/// Pair importances with feature names, most important first
fn ranked_importances(importances: &[f64]) -> Vec<FeatureImportance> {
    let mut ranked: Vec<FeatureImportance> = FEATURE_NAMES
        .iter()
        .zip(importances)
        .map(|(name, &importance)| FeatureImportance {
            feature: name.to_string(),
            importance,
        })
        .collect();
    ranked.sort_by(|a, b| b.importance.total_cmp(&a.importance));
    ranked
}

fn log_case(label: &str, case: &SelfTestCase) {
    match &case.output {
        CaseOutcome::Prediction(p) => info!(
            "{}: prediction={}, score={:.4}, risk={}",
            label,
            if p.is_fraud { "FRAUD" } else { "NORMAL" },
            p.fraud_score,
            p.risk_level.as_str()
        ),
        CaseOutcome::Error { error } => warn!("{}: scoring failed: {}", label, error),
    }
}
