//! Training Data Loading

use anyhow::{bail, Context, Result};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::{de, Deserialize, Deserializer};
use std::path::Path;
use tracing::info;

/// One labelled row of the training CSV. Extra columns are ignored.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TransactionRecord {
    pub amount: f64,
    pub merchant_category: String,
    pub location: String,
    pub hour_of_day: i64,
    pub day_of_week: i64,
    #[serde(deserialize_with = "deserialize_label")]
    pub is_fraud: bool,
}

fn deserialize_label<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "1.0" | "true" => Ok(true),
        "0" | "0.0" | "false" => Ok(false),
        other => Err(de::Error::custom(format!(
            "invalid is_fraud value '{}', expected 0/1/true/false",
            other
        ))),
    }
}

/// Read every record of a CSV file
pub fn load_records(path: &Path) -> Result<Vec<TransactionRecord>> {
    if !path.exists() {
        bail!("Dataset file {} does not exist", path.display());
    }

    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("Failed to open dataset {}", path.display()))?;

    let headers = reader.headers()?.clone();
    info!(
        "Columns: {}",
        headers.iter().collect::<Vec<_>>().join(", ")
    );

    let records = reader
        .deserialize()
        .enumerate()
        .map(|(i, row)| row.with_context(|| format!("Invalid record at line {}", i + 2)))
        .collect::<Result<Vec<TransactionRecord>>>()?;

    if records.is_empty() {
        bail!("Dataset {} contains no records", path.display());
    }

    info!("Loaded {} transactions from {}", records.len(), path.display());
    Ok(records)
}

/// Class balance of a labelled set
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClassDistribution {
    pub normal: usize,
    pub fraud: usize,
}

impl ClassDistribution {
    pub fn of(labels: impl IntoIterator<Item = bool>) -> Self {
        let mut dist = Self { normal: 0, fraud: 0 };
        for fraud in labels {
            if fraud {
                dist.fraud += 1;
            } else {
                dist.normal += 1;
            }
        }
        dist
    }

    pub fn total(&self) -> usize {
        self.normal + self.fraud
    }

    /// Fraction of fraudulent rows, 0 for an empty set
    pub fn fraud_rate(&self) -> f64 {
        if self.total() == 0 {
            0.0
        } else {
            self.fraud as f64 / self.total() as f64
        }
    }
}

/// Split row indices into `(train, test)` keeping the class ratio.
///
/// Each class is shuffled with its own seeded draw and contributes
/// `round(count * test_size)` rows to the test side. A class with at least
/// two rows always lands in both partitions.
pub fn stratified_split(
    labels: &[bool],
    test_size: f64,
    seed: u64,
) -> Result<(Vec<usize>, Vec<usize>)> {
    if !(test_size > 0.0 && test_size < 1.0) {
        bail!("test_size must be between 0 and 1, got {}", test_size);
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let mut train = Vec::with_capacity(labels.len());
    let mut test = Vec::new();

    for class in [false, true] {
        let mut members: Vec<usize> = (0..labels.len()).filter(|&i| labels[i] == class).collect();
        if members.is_empty() {
            continue;
        }
        members.shuffle(&mut rng);

        let n_test = if members.len() < 2 {
            0
        } else {
            ((members.len() as f64 * test_size).round() as usize).clamp(1, members.len() - 1)
        };

        test.extend_from_slice(&members[..n_test]);
        train.extend_from_slice(&members[n_test..]);
    }

    train.shuffle(&mut rng);
    test.shuffle(&mut rng);
    Ok((train, test))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_csv(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_records_flexible_labels() {
        let file = write_csv(
            "transaction_id,amount,merchant_category,location,hour_of_day,day_of_week,is_fraud\n\
             T1,150.0,Groceries,\"Paris, France\",14,3,0\n\
             T2,3500.0,Cryptocurrency,\"Dubai, UAE\",2,1,1\n\
             T3,20.5,Groceries,\"Paris, France\",9,5,False\n\
             T4,999.0,Electronics,\"Lagos, Nigeria\",23,6,TRUE\n",
        );

        let records = load_records(file.path()).unwrap();
        assert_eq!(records.len(), 4);
        assert_eq!(records[0].location, "Paris, France");
        assert_eq!(
            records.iter().map(|r| r.is_fraud).collect::<Vec<_>>(),
            vec![false, true, false, true]
        );
    }

    #[test]
    fn test_load_records_rejects_bad_label() {
        let file = write_csv(
            "amount,merchant_category,location,hour_of_day,day_of_week,is_fraud\n\
             10.0,Groceries,Paris,10,1,maybe\n",
        );
        let err = load_records(file.path()).unwrap_err();
        assert!(format!("{:#}", err).contains("maybe"));
    }

    #[test]
    fn test_load_records_missing_file() {
        let err = load_records(Path::new("does/not/exist.csv")).unwrap_err();
        assert!(err.to_string().contains("does not exist"));
    }

    #[test]
    fn test_distribution() {
        let dist = ClassDistribution::of([false, false, false, true]);
        assert_eq!(dist, ClassDistribution { normal: 3, fraud: 1 });
        assert!((dist.fraud_rate() - 0.25).abs() < 1e-12);
    }

    #[test]
    fn test_stratified_split_keeps_both_classes() {
        let mut labels = vec![false; 95];
        labels.extend(vec![true; 5]);

        let (train, test) = stratified_split(&labels, 0.2, 42).unwrap();
        assert_eq!(train.len() + test.len(), 100);
        assert_eq!(test.len(), 20);

        let test_fraud = test.iter().filter(|&&i| labels[i]).count();
        let train_fraud = train.iter().filter(|&&i| labels[i]).count();
        assert_eq!(test_fraud, 1);
        assert_eq!(train_fraud, 4);

        let mut all: Vec<usize> = train.iter().chain(&test).copied().collect();
        all.sort_unstable();
        assert_eq!(all, (0..100).collect::<Vec<_>>());
    }

    #[test]
    fn test_stratified_split_is_seeded() {
        let labels: Vec<bool> = (0..50).map(|i| i % 3 == 0).collect();
        assert_eq!(
            stratified_split(&labels, 0.3, 7).unwrap(),
            stratified_split(&labels, 0.3, 7).unwrap()
        );
    }

    #[test]
    fn test_stratified_split_rejects_bad_ratio() {
        assert!(stratified_split(&[true, false], 1.0, 0).is_err());
        assert!(stratified_split(&[true, false], 0.0, 0).is_err());
    }
}
