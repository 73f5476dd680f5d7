//! In-memory training set

use crate::ModelError;

/// Dense feature rows with their binary labels (`true` = fraud)
#[derive(Debug, Clone)]
pub struct Dataset {
    rows: Vec<Vec<f64>>,
    labels: Vec<bool>,
    n_features: usize,
}

impl Dataset {
    /// Create a dataset, checking that every row has the same width
    pub fn new(rows: Vec<Vec<f64>>, labels: Vec<bool>) -> Result<Self, ModelError> {
        if rows.len() != labels.len() {
            return Err(ModelError::LabelCountMismatch {
                rows: rows.len(),
                labels: labels.len(),
            });
        }
        let n_features = rows.first().map(Vec::len).ok_or(ModelError::EmptyDataset)?;
        if let Some((row, r)) = rows.iter().enumerate().find(|(_, r)| r.len() != n_features) {
            return Err(ModelError::InconsistentRow {
                row,
                expected: n_features,
                actual: r.len(),
            });
        }

        Ok(Self {
            rows,
            labels,
            n_features,
        })
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn n_features(&self) -> usize {
        self.n_features
    }

    pub fn row(&self, index: usize) -> &[f64] {
        &self.rows[index]
    }

    pub fn label(&self, index: usize) -> bool {
        self.labels[index]
    }

    pub fn labels(&self) -> &[bool] {
        &self.labels
    }

    pub fn rows(&self) -> impl Iterator<Item = &[f64]> {
        self.rows.iter().map(Vec::as_slice)
    }

    /// Sample counts as `[negatives, positives]`
    pub fn class_counts(&self) -> [usize; 2] {
        let positives = self.labels.iter().filter(|&&l| l).count();
        [self.labels.len() - positives, positives]
    }

    /// Weights `n_samples / (n_classes * class_count)`; an absent class gets 0
    pub fn balanced_class_weights(&self) -> [f64; 2] {
        let n = self.len() as f64;
        self.class_counts()
            .map(|count| if count == 0 { 0.0 } else { n / (2.0 * count as f64) })
    }

    /// Copy the given rows into a new dataset
    pub fn subset(&self, indices: &[usize]) -> Result<Self, ModelError> {
        Self::new(
            indices.iter().map(|&i| self.rows[i].clone()).collect(),
            indices.iter().map(|&i| self.labels[i]).collect(),
        )
    }
}
