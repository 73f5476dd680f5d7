//! Artifact Bundle Persistence
//!
//! The classifier and both encoders are stored as postcard blobs; the
//! metadata record is pretty-printed JSON so it stays human readable.

use crate::encoder::LabelEncoder;
use crate::forest::RandomForest;
use crate::metadata::ModelMetadata;
use crate::ModelError;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

pub const MODEL_FILE: &str = "fraud_detection_model.bin";
pub const CATEGORY_ENCODER_FILE: &str = "label_encoder_category.bin";
pub const LOCATION_ENCODER_FILE: &str = "label_encoder_location.bin";
pub const METADATA_FILE: &str = "model_metadata.json";

/// Locations of the four artifact files
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactPaths {
    pub model: PathBuf,
    pub category_encoder: PathBuf,
    pub location_encoder: PathBuf,
    pub metadata: PathBuf,
}

impl ArtifactPaths {
    /// Default file names inside `dir`
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            model: dir.join(MODEL_FILE),
            category_encoder: dir.join(CATEGORY_ENCODER_FILE),
            location_encoder: dir.join(LOCATION_ENCODER_FILE),
            metadata: dir.join(METADATA_FILE),
        }
    }
}

/// Everything the scoring service needs, loaded together
#[derive(Debug, Clone)]
pub struct ArtifactBundle {
    pub classifier: RandomForest,
    pub category_encoder: LabelEncoder,
    pub location_encoder: LabelEncoder,
    pub metadata: ModelMetadata,
}

impl ArtifactBundle {
    /// Load all artifacts; fails on the first missing or corrupt file
    pub fn load(paths: &ArtifactPaths) -> Result<Self, ModelError> {
        let classifier: RandomForest = read_postcard(&paths.model)?;
        let category_encoder: LabelEncoder = read_postcard(&paths.category_encoder)?;
        let location_encoder: LabelEncoder = read_postcard(&paths.location_encoder)?;

        let raw = read_file(&paths.metadata)?;
        let metadata: ModelMetadata =
            serde_json::from_slice(&raw).map_err(|source| ModelError::Metadata {
                path: paths.metadata.clone(),
                source,
            })?;

        info!(
            "Loaded {} with {} trees ({} categories, {} locations)",
            metadata.model_type,
            classifier.n_estimators(),
            category_encoder.len(),
            location_encoder.len()
        );

        Ok(Self {
            classifier,
            category_encoder,
            location_encoder,
            metadata,
        })
    }

    /// Write all artifacts, creating parent directories as needed
    pub fn save(&self, paths: &ArtifactPaths) -> Result<(), ModelError> {
        write_file(&paths.model, &postcard::to_allocvec(&self.classifier)?)?;
        write_file(
            &paths.category_encoder,
            &postcard::to_allocvec(&self.category_encoder)?,
        )?;
        write_file(
            &paths.location_encoder,
            &postcard::to_allocvec(&self.location_encoder)?,
        )?;

        let json = serde_json::to_vec_pretty(&self.metadata).map_err(|source| {
            ModelError::Metadata {
                path: paths.metadata.clone(),
                source,
            }
        })?;
        write_file(&paths.metadata, &json)?;

        info!("Artifacts written to {}", paths.model.display());
        Ok(())
    }
}

fn read_file(path: &Path) -> Result<Vec<u8>, ModelError> {
    fs::read(path).map_err(|source| ModelError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn write_file(path: &Path, bytes: &[u8]) -> Result<(), ModelError> {
    let io_err = |source| ModelError::Io {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(io_err)?;
    }
    fs::write(path, bytes).map_err(io_err)?;
    debug!("Wrote {} bytes to {}", bytes.len(), path.display());
    Ok(())
}

fn read_postcard<T: DeserializeOwned>(path: &Path) -> Result<T, ModelError> {
    let bytes = read_file(path)?;
    postcard::from_bytes(&bytes).map_err(|source| ModelError::Decode {
        path: path.to_path_buf(),
        source,
    })
}
