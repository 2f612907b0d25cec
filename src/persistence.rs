//! Settings serialization and persistence
//!
//! A k-NN classifier has no fitted model, so what gets saved is its
//! configuration. A settings file can be written once and reused by the CLI
//! for later classification runs.

use crate::classifier::{K_DESCRIPTION, K_PARAMETER};
use crate::core::{KnnError, Result};
use crate::metric::{DistanceFunction, Metric};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

/// Configuration of a k-NN classifier
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClassifierSettings {
    /// Number of neighbors
    pub k: usize,
    /// Distance function
    pub metric: Metric,
    /// Fail on neighbor labels outside the known set
    #[serde(default)]
    pub strict_labels: bool,
}

impl ClassifierSettings {
    /// Check every setting for legality
    pub fn validate(&self) -> Result<()> {
        if self.k == 0 {
            return Err(KnnError::WrongParameterValue {
                name: K_PARAMETER.to_string(),
                value: self.k.to_string(),
                description: K_DESCRIPTION.to_string(),
            });
        }
        self.metric.validate()
    }
}

impl Default for ClassifierSettings {
    fn default() -> Self {
        Self {
            k: crate::classifier::K_DEFAULT,
            metric: Metric::default(),
            strict_labels: false,
        }
    }
}

/// Settings file contents
#[derive(Debug, Serialize, Deserialize)]
pub struct SettingsFile {
    pub settings: ClassifierSettings,
    pub metadata: SettingsMetadata,
}

/// Metadata for tracking and validation
#[derive(Debug, Serialize, Deserialize)]
pub struct SettingsMetadata {
    /// Library version used to write the file
    pub library_version: String,
    /// Creation timestamp
    pub created_at: String,
}

impl SettingsFile {
    /// Wrap validated settings with fresh metadata
    pub fn new(settings: ClassifierSettings) -> Result<Self> {
        settings.validate()?;
        Ok(Self {
            settings,
            metadata: SettingsMetadata {
                library_version: env!("CARGO_PKG_VERSION").to_string(),
                created_at: chrono::Utc::now().to_rfc3339(),
            },
        })
    }

    /// Save settings to file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = File::create(path).map_err(KnnError::IoError)?;
        let writer = BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)
            .map_err(|e| KnnError::SerializationError(e.to_string()))?;
        Ok(())
    }

    /// Load settings from file, rejecting illegal values
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path).map_err(KnnError::IoError)?;
        let reader = BufReader::new(file);
        let loaded: Self = serde_json::from_reader(reader)
            .map_err(|e| KnnError::SerializationError(e.to_string()))?;
        loaded.settings.validate()?;
        Ok(loaded)
    }

    /// Print settings summary
    pub fn print_summary(&self) {
        println!("=== kNN Classifier Settings ===");
        println!("k: {}", self.settings.k);
        println!("Metric: {}", self.settings.metric);
        println!("Strict labels: {}", self.settings.strict_labels);
        println!("Library Version: {}", self.metadata.library_version);
        println!("Created: {}", self.metadata.created_at);
    }
}
