//! Pipeline configuration
//!
//! File locations used by the training and prediction steps. Defaults match
//! the layout the dashboard expects; a JSON file can override any field.

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::path::{Path, PathBuf};

/// File locations for the forecasting pipeline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Reference dataset with full per-region observation history
    #[serde(default = "default_reference_path")]
    pub reference_path: PathBuf,

    /// Serialized model artifact, loaded once at process start
    #[serde(default = "default_model_path")]
    pub model_path: PathBuf,

    /// Result table written after a successful prediction run
    #[serde(default = "default_submission_path")]
    pub submission_path: PathBuf,

    /// Request table used when the caller does not supply one
    #[serde(default = "default_request_path")]
    pub default_request_path: PathBuf,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            reference_path: default_reference_path(),
            model_path: default_model_path(),
            submission_path: default_submission_path(),
            default_request_path: default_request_path(),
        }
    }
}

impl PipelineConfig {
    /// Load a configuration from a JSON file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        let config = serde_json::from_reader(file)?;
        Ok(config)
    }
}

fn default_reference_path() -> PathBuf {
    PathBuf::from("data/train.csv")
}

fn default_model_path() -> PathBuf {
    PathBuf::from("saved_model/density_model.json")
}

fn default_submission_path() -> PathBuf {
    PathBuf::from("data/submission.csv")
}

fn default_request_path() -> PathBuf {
    PathBuf::from("data/dummy_test_reduced.csv")
}
