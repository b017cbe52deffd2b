//! Sequence model contract and the serialized artifact
//!
//! The pipeline treats the predictor as a black box: a batch of
//! fixed-length windows goes in, one scalar per window comes out. Any
//! failure is fatal to the run; there are no retries and no partial
//! results. [`LinearLagModel`] is the concrete model shipped with the
//! repository, stored as a JSON artifact and loaded once at process start.

use crate::error::{ForecastError, Result};
use crate::window::{HistoryWindow, WINDOW_LEN};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

/// A trained model mapping fixed-length sequences to scalar forecasts
pub trait SequencePredictor {
    /// Predict one scalar per window. The whole batch fails if any window
    /// is rejected.
    fn predict_batch(&self, windows: &[HistoryWindow]) -> Result<Vec<f64>>;

    /// Name of the model
    fn name(&self) -> &str;
}

/// Linear model over the lagged observation window
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinearLagModel {
    /// One weight per window slot, oldest observation first
    weights: Vec<f64>,
    /// Additive bias term
    bias: f64,
}

impl LinearLagModel {
    /// Create a model from explicit parameters.
    pub fn new(weights: Vec<f64>, bias: f64) -> Result<Self> {
        if weights.len() != WINDOW_LEN {
            return Err(ForecastError::InvalidParameter(format!(
                "Expected {} weights, got {}",
                WINDOW_LEN,
                weights.len()
            )));
        }

        Ok(Self { weights, bias })
    }

    /// Load a serialized model artifact.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path.as_ref()).map_err(|e| {
            ForecastError::ModelError(format!(
                "Cannot open model artifact {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;
        let model: Self = serde_json::from_reader(file)?;

        if model.weights.len() != WINDOW_LEN {
            return Err(ForecastError::ModelError(format!(
                "Artifact carries {} weights, expected {}",
                model.weights.len(),
                WINDOW_LEN
            )));
        }

        Ok(model)
    }

    /// Serialize the model to a JSON artifact, creating parent directories
    /// as needed.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        if let Some(parent) = path.as_ref().parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let file = File::create(path)?;
        serde_json::to_writer_pretty(BufWriter::new(file), self)?;
        Ok(())
    }

    /// The model weights, oldest window slot first
    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    /// The bias term
    pub fn bias(&self) -> f64 {
        self.bias
    }

    fn forward(&self, values: &[f64]) -> f64 {
        self.weights
            .iter()
            .zip(values)
            .map(|(w, x)| w * x)
            .sum::<f64>()
            + self.bias
    }
}

impl SequencePredictor for LinearLagModel {
    fn predict_batch(&self, windows: &[HistoryWindow]) -> Result<Vec<f64>> {
        let mut forecasts = Vec::with_capacity(windows.len());
        for window in windows {
            let values = window.values();
            if values.len() != WINDOW_LEN {
                return Err(ForecastError::ModelError(format!(
                    "Window has {} values, model expects {}",
                    values.len(),
                    WINDOW_LEN
                )));
            }
            forecasts.push(self.forward(values));
        }

        Ok(forecasts)
    }

    fn name(&self) -> &str {
        "Linear lag model"
    }
}

/// A model that always forecasts the last window value. Useful as a
/// baseline and in tests where forecasts must be predictable.
pub fn last_value_model() -> LinearLagModel {
    let mut weights = vec![0.0; WINDOW_LEN];
    weights[WINDOW_LEN - 1] = 1.0;
    LinearLagModel { weights, bias: 0.0 }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::window::extract_window;

    #[test]
    fn test_new_validates_weight_count() {
        assert!(LinearLagModel::new(vec![0.0; 5], 0.0).is_err());
        assert!(LinearLagModel::new(vec![0.0; WINDOW_LEN], 0.0).is_ok());
    }

    #[test]
    fn test_last_value_model_echoes_tail() {
        let history: Vec<f64> = (1..=40).map(f64::from).collect();
        let window = extract_window(Some(&history));
        let model = last_value_model();

        let forecasts = model.predict_batch(&[window]).unwrap();
        assert_eq!(forecasts, vec![40.0]);
    }

    #[test]
    fn test_bias_only_model() {
        let model = LinearLagModel::new(vec![0.0; WINDOW_LEN], 2.5).unwrap();
        let window = extract_window(None);
        let forecasts = model.predict_batch(&[window]).unwrap();
        assert_eq!(forecasts, vec![2.5]);
    }
}
