//! Offline model training
//!
//! One-shot batch job: build per-region training pairs from the history
//! index, fit the linear lag model on mean absolute error, and serialize
//! the artifact. Runs entirely apart from the prediction path; the two
//! only share the artifact file.

use crate::error::{ForecastError, Result};
use crate::history::HistoryIndex;
use crate::metrics::forecast_accuracy;
use crate::model::{LinearLagModel, SequencePredictor};
use crate::window::{extract_window, WINDOW_LEN};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal};
use tracing::{debug, info};

/// Training pairs built from the history index
#[derive(Debug, Clone)]
pub struct TrainingSet {
    /// Input sequences, each exactly [`WINDOW_LEN`] observations
    pub inputs: Vec<Vec<f64>>,
    /// One target observation per input sequence
    pub targets: Vec<f64>,
    /// Regions skipped for having too little history
    pub skipped_regions: usize,
}

impl TrainingSet {
    /// Number of training pairs
    pub fn len(&self) -> usize {
        self.inputs.len()
    }

    /// Check if no region yielded a training pair
    pub fn is_empty(&self) -> bool {
        self.inputs.is_empty()
    }
}

/// Build training pairs: for each region, the first [`WINDOW_LEN`]
/// observations form the input and observation `WINDOW_LEN + 1` the
/// target. Regions with fewer than `WINDOW_LEN + 1` observations are
/// skipped and counted.
pub fn build_training_set(index: &HistoryIndex) -> TrainingSet {
    let mut inputs = Vec::new();
    let mut targets = Vec::new();
    let mut skipped_regions = 0;

    for (cfips, history) in index.iter() {
        if history.len() < WINDOW_LEN + 1 {
            debug!(
                cfips,
                observations = history.len(),
                "Skipping region with insufficient history"
            );
            skipped_regions += 1;
            continue;
        }

        inputs.push(history[..WINDOW_LEN].to_vec());
        targets.push(history[WINDOW_LEN]);
    }

    TrainingSet {
        inputs,
        targets,
        skipped_regions,
    }
}

/// Gradient-descent trainer for the linear lag model
#[derive(Debug, Clone)]
pub struct Trainer {
    /// Number of full-batch passes over the training set
    epochs: usize,
    /// Initial step size; decays over epochs
    learning_rate: f64,
    /// Seed for weight initialization
    seed: u64,
}

impl Default for Trainer {
    fn default() -> Self {
        Self {
            epochs: 200,
            learning_rate: 0.001,
            seed: 42,
        }
    }
}

impl Trainer {
    /// Create a trainer with explicit hyperparameters.
    pub fn new(epochs: usize, learning_rate: f64, seed: u64) -> Result<Self> {
        if epochs == 0 {
            return Err(ForecastError::InvalidParameter(
                "Epoch count must be positive".to_string(),
            ));
        }
        if learning_rate <= 0.0 {
            return Err(ForecastError::InvalidParameter(
                "Learning rate must be positive".to_string(),
            ));
        }

        Ok(Self {
            epochs,
            learning_rate,
            seed,
        })
    }

    /// Fit the linear lag model on the training set with full-batch
    /// subgradient descent on mean absolute error.
    pub fn fit(&self, set: &TrainingSet) -> Result<LinearLagModel> {
        if set.is_empty() {
            return Err(ForecastError::TrainingError(
                "No region has enough history to form a training pair".to_string(),
            ));
        }
        if set.inputs.len() != set.targets.len() {
            return Err(ForecastError::TrainingError(format!(
                "Input/target count mismatch: {} vs {}",
                set.inputs.len(),
                set.targets.len()
            )));
        }

        let mut rng = StdRng::seed_from_u64(self.seed);
        let init = Normal::new(0.0, 0.01).map_err(|e| {
            ForecastError::TrainingError(format!("Weight initialization failed: {}", e))
        })?;

        let mut weights: Vec<f64> = (0..WINDOW_LEN).map(|_| init.sample(&mut rng)).collect();
        let mut bias = 0.0;
        let n = set.inputs.len() as f64;

        for epoch in 0..self.epochs {
            // Step size decays so the subgradient updates settle down
            let step = self.learning_rate / (1.0 + epoch as f64 * 0.02);

            let mut weight_grad = vec![0.0; WINDOW_LEN];
            let mut bias_grad = 0.0;
            let mut epoch_loss = 0.0;

            for (input, &target) in set.inputs.iter().zip(&set.targets) {
                let prediction = weights
                    .iter()
                    .zip(input)
                    .map(|(w, x)| w * x)
                    .sum::<f64>()
                    + bias;
                let error = prediction - target;
                epoch_loss += error.abs();

                let sign = if error > 0.0 {
                    1.0
                } else if error < 0.0 {
                    -1.0
                } else {
                    0.0
                };
                for (grad, &x) in weight_grad.iter_mut().zip(input) {
                    *grad += sign * x;
                }
                bias_grad += sign;
            }

            for (weight, grad) in weights.iter_mut().zip(&weight_grad) {
                *weight -= step * grad / n;
            }
            bias -= step * bias_grad / n;

            if (epoch + 1) % 50 == 0 || epoch + 1 == self.epochs {
                debug!(
                    epoch = epoch + 1,
                    mae = epoch_loss / n,
                    "Training progress"
                );
            }
        }

        let model = LinearLagModel::new(weights, bias)?;

        // Report the fit on the training windows themselves
        let train_windows: Vec<_> = set
            .inputs
            .iter()
            .map(|input| extract_window(Some(input)))
            .collect();
        let fitted = model.predict_batch(&train_windows)?;
        let accuracy = forecast_accuracy(&fitted, &set.targets)?;
        info!(
            pairs = set.len(),
            skipped_regions = set.skipped_regions,
            mae = accuracy.mae,
            rmse = accuracy.rmse,
            "Model trained"
        );

        Ok(model)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_training_pairs_are_first_window_and_next() {
        let history: Vec<f64> = (0..45).map(f64::from).collect();
        let index = HistoryIndex::from_series(vec![("06037".to_string(), history.clone())]);

        let set = build_training_set(&index);
        assert_eq!(set.len(), 1);
        assert_eq!(set.inputs[0], history[..WINDOW_LEN].to_vec());
        assert_eq!(set.targets[0], history[WINDOW_LEN]);
        assert_eq!(set.skipped_regions, 0);
    }

    #[test]
    fn test_short_regions_are_skipped() {
        let index = HistoryIndex::from_series(vec![
            ("06037".to_string(), vec![1.0; WINDOW_LEN + 1]),
            ("48201".to_string(), vec![1.0; WINDOW_LEN]),
        ]);

        let set = build_training_set(&index);
        assert_eq!(set.len(), 1);
        assert_eq!(set.skipped_regions, 1);
    }

    #[test]
    fn test_fit_rejects_empty_set() {
        let set = TrainingSet {
            inputs: vec![],
            targets: vec![],
            skipped_regions: 3,
        };
        let trainer = Trainer::default();
        assert!(trainer.fit(&set).is_err());
    }

    #[test]
    fn test_fit_approaches_constant_series() {
        let index = HistoryIndex::from_series(vec![
            ("a".to_string(), vec![2.0; WINDOW_LEN + 1]),
            ("b".to_string(), vec![2.0; WINDOW_LEN + 1]),
        ]);
        let set = build_training_set(&index);
        let model = Trainer::default().fit(&set).unwrap();

        let window = extract_window(Some(&vec![2.0; WINDOW_LEN]));
        let forecast = model.predict_batch(&[window]).unwrap()[0];
        assert!(
            (forecast - 2.0).abs() < 0.5,
            "forecast {} too far from 2.0",
            forecast
        );
    }

    #[test]
    fn test_invalid_hyperparameters() {
        assert!(Trainer::new(0, 0.01, 1).is_err());
        assert!(Trainer::new(10, -0.5, 1).is_err());
        assert!(Trainer::new(10, 0.01, 1).is_ok());
    }
}
