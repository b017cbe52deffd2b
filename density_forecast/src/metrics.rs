//! Metrics for evaluating forecast performance

use crate::error::{ForecastError, Result};
use statrs::statistics::Statistics;

/// Forecast accuracy metrics
#[derive(Debug, Clone)]
pub struct ForecastAccuracy {
    /// Mean Absolute Error
    pub mae: f64,
    /// Mean Squared Error
    pub mse: f64,
    /// Root Mean Squared Error
    pub rmse: f64,
    /// Mean of the residuals (forecast minus actual)
    pub residual_mean: f64,
    /// Standard deviation of the residuals
    pub residual_std: f64,
}

/// Calculate accuracy metrics for a forecast vs actual values
pub fn forecast_accuracy(forecast: &[f64], actual: &[f64]) -> Result<ForecastAccuracy> {
    if forecast.len() != actual.len() || forecast.is_empty() {
        return Err(ForecastError::InvalidParameter(
            "Forecast and actual values must have the same non-zero length".to_string(),
        ));
    }

    let residuals: Vec<f64> = forecast
        .iter()
        .zip(actual.iter())
        .map(|(&f, &a)| f - a)
        .collect();

    let n = residuals.len() as f64;
    let mae = residuals.iter().map(|e| e.abs()).sum::<f64>() / n;
    let mse = residuals.iter().map(|e| e.powi(2)).sum::<f64>() / n;
    let rmse = mse.sqrt();

    let residual_mean = (&residuals).mean();
    let residual_std = if residuals.len() > 1 {
        (&residuals).std_dev()
    } else {
        0.0
    };

    Ok(ForecastAccuracy {
        mae,
        mse,
        rmse,
        residual_mean,
        residual_std,
    })
}

impl std::fmt::Display for ForecastAccuracy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Forecast Accuracy Metrics:")?;
        writeln!(f, "  MAE:  {:.4}", self.mae)?;
        writeln!(f, "  MSE:  {:.4}", self.mse)?;
        writeln!(f, "  RMSE: {:.4}", self.rmse)?;
        writeln!(
            f,
            "  Residuals: mean {:.4}, std {:.4}",
            self.residual_mean, self.residual_std
        )?;
        Ok(())
    }
}
