//! Prediction step, invoked by the dashboard as a subprocess.
//!
//! Usage: `predict [request.csv] [--chained]`
//!
//! The request path falls back to the configured default when omitted. A
//! failure exits nonzero with the error on stderr and leaves any previous
//! submission file untouched; the caller surfaces the error to the user.

use density_forecast::config::PipelineConfig;
use density_forecast::error::Result;
use density_forecast::pipeline::{run_prediction, ForecastVariant};
use std::env;
use std::path::PathBuf;

fn main() {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    if let Err(err) = run() {
        eprintln!("Prediction failed: {}", err);
        std::process::exit(1);
    }

    println!("Predictions saved successfully!");
}

fn run() -> Result<()> {
    let mut request_path: Option<PathBuf> = None;
    let mut variant = ForecastVariant::Batch;

    for arg in env::args().skip(1) {
        if arg == "--chained" {
            variant = ForecastVariant::Chained;
        } else {
            request_path = Some(PathBuf::from(arg));
        }
    }

    let config = PipelineConfig::default();
    run_prediction(&config, request_path.as_deref(), variant)?;

    Ok(())
}
