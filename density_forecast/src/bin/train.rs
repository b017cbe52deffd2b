//! Offline training job: fit the linear lag model on the reference dataset
//! and serialize the artifact.
//!
//! Usage: `train [config.json]`

use density_forecast::config::PipelineConfig;
use density_forecast::data::ReferenceData;
use density_forecast::error::Result;
use density_forecast::history::HistoryIndex;
use density_forecast::trainer::{build_training_set, Trainer};
use std::env;
use tracing::info;

fn main() {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    if let Err(err) = run() {
        eprintln!("Training failed: {}", err);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let config = match env::args().nth(1) {
        Some(path) => PipelineConfig::from_file(path)?,
        None => PipelineConfig::default(),
    };

    let reference = ReferenceData::from_csv(&config.reference_path)?;
    let index = HistoryIndex::from_reference(&reference)?;
    info!(
        observations = reference.len(),
        regions = index.len(),
        "Reference dataset loaded"
    );

    let training_set = build_training_set(&index);
    let model = Trainer::default().fit(&training_set)?;

    model.save(&config.model_path)?;
    info!(artifact = %config.model_path.display(), "Model saved successfully");

    Ok(())
}
