//! # Density Forecast
//!
//! A Rust library for forecasting per-region microbusiness density from
//! fixed-length history windows.
//!
//! ## Features
//!
//! - Reference dataset and request table loading from CSV
//! - Per-region history index with last-38-observation window extraction
//! - An opaque sequence-model seam with a linear lag model behind it,
//!   serialized as a JSON artifact
//! - Batch and chained (autoregressive) prediction variants
//! - Result assembly preserving request-row order and identifiers
//!
//! ## Quick Start
//!
//! ```no_run
//! use density_forecast::config::PipelineConfig;
//! use density_forecast::pipeline::{run_prediction, ForecastVariant};
//!
//! # fn main() -> density_forecast::error::Result<()> {
//! let config = PipelineConfig::default();
//! let results = run_prediction(&config, None, ForecastVariant::Batch)?;
//! println!("{} forecasts written", results.len());
//! # Ok(())
//! # }
//! ```
//!
//! Regions absent from the reference dataset still produce forecasts, made
//! from zero-filled windows; check [`window::Coverage`] on each result row
//! to tell those apart from forecasts backed by real history.

pub mod config;
pub mod data;
pub mod error;
pub mod history;
pub mod metrics;
pub mod model;
pub mod pipeline;
pub mod trainer;
pub mod window;

// Re-export commonly used types
pub use crate::config::PipelineConfig;
pub use crate::data::{ReferenceData, RequestRow, RequestTable};
pub use crate::error::ForecastError;
pub use crate::history::HistoryIndex;
pub use crate::model::{LinearLagModel, SequencePredictor};
pub use crate::pipeline::{ForecastVariant, ResultTable};
pub use crate::window::{Coverage, HistoryWindow, WINDOW_LEN};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
