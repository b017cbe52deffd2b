//! # Density Core
//!
//! Shared primitives for the microbusiness density forecasting project:
//! geography name-to-identifier lookups and calendar segregation of
//! observation dates.

use thiserror::Error;

pub mod calendar;
pub mod geography;

pub use calendar::{CalendarParts, Granularity};
pub use geography::GeoCatalog;

/// Errors that can occur in geography or calendar operations
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Catalog error: {0}")]
    CatalogError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),
}

/// Result type for density core operations
pub type Result<T> = std::result::Result<T, CoreError>;
