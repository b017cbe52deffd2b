//! # Densitycast
//!
//! `densitycast_workspace` ties together the crates of the microbusiness
//! density forecasting project:
//!
//! - [`density_core`]: geography lookup tables and calendar segregation
//! - [`density_forecast`]: the sliding-window forecasting pipeline,
//!   model training, and the `train` / `predict` binaries
//!
//! ## Example
//!
//! ```
//! use density_forecast::window::{extract_window, WINDOW_LEN};
//!
//! let history: Vec<f64> = (0..40).map(f64::from).collect();
//! let window = extract_window(Some(&history));
//! assert_eq!(window.values().len(), WINDOW_LEN);
//! ```

pub use density_core;
pub use density_forecast;
