//! Fixed-length model input windows
//!
//! The sequence model takes exactly [`WINDOW_LEN`] observations. Windows are
//! cut from the tail of a region's history; regions with short or missing
//! history get zero-filled slots at the front. That substitution keeps every
//! request structurally servable, but a forecast made from a padded window
//! rests on invented zeros, so each window carries a [`Coverage`] outcome
//! letting callers tell a real forecast from a degenerate one.

use crate::history::HistoryIndex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Number of observations the sequence model consumes per prediction
pub const WINDOW_LEN: usize = 38;

/// Value substituted for observations that do not exist
pub const FILL_VALUE: f64 = 0.0;

/// How much of a window is backed by real observations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Coverage {
    /// Every slot holds a real observation
    Complete,
    /// The last `observed` slots hold real observations, the rest are filler
    Partial { observed: usize },
    /// The region is unknown; the window is entirely filler
    Missing,
}

impl Coverage {
    /// Whether any slot of the window is filler rather than observation.
    pub fn is_degraded(&self) -> bool {
        !matches!(self, Coverage::Complete)
    }
}

/// A fixed-length model input slice with its provenance
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryWindow {
    values: Vec<f64>,
    coverage: Coverage,
}

impl HistoryWindow {
    /// The window values, oldest first. Always exactly [`WINDOW_LEN`] long.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// How much of the window is real observation
    pub fn coverage(&self) -> Coverage {
        self.coverage
    }
}

/// Extract the model input window from a region's history.
///
/// Takes the last [`WINDOW_LEN`] observations; shorter histories are
/// front-padded with [`FILL_VALUE`], and an absent history yields an
/// all-filler window. Never fails: unknown regions are a tolerated,
/// flagged degradation, not an error.
pub fn extract_window(history: Option<&[f64]>) -> HistoryWindow {
    match history {
        Some(series) if series.len() >= WINDOW_LEN => HistoryWindow {
            values: series[series.len() - WINDOW_LEN..].to_vec(),
            coverage: Coverage::Complete,
        },
        Some(series) => {
            let mut values = vec![FILL_VALUE; WINDOW_LEN - series.len()];
            values.extend_from_slice(series);
            HistoryWindow {
                values,
                coverage: Coverage::Partial {
                    observed: series.len(),
                },
            }
        }
        None => HistoryWindow {
            values: vec![FILL_VALUE; WINDOW_LEN],
            coverage: Coverage::Missing,
        },
    }
}

/// Per-run working copies of region histories for chained forecasting.
///
/// Each prediction run that chains forecasts owns one of these; it starts
/// as a copy of the static index and accumulates newly predicted values,
/// so no state leaks between runs. Appending to a region the index never
/// saw starts that region's working history from the appended value.
#[derive(Debug, Clone)]
pub struct WorkingHistories {
    map: BTreeMap<String, Vec<f64>>,
}

impl WorkingHistories {
    /// Start a working copy from the static history index.
    pub fn from_index(index: &HistoryIndex) -> Self {
        Self {
            map: index.to_map(),
        }
    }

    /// Extract the current window for a region, including any forecasts
    /// appended earlier in this run.
    pub fn window(&self, cfips: &str) -> HistoryWindow {
        extract_window(self.map.get(cfips).map(Vec::as_slice))
    }

    /// Append a forecast to a region's working history.
    pub fn append(&mut self, cfips: &str, value: f64) {
        self.map.entry(cfips.to_string()).or_default().push(value);
    }

    /// Current working history of a region, oldest first.
    pub fn history(&self, cfips: &str) -> Option<&[f64]> {
        self.map.get(cfips).map(Vec::as_slice)
    }
}
