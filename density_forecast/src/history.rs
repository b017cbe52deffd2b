//! Per-region observation history
//!
//! The history index groups the reference dataset by region identifier,
//! keeping each region's observations in the order they appear. The
//! reference dataset is assumed time-ascending per region; no sort is
//! performed. The index is rebuilt fresh from the reference dataset on
//! each run and never mutated afterwards.

use crate::data::ReferenceData;
use crate::error::Result;
use std::collections::BTreeMap;

/// Mapping from region identifier to its ordered observation history
#[derive(Debug, Clone, Default)]
pub struct HistoryIndex {
    map: BTreeMap<String, Vec<f64>>,
}

impl HistoryIndex {
    /// Build the index from the reference dataset. An empty dataset yields
    /// an empty index.
    pub fn from_reference(data: &ReferenceData) -> Result<Self> {
        let mut map: BTreeMap<String, Vec<f64>> = BTreeMap::new();
        for (cfips, value) in data.observations()? {
            map.entry(cfips).or_default().push(value);
        }

        Ok(Self { map })
    }

    /// Build an index directly from per-region series (for testing and
    /// callers that already hold grouped data).
    pub fn from_series<I>(series: I) -> Self
    where
        I: IntoIterator<Item = (String, Vec<f64>)>,
    {
        Self {
            map: series.into_iter().collect(),
        }
    }

    /// The full observation history of a region, oldest first.
    pub fn history(&self, cfips: &str) -> Option<&[f64]> {
        self.map.get(cfips).map(Vec::as_slice)
    }

    /// Iterate over (region, history) pairs in identifier order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[f64])> {
        self.map.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// Number of indexed regions
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Check if the index holds no regions
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Clone the underlying per-region series.
    pub(crate) fn to_map(&self) -> BTreeMap<String, Vec<f64>> {
        self.map.clone()
    }
}
