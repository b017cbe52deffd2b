//! Geography name-to-identifier lookups
//!
//! The dashboard filters forecasts by state or county name. Region
//! identifiers (cfips) are five-digit county FIPS codes whose first two
//! digits identify the state, so a state filter reduces to a prefix match.
//! The catalog is plain injected data: callers construct one from pairs or
//! load one from CSV and pass it where it is needed.

use crate::{CoreError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs::File;
use std::path::Path;

/// Name-to-identifier lookup tables for states and counties
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GeoCatalog {
    /// Lowercased state name -> two-digit state FIPS prefix
    states: HashMap<String, String>,
    /// Lowercased county name -> five-digit cfips
    counties: HashMap<String, String>,
}

impl GeoCatalog {
    /// Build a catalog from name/identifier pairs.
    pub fn from_pairs<S, C>(states: S, counties: C) -> Self
    where
        S: IntoIterator<Item = (String, String)>,
        C: IntoIterator<Item = (String, String)>,
    {
        Self {
            states: states
                .into_iter()
                .map(|(name, id)| (name.to_lowercase(), id))
                .collect(),
            counties: counties
                .into_iter()
                .map(|(name, id)| (name.to_lowercase(), id))
                .collect(),
        }
    }

    /// Load a catalog from two CSV files, each with `name,id` columns.
    pub fn from_csv_files<P: AsRef<Path>>(states_path: P, counties_path: P) -> Result<Self> {
        Ok(Self {
            states: read_lookup_csv(states_path)?,
            counties: read_lookup_csv(counties_path)?,
        })
    }

    /// Look up the two-digit state FIPS prefix for a state name.
    /// Names match case-insensitively.
    pub fn state_fips(&self, name: &str) -> Option<&str> {
        self.states.get(&name.to_lowercase()).map(String::as_str)
    }

    /// Look up the five-digit cfips for a county name.
    /// Names match case-insensitively.
    pub fn county_cfips(&self, name: &str) -> Option<&str> {
        self.counties.get(&name.to_lowercase()).map(String::as_str)
    }

    /// Filter region identifiers down to those in the named state.
    pub fn cfips_in_state<'a, I>(&self, state_name: &str, cfips: I) -> Result<Vec<String>>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let prefix = self.state_fips(state_name).ok_or_else(|| {
            CoreError::CatalogError(format!("Unknown state name: {}", state_name))
        })?;

        Ok(cfips
            .into_iter()
            .filter(|id| id.starts_with(prefix))
            .map(str::to_string)
            .collect())
    }

    /// Number of state entries
    pub fn state_count(&self) -> usize {
        self.states.len()
    }

    /// Number of county entries
    pub fn county_count(&self) -> usize {
        self.counties.len()
    }
}

fn read_lookup_csv<P: AsRef<Path>>(path: P) -> Result<HashMap<String, String>> {
    let file = File::open(path)?;
    let mut reader = csv::Reader::from_reader(file);
    let mut table = HashMap::new();

    for record in reader.records() {
        let record = record?;
        let name = record.get(0).ok_or_else(|| {
            CoreError::CatalogError("Lookup row is missing the name column".to_string())
        })?;
        let id = record.get(1).ok_or_else(|| {
            CoreError::CatalogError("Lookup row is missing the identifier column".to_string())
        })?;
        table.insert(name.to_lowercase(), id.to_string());
    }

    Ok(table)
}
