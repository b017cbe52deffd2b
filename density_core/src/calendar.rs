//! Calendar segregation of observation dates
//!
//! The dashboard groups forecasts by month, year, or ISO week. Observation
//! timestamps in the data are first-of-month dates; this module derives the
//! calendar parts used for those groupings.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// Calendar parts derived from an observation date
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarParts {
    /// Calendar year
    pub year: i32,
    /// Calendar month (1-12)
    pub month: u32,
    /// ISO 8601 week number (1-53)
    pub iso_week: u32,
}

impl CalendarParts {
    /// Derive the calendar parts of a date.
    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
            iso_week: date.iso_week().week(),
        }
    }
}

/// Time granularity for grouping forecasts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Granularity {
    Monthly,
    Yearly,
    Weekly,
}

impl Default for Granularity {
    fn default() -> Self {
        Granularity::Monthly
    }
}

impl Granularity {
    /// The grouping key a date falls into at this granularity.
    pub fn bucket(&self, date: NaiveDate) -> i64 {
        let parts = CalendarParts::of(date);
        match self {
            Granularity::Monthly => i64::from(parts.year) * 100 + i64::from(parts.month),
            Granularity::Yearly => i64::from(parts.year),
            Granularity::Weekly => {
                let iso = date.iso_week();
                i64::from(iso.year()) * 100 + i64::from(iso.week())
            }
        }
    }
}
