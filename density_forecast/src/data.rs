//! Tabular inputs for the forecasting pipeline
//!
//! Two CSV inputs feed a run: the reference dataset carrying every region's
//! observation history, and the request table naming the rows to forecast.
//! Region identifiers are treated as opaque string keys; the loader
//! stringifies integer-typed cfips columns without reinterpreting them.

use crate::error::{ForecastError, Result};
use polars::prelude::*;
use std::fs::File;
use std::path::Path;

/// Column holding the region identifier
pub const CFIPS_COLUMN: &str = "cfips";
/// Column holding the observed metric
pub const DENSITY_COLUMN: &str = "microbusiness_density";
/// Column holding the observation date
pub const DATE_COLUMN: &str = "first_day_of_month";
/// Column holding the request row identifier
pub const ROW_ID_COLUMN: &str = "row_id";

/// Reference dataset: per-region observation history, time-ascending
#[derive(Debug, Clone)]
pub struct ReferenceData {
    df: DataFrame,
}

impl ReferenceData {
    /// Load the reference dataset from a CSV file.
    pub fn from_csv<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        let df = CsvReader::new(file)
            .infer_schema(None)
            .has_header(true)
            .finish()?;

        Self::from_dataframe(df)
    }

    /// Create reference data from an existing DataFrame.
    pub fn from_dataframe(df: DataFrame) -> Result<Self> {
        for required in [CFIPS_COLUMN, DENSITY_COLUMN] {
            if df.column(required).is_err() {
                return Err(ForecastError::DataError(format!(
                    "Reference dataset is missing the '{}' column",
                    required
                )));
            }
        }

        Ok(Self { df })
    }

    /// Region identifier of every observation row, in row order.
    pub fn cfips(&self) -> Result<Vec<String>> {
        column_as_string(&self.df, CFIPS_COLUMN)
    }

    /// Observed metric of every row, in row order.
    pub fn densities(&self) -> Result<Vec<f64>> {
        column_as_f64(&self.df, DENSITY_COLUMN)
    }

    /// (region, value) pairs in row order. Rows with a null metric are
    /// skipped so identifiers and values never fall out of alignment.
    pub fn observations(&self) -> Result<Vec<(String, f64)>> {
        let cfips = self.cfips()?;
        let densities = column_as_f64_nullable(&self.df, DENSITY_COLUMN)?;

        if cfips.len() != densities.len() {
            return Err(ForecastError::DataError(format!(
                "Column lengths differ: {} identifiers vs {} values",
                cfips.len(),
                densities.len()
            )));
        }

        Ok(cfips
            .into_iter()
            .zip(densities)
            .filter_map(|(id, value)| value.map(|v| (id, v)))
            .collect())
    }

    /// Get the underlying DataFrame
    pub fn dataframe(&self) -> &DataFrame {
        &self.df
    }

    /// Number of observation rows
    pub fn len(&self) -> usize {
        self.df.height()
    }

    /// Check if the reference dataset is empty
    pub fn is_empty(&self) -> bool {
        self.df.height() == 0
    }
}

/// One row of the request table
#[derive(Debug, Clone, PartialEq)]
pub struct RequestRow {
    /// Row identifier carried through to the result table
    pub row_id: String,
    /// Region to forecast
    pub cfips: String,
    /// Optional time position of the requested forecast
    pub first_day_of_month: Option<String>,
}

/// Request table: the rows a prediction run must produce forecasts for
#[derive(Debug, Clone)]
pub struct RequestTable {
    rows: Vec<RequestRow>,
}

impl RequestTable {
    /// Load a request table from a CSV file.
    pub fn from_csv<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        let df = CsvReader::new(file)
            .infer_schema(None)
            .has_header(true)
            .finish()?;

        Self::from_dataframe(&df)
    }

    /// Create a request table from an existing DataFrame.
    pub fn from_dataframe(df: &DataFrame) -> Result<Self> {
        let row_ids = column_as_string(df, ROW_ID_COLUMN)?;
        let cfips = column_as_string(df, CFIPS_COLUMN)?;

        let dates = if df.column(DATE_COLUMN).is_ok() {
            Some(column_as_string(df, DATE_COLUMN)?)
        } else {
            None
        };

        let rows = row_ids
            .into_iter()
            .zip(cfips)
            .enumerate()
            .map(|(i, (row_id, cfips))| RequestRow {
                row_id,
                cfips,
                first_day_of_month: dates.as_ref().map(|d| d[i].clone()),
            })
            .collect();

        Ok(Self { rows })
    }

    /// Create a request table directly from rows (for testing and callers
    /// that already hold structured requests).
    pub fn from_rows(rows: Vec<RequestRow>) -> Self {
        Self { rows }
    }

    /// The request rows, in table order
    pub fn rows(&self) -> &[RequestRow] {
        &self.rows
    }

    /// Whether any row carries a time position
    pub fn has_dates(&self) -> bool {
        self.rows
            .iter()
            .any(|row| row.first_day_of_month.is_some())
    }

    /// Number of request rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Check if the request table is empty
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Get a column as string values, stringifying integer identifiers
pub(crate) fn column_as_string(df: &DataFrame, column_name: &str) -> Result<Vec<String>> {
    let col = df.column(column_name).map_err(|e| {
        ForecastError::DataError(format!("Column '{}' not found: {}", column_name, e))
    })?;

    match col.dtype() {
        DataType::Utf8 => Ok(col
            .utf8()
            .unwrap()
            .into_iter()
            .map(|v| v.unwrap_or_default().to_string())
            .collect()),
        DataType::Int64 => Ok(col
            .i64()
            .unwrap()
            .into_iter()
            .map(|v| v.map(|x| x.to_string()).unwrap_or_default())
            .collect()),
        DataType::Int32 => Ok(col
            .i32()
            .unwrap()
            .into_iter()
            .map(|v| v.map(|x| x.to_string()).unwrap_or_default())
            .collect()),
        _ => Err(ForecastError::DataError(format!(
            "Column '{}' cannot be read as identifiers",
            column_name
        ))),
    }
}

/// Get a column as f64 values with nulls preserved
pub(crate) fn column_as_f64_nullable(
    df: &DataFrame,
    column_name: &str,
) -> Result<Vec<Option<f64>>> {
    let col = df.column(column_name).map_err(|e| {
        ForecastError::DataError(format!("Column '{}' not found: {}", column_name, e))
    })?;

    match col.dtype() {
        DataType::Float64 => Ok(col.f64().unwrap().into_iter().collect()),
        DataType::Float32 => Ok(col
            .f32()
            .unwrap()
            .into_iter()
            .map(|v| v.map(|x| x as f64))
            .collect()),
        DataType::Int64 => Ok(col
            .i64()
            .unwrap()
            .into_iter()
            .map(|v| v.map(|x| x as f64))
            .collect()),
        DataType::Int32 => Ok(col
            .i32()
            .unwrap()
            .into_iter()
            .map(|v| v.map(|x| x as f64))
            .collect()),
        _ => Err(ForecastError::DataError(format!(
            "Column '{}' cannot be converted to f64",
            column_name
        ))),
    }
}

/// Get a column as f64 values
pub(crate) fn column_as_f64(df: &DataFrame, column_name: &str) -> Result<Vec<f64>> {
    let col = df.column(column_name).map_err(|e| {
        ForecastError::DataError(format!("Column '{}' not found: {}", column_name, e))
    })?;

    match col.dtype() {
        DataType::Float64 => Ok(col.f64().unwrap().into_iter().flatten().collect()),
        DataType::Float32 => Ok(col
            .f32()
            .unwrap()
            .into_iter()
            .flatten()
            .map(|v| v as f64)
            .collect()),
        DataType::Int64 => Ok(col
            .i64()
            .unwrap()
            .into_iter()
            .flatten()
            .map(|v| v as f64)
            .collect()),
        DataType::Int32 => Ok(col
            .i32()
            .unwrap()
            .into_iter()
            .flatten()
            .map(|v| v as f64)
            .collect()),
        _ => Err(ForecastError::DataError(format!(
            "Column '{}' cannot be converted to f64",
            column_name
        ))),
    }
}
