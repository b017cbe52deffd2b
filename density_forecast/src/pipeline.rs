//! Prediction runs and result assembly
//!
//! Two variants produce the same result-table shape. The batch variant
//! extracts every window up front and invokes the model once for the whole
//! request table. The chained variant walks the request table row by row,
//! feeding each forecast back into that region's working history before the
//! next row for the same region, so later forecasts can rest on earlier
//! ones. Chaining is only meaningful when the request table is already
//! time-ordered per region; no sort is performed.

use crate::config::PipelineConfig;
use crate::data::{
    ReferenceData, RequestTable, CFIPS_COLUMN, DATE_COLUMN, DENSITY_COLUMN, ROW_ID_COLUMN,
};
use crate::error::{ForecastError, Result};
use crate::history::HistoryIndex;
use crate::model::{LinearLagModel, SequencePredictor};
use crate::window::{extract_window, Coverage, WorkingHistories};
use chrono::NaiveDate;
use density_core::Granularity;
use polars::prelude::*;
use std::collections::BTreeMap;
use std::fs::File;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Which forecasting variant a run uses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ForecastVariant {
    /// One model invocation for the whole request table
    Batch,
    /// One model invocation per row, chaining forecasts into the
    /// region's working history
    Chained,
}

/// One assembled result row
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastRow {
    /// Identifier of the originating request row
    pub row_id: String,
    /// Region the forecast is for
    pub cfips: String,
    /// The forecast value
    pub microbusiness_density: f64,
    /// Time position carried over from the request row, if present
    pub first_day_of_month: Option<String>,
    /// How much of the model input was real observation
    pub coverage: Coverage,
}

/// The pipeline's output table, in request-row order
#[derive(Debug, Clone)]
pub struct ResultTable {
    rows: Vec<ForecastRow>,
    with_dates: bool,
}

impl ResultTable {
    fn assemble(requests: &RequestTable, forecasts: Vec<(f64, Coverage)>) -> Self {
        let rows = requests
            .rows()
            .iter()
            .zip(forecasts)
            .map(|(request, (value, coverage))| ForecastRow {
                row_id: request.row_id.clone(),
                cfips: request.cfips.clone(),
                microbusiness_density: value,
                first_day_of_month: request.first_day_of_month.clone(),
                coverage,
            })
            .collect();

        Self {
            rows,
            with_dates: requests.has_dates(),
        }
    }

    /// The result rows, in the same order as the request table
    pub fn rows(&self) -> &[ForecastRow] {
        &self.rows
    }

    /// Number of result rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Check if the table holds no rows
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Rows whose windows were zero-filled in part or whole
    pub fn degraded_rows(&self) -> impl Iterator<Item = &ForecastRow> {
        self.rows.iter().filter(|row| row.coverage.is_degraded())
    }

    /// Group rows into the dashboard's time-granularity buckets. Rows
    /// without a time position are left out; a present but unparseable
    /// date is an error.
    pub fn group_by_granularity(
        &self,
        granularity: Granularity,
    ) -> Result<BTreeMap<i64, Vec<&ForecastRow>>> {
        let mut buckets: BTreeMap<i64, Vec<&ForecastRow>> = BTreeMap::new();

        for row in &self.rows {
            let raw = match row.first_day_of_month.as_deref() {
                Some(raw) => raw,
                None => continue,
            };
            let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|e| {
                ForecastError::DataError(format!("Unparseable date '{}': {}", raw, e))
            })?;
            buckets.entry(granularity.bucket(date)).or_default().push(row);
        }

        Ok(buckets)
    }

    /// Render the table as a DataFrame with the output columns.
    pub fn to_dataframe(&self) -> Result<DataFrame> {
        let row_ids: Vec<String> = self.rows.iter().map(|r| r.row_id.clone()).collect();
        let densities: Vec<f64> = self.rows.iter().map(|r| r.microbusiness_density).collect();
        let cfips: Vec<String> = self.rows.iter().map(|r| r.cfips.clone()).collect();

        let mut columns = vec![
            Series::new(ROW_ID_COLUMN, row_ids),
            Series::new(DENSITY_COLUMN, densities),
            Series::new(CFIPS_COLUMN, cfips),
        ];

        if self.with_dates {
            let dates: Vec<String> = self
                .rows
                .iter()
                .map(|r| r.first_day_of_month.clone().unwrap_or_default())
                .collect();
            columns.push(Series::new(DATE_COLUMN, dates));
        }

        Ok(DataFrame::new(columns)?)
    }

    /// Write the table as CSV. Nothing is written until the whole run has
    /// succeeded, so a failed run leaves any previous file untouched.
    pub fn write_csv<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let mut df = self.to_dataframe()?;
        let mut file = File::create(path)?;
        CsvWriter::new(&mut file).has_header(true).finish(&mut df)?;
        Ok(())
    }
}

fn warn_degraded(cfips: &str, coverage: Coverage) {
    match coverage {
        Coverage::Missing => warn!(cfips, "Unknown region, forecasting from an all-zero window"),
        Coverage::Partial { observed } => warn!(
            cfips,
            observed, "Short history, front slots of the window are zero-filled"
        ),
        Coverage::Complete => {}
    }
}

/// Batch variant: one model invocation for the whole request table.
pub fn forecast_batch<M: SequencePredictor>(
    index: &HistoryIndex,
    requests: &RequestTable,
    model: &M,
) -> Result<ResultTable> {
    let windows: Vec<_> = requests
        .rows()
        .iter()
        .map(|row| {
            let window = extract_window(index.history(&row.cfips));
            warn_degraded(&row.cfips, window.coverage());
            window
        })
        .collect();

    let forecasts = model.predict_batch(&windows)?;
    let paired = forecasts
        .into_iter()
        .zip(windows.iter().map(|w| w.coverage()))
        .collect();

    Ok(ResultTable::assemble(requests, paired))
}

/// Chained variant: forecasts are produced row by row, each appended to its
/// region's working history before the next row for that region.
pub fn forecast_chained<M: SequencePredictor>(
    index: &HistoryIndex,
    requests: &RequestTable,
    model: &M,
) -> Result<ResultTable> {
    let mut working = WorkingHistories::from_index(index);
    let mut paired = Vec::with_capacity(requests.len());

    for row in requests.rows() {
        let window = working.window(&row.cfips);
        warn_degraded(&row.cfips, window.coverage());

        let forecast = model.predict_batch(std::slice::from_ref(&window))?[0];
        working.append(&row.cfips, forecast);
        paired.push((forecast, window.coverage()));
    }

    Ok(ResultTable::assemble(requests, paired))
}

/// Full prediction step: load inputs and the model artifact, forecast, and
/// write the result table to the configured submission path.
///
/// Any failure aborts the run before the submission file is touched.
pub fn run_prediction(
    config: &PipelineConfig,
    request_path: Option<&Path>,
    variant: ForecastVariant,
) -> Result<ResultTable> {
    let request_path: PathBuf = request_path
        .map(Path::to_path_buf)
        .unwrap_or_else(|| config.default_request_path.clone());

    info!(
        reference = %config.reference_path.display(),
        requests = %request_path.display(),
        ?variant,
        "Starting prediction run"
    );

    let reference = ReferenceData::from_csv(&config.reference_path)?;
    let index = HistoryIndex::from_reference(&reference)?;
    let requests = RequestTable::from_csv(&request_path)?;
    let model = LinearLagModel::load(&config.model_path)?;

    let results = match variant {
        ForecastVariant::Batch => forecast_batch(&index, &requests, &model)?,
        ForecastVariant::Chained => forecast_chained(&index, &requests, &model)?,
    };

    results.write_csv(&config.submission_path)?;

    let degraded = results.degraded_rows().count();
    info!(
        rows = results.len(),
        regions = index.len(),
        degraded,
        submission = %config.submission_path.display(),
        "Prediction run complete"
    );

    Ok(results)
}
