//! Batch forecasting over an in-memory reference dataset.
//!
//! Run with: cargo run --example basic_pipeline

use density_forecast::data::{RequestRow, RequestTable};
use density_forecast::history::HistoryIndex;
use density_forecast::model::last_value_model;
use density_forecast::pipeline::forecast_batch;

fn main() -> density_forecast::error::Result<()> {
    // Two regions: one with plenty of history, one short
    let index = HistoryIndex::from_series(vec![
        ("06037".to_string(), (1..=40).map(f64::from).collect()),
        ("48201".to_string(), vec![3.5, 3.6, 3.7]),
    ]);

    let requests = RequestTable::from_rows(vec![
        RequestRow {
            row_id: "06037_2023-01-01".to_string(),
            cfips: "06037".to_string(),
            first_day_of_month: Some("2023-01-01".to_string()),
        },
        RequestRow {
            row_id: "48201_2023-01-01".to_string(),
            cfips: "48201".to_string(),
            first_day_of_month: Some("2023-01-01".to_string()),
        },
        RequestRow {
            row_id: "99999_2023-01-01".to_string(),
            cfips: "99999".to_string(),
            first_day_of_month: Some("2023-01-01".to_string()),
        },
    ]);

    let model = last_value_model();
    let results = forecast_batch(&index, &requests, &model)?;

    for row in results.rows() {
        println!(
            "{}: {:.3} (coverage {:?})",
            row.row_id, row.microbusiness_density, row.coverage
        );
    }

    Ok(())
}
