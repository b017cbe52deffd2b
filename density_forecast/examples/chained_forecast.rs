//! Chained forecasting: each prediction feeds the next window for the
//! same region, and the results are grouped by state.
//!
//! Run with: cargo run --example chained_forecast

use density_core::GeoCatalog;
use density_forecast::data::{RequestRow, RequestTable};
use density_forecast::history::HistoryIndex;
use density_forecast::model::last_value_model;
use density_forecast::pipeline::forecast_chained;

fn main() -> density_forecast::error::Result<()> {
    let index = HistoryIndex::from_series(vec![(
        "06037".to_string(),
        (1..=40).map(|v| f64::from(v) * 0.1).collect(),
    )]);

    // Three consecutive months for the same region, time-ordered
    let requests = RequestTable::from_rows(
        ["2023-01-01", "2023-02-01", "2023-03-01"]
            .iter()
            .map(|date| RequestRow {
                row_id: format!("06037_{}", date),
                cfips: "06037".to_string(),
                first_day_of_month: Some(date.to_string()),
            })
            .collect(),
    );

    let model = last_value_model();
    let results = forecast_chained(&index, &requests, &model)?;

    let catalog = GeoCatalog::from_pairs(
        vec![("California".to_string(), "06".to_string())],
        vec![("Los Angeles County".to_string(), "06037".to_string())],
    );
    let california = catalog
        .cfips_in_state(
            "California",
            results.rows().iter().map(|row| row.cfips.as_str()),
        )
        .expect("state is in the catalog");

    println!("{} forecasts in California:", california.len());
    for row in results.rows() {
        println!("  {} -> {:.3}", row.row_id, row.microbusiness_density);
    }

    Ok(())
}
