use density_forecast::config::PipelineConfig;
use density_forecast::data::{RequestRow, RequestTable};
use density_forecast::history::HistoryIndex;
use density_forecast::model::{last_value_model, LinearLagModel};
use density_forecast::pipeline::{
    forecast_batch, forecast_chained, run_prediction, ForecastVariant,
};
use density_forecast::window::{Coverage, WINDOW_LEN};
use pretty_assertions::assert_eq;
use std::io::Write;

fn requests_for(cfips: &str, count: usize) -> RequestTable {
    RequestTable::from_rows(
        (0..count)
            .map(|i| RequestRow {
                row_id: format!("{}_{}", cfips, i),
                cfips: cfips.to_string(),
                first_day_of_month: None,
            })
            .collect(),
    )
}

#[test]
fn batch_results_preserve_request_order_and_ids() {
    let index = HistoryIndex::from_series(vec![
        ("06037".to_string(), (1..=40).map(f64::from).collect()),
        ("48201".to_string(), (1..=40).map(|v| f64::from(v) * 2.0).collect()),
    ]);

    let requests = RequestTable::from_rows(vec![
        RequestRow {
            row_id: "b".to_string(),
            cfips: "48201".to_string(),
            first_day_of_month: None,
        },
        RequestRow {
            row_id: "a".to_string(),
            cfips: "06037".to_string(),
            first_day_of_month: None,
        },
        RequestRow {
            row_id: "c".to_string(),
            cfips: "48201".to_string(),
            first_day_of_month: None,
        },
    ]);

    let results = forecast_batch(&index, &requests, &last_value_model()).unwrap();

    let ids: Vec<&str> = results.rows().iter().map(|r| r.row_id.as_str()).collect();
    assert_eq!(ids, vec!["b", "a", "c"]);
    assert_eq!(results.len(), requests.len());
}

#[test]
fn batch_forecasts_unknown_regions_from_zero_windows() {
    let index = HistoryIndex::from_series(vec![]);
    let requests = requests_for("99999", 1);

    let results = forecast_batch(&index, &requests, &last_value_model()).unwrap();
    assert_eq!(results.rows()[0].microbusiness_density, 0.0);
    assert_eq!(results.rows()[0].coverage, Coverage::Missing);
    assert_eq!(results.degraded_rows().count(), 1);
}

#[test]
fn chained_forecasts_feed_back_into_the_next_window() {
    // 40 known values 1..=40; with a last-value model the first forecast is
    // 40.0 and every later one echoes it forward.
    let index =
        HistoryIndex::from_series(vec![("06037".to_string(), (1..=40).map(f64::from).collect())]);
    let requests = requests_for("06037", 3);

    let results = forecast_chained(&index, &requests, &last_value_model()).unwrap();
    let forecasts: Vec<f64> = results
        .rows()
        .iter()
        .map(|r| r.microbusiness_density)
        .collect();
    assert_eq!(forecasts, vec![40.0, 40.0, 40.0]);
}

#[test]
fn chained_windows_shift_by_one_and_include_the_prior_forecast() {
    // A summing model witnesses the exact window contents: the first window
    // is values 3..=40, the second drops 3.0 and appends the first forecast.
    let index =
        HistoryIndex::from_series(vec![("06037".to_string(), (1..=40).map(f64::from).collect())]);
    let requests = requests_for("06037", 2);

    let sum_model = LinearLagModel::new(vec![1.0; WINDOW_LEN], 0.0).unwrap();
    let results = forecast_chained(&index, &requests, &sum_model).unwrap();

    let first: f64 = (3..=40).map(f64::from).sum();
    let second: f64 = (4..=40).map(f64::from).sum::<f64>() + first;
    assert_eq!(results.rows()[0].microbusiness_density, first);
    assert_eq!(results.rows()[1].microbusiness_density, second);
}

#[test]
fn chained_runs_do_not_interfere() {
    let index =
        HistoryIndex::from_series(vec![("06037".to_string(), (1..=40).map(f64::from).collect())]);
    let requests = requests_for("06037", 2);
    let model = last_value_model();

    let first_run = forecast_chained(&index, &requests, &model).unwrap();
    let second_run = forecast_chained(&index, &requests, &model).unwrap();

    let values = |table: &density_forecast::pipeline::ResultTable| -> Vec<f64> {
        table.rows().iter().map(|r| r.microbusiness_density).collect()
    };
    assert_eq!(values(&first_run), values(&second_run));
}

#[test]
fn result_dataframe_has_the_output_columns() {
    let index =
        HistoryIndex::from_series(vec![("06037".to_string(), (1..=40).map(f64::from).collect())]);

    let requests = RequestTable::from_rows(vec![RequestRow {
        row_id: "06037_2023-01-01".to_string(),
        cfips: "06037".to_string(),
        first_day_of_month: Some("2023-01-01".to_string()),
    }]);

    let results = forecast_batch(&index, &requests, &last_value_model()).unwrap();
    let df = results.to_dataframe().unwrap();

    assert_eq!(
        df.get_column_names(),
        vec![
            "row_id",
            "microbusiness_density",
            "cfips",
            "first_day_of_month"
        ]
    );
    assert_eq!(df.height(), 1);
}

#[test]
fn dateless_requests_produce_a_three_column_table() {
    let index =
        HistoryIndex::from_series(vec![("06037".to_string(), (1..=40).map(f64::from).collect())]);
    let requests = requests_for("06037", 1);

    let results = forecast_batch(&index, &requests, &last_value_model()).unwrap();
    let df = results.to_dataframe().unwrap();
    assert_eq!(
        df.get_column_names(),
        vec!["row_id", "microbusiness_density", "cfips"]
    );
}

#[test]
fn results_group_into_granularity_buckets() {
    let index =
        HistoryIndex::from_series(vec![("06037".to_string(), (1..=40).map(f64::from).collect())]);

    let requests = RequestTable::from_rows(
        [("a", "2022-11-01"), ("b", "2022-12-01"), ("c", "2023-01-01")]
            .iter()
            .map(|(id, date)| RequestRow {
                row_id: id.to_string(),
                cfips: "06037".to_string(),
                first_day_of_month: Some(date.to_string()),
            })
            .collect(),
    );

    let results = forecast_batch(&index, &requests, &last_value_model()).unwrap();

    let monthly = results
        .group_by_granularity(density_core::Granularity::Monthly)
        .unwrap();
    assert_eq!(monthly.len(), 3);

    let yearly = results
        .group_by_granularity(density_core::Granularity::Yearly)
        .unwrap();
    assert_eq!(yearly.len(), 2);
    assert_eq!(yearly[&2022].len(), 2);
    assert_eq!(yearly[&2023].len(), 1);
}

#[test]
fn end_to_end_prediction_run_writes_the_submission() {
    let dir = tempfile::tempdir().unwrap();

    // Reference dataset: one region with 40 observations
    let reference_path = dir.path().join("train.csv");
    let mut reference = std::fs::File::create(&reference_path).unwrap();
    writeln!(reference, "row_id,cfips,first_day_of_month,microbusiness_density").unwrap();
    for i in 1..=40 {
        writeln!(
            reference,
            "06037_2019-{:02}-01,06037,2019-{:02}-01,{}",
            i.min(12),
            i.min(12),
            i
        )
        .unwrap();
    }

    // Request table: two rows for the same region
    let request_path = dir.path().join("test.csv");
    let mut request = std::fs::File::create(&request_path).unwrap();
    writeln!(request, "row_id,cfips").unwrap();
    writeln!(request, "06037_2023-01-01,06037").unwrap();
    writeln!(request, "06037_2023-02-01,06037").unwrap();

    // Model artifact: echo the last window value
    let model_path = dir.path().join("model.json");
    last_value_model().save(&model_path).unwrap();

    let config = PipelineConfig {
        reference_path,
        model_path,
        submission_path: dir.path().join("submission.csv"),
        default_request_path: dir.path().join("missing-default.csv"),
    };

    let results =
        run_prediction(&config, Some(&request_path), ForecastVariant::Chained).unwrap();
    assert_eq!(results.len(), 2);
    assert_eq!(results.rows()[0].microbusiness_density, 40.0);

    let written = std::fs::read_to_string(&config.submission_path).unwrap();
    let mut lines = written.lines();
    assert_eq!(lines.next(), Some("row_id,microbusiness_density,cfips"));
    assert_eq!(written.lines().count(), 3);
}

#[test]
fn failed_run_leaves_previous_submission_untouched() {
    let dir = tempfile::tempdir().unwrap();
    let submission_path = dir.path().join("submission.csv");
    std::fs::write(&submission_path, "stale contents").unwrap();

    let config = PipelineConfig {
        reference_path: dir.path().join("no-train.csv"),
        model_path: dir.path().join("no-model.json"),
        submission_path: submission_path.clone(),
        default_request_path: dir.path().join("no-test.csv"),
    };

    let result = run_prediction(&config, None, ForecastVariant::Batch);
    assert!(result.is_err());
    assert_eq!(
        std::fs::read_to_string(&submission_path).unwrap(),
        "stale contents"
    );
}
