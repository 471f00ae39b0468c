use assert_approx_eq::assert_approx_eq;
use demand_forecast::config::{BuilderConfig, EvaluatorConfig};
use demand_forecast::data::{column_as_f64, column_as_i64};
use demand_forecast::dataset::{build_weekly_dataset, write_dataset, RawSources};
use demand_forecast::evaluate::{evaluate_dataset, read_dataset, write_results};
use demand_forecast::model::{ModelBundle, QuantityRegressor};
use polars::df;
use polars::prelude::*;
use std::collections::BTreeMap;
use std::fs::{self, File};
use std::path::Path;
use tempfile::tempdir;

fn write_parquet(mut df: DataFrame, path: &Path) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    let file = File::create(path).unwrap();
    ParquetWriter::new(file).finish(&mut df).unwrap();
}

/// One store, one product, four transactions across ISO weeks 1 and 2.
fn seed_raw_sources(dir: &Path) {
    write_parquet(
        df!(
            "store" => &[1i64],
            "premise" => &["supermarket"],
            "category" => &["grocery"],
            "zipcode" => &[11001i64],
        )
        .unwrap(),
        &dir.join("raw/stores.parquet"),
    );
    write_parquet(
        df!(
            "product" => &[1i64],
            "brand" => &["X"],
            "category" => &["beverages"],
            "manufacturer" => &["Acme"],
            "subcategory" => &["soda"],
        )
        .unwrap(),
        &dir.join("raw/products.parquet"),
    );
    write_parquet(
        df!(
            "store_id" => &[1i64, 1, 1, 1],
            "product_id" => &[1i64, 1, 1, 1],
            "transaction_date" => &[
                "2024-01-01 10:00:00",
                "2024-01-03 09:30:00",
                "2024-01-08 12:00:00",
                "2024-01-09 18:15:00",
            ],
            "quantity" => &[10.0, 5.0, 3.0, 2.0],
            "net_value" => &[20.0, 10.0, 6.0, 4.0],
            "discount" => &[1.0, 0.0, 0.5, 0.5],
        )
        .unwrap(),
        &dir.join("raw/transactions.parquet"),
    );
}

fn naive_bundle() -> ModelBundle {
    // Predict this week's demand as last week's demand.
    let features = vec!["prev_week_quantity".to_string()];
    let mut numeric = BTreeMap::new();
    numeric.insert("prev_week_quantity".to_string(), 1.0);
    let model = QuantityRegressor::new(features, 0.0, numeric, BTreeMap::new()).unwrap();

    ModelBundle {
        model,
        categories: BTreeMap::new(),
    }
}

#[test]
fn full_pipeline_workflow() {
    let dir = tempdir().unwrap();
    seed_raw_sources(dir.path());

    let builder_cfg = BuilderConfig {
        stores: dir.path().join("raw/stores.parquet"),
        transactions: dir.path().join("raw/transactions.parquet"),
        products: dir.path().join("raw/products.parquet"),
        output: dir.path().join("data/weekly_dataset.csv"),
    };
    assert!(builder_cfg.missing_inputs().is_empty());

    // 1. Build and persist the weekly modeling table.
    let sources = RawSources::load(&builder_cfg).unwrap();
    let mut weekly = build_weekly_dataset(&sources).unwrap();
    assert_eq!(weekly.height(), 2);
    write_dataset(&mut weekly, &builder_cfg.output).unwrap();

    // 2. Persist a model bundle next to it.
    let evaluator_cfg = EvaluatorConfig {
        model: dir.path().join("models/model.json"),
        dataset: builder_cfg.output.clone(),
        results: dir.path().join("results/evaluation_results.csv"),
    };
    naive_bundle().save(&evaluator_cfg.model).unwrap();
    assert!(evaluator_cfg.missing_inputs().is_empty());

    // 3. Score the table the way the evaluation job does.
    let bundle = ModelBundle::load(&evaluator_cfg.model).unwrap();
    let dataset = read_dataset(&evaluator_cfg.dataset).unwrap();
    let mut evaluation = evaluate_dataset(&bundle, &dataset).unwrap();

    // Week 1 has no history, week 2 predicts week 1's total.
    assert_eq!(
        column_as_i64(&evaluation.results, "predicted_quantity").unwrap(),
        vec![0, 15]
    );
    assert_eq!(
        column_as_f64(&evaluation.results, "actual_quantity").unwrap(),
        vec![15.0, 5.0]
    );
    // (|15-0| + |5-15|) / (15 + 5)
    assert_approx_eq!(evaluation.report.wmape, 25.0 / 20.0, 1e-9);

    // 4. Persist the results table.
    write_results(&mut evaluation.results, &evaluator_cfg.results).unwrap();
    let written = read_dataset(&evaluator_cfg.results).unwrap();
    assert_eq!(written.height(), 2);
    assert_eq!(
        column_as_i64(&written, "store_id").unwrap(),
        vec![1, 1]
    );
}
