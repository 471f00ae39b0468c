use demand_forecast::error::PipelineError;
use demand_forecast::model::{ModelBundle, QuantityRegressor};
use polars::df;
use polars::prelude::*;
use std::collections::BTreeMap;
use std::path::Path;
use tempfile::tempdir;

fn sample_bundle() -> ModelBundle {
    let features = vec![
        "prev_week_quantity".to_string(),
        "rolling_mean_4w".to_string(),
        "brand".to_string(),
        "premise".to_string(),
    ];

    let mut numeric = BTreeMap::new();
    numeric.insert("prev_week_quantity".to_string(), 1.0);
    numeric.insert("rolling_mean_4w".to_string(), 0.5);

    let mut brand_levels = BTreeMap::new();
    brand_levels.insert("X".to_string(), 2.0);
    brand_levels.insert("Z".to_string(), 5.0);
    let mut premise_levels = BTreeMap::new();
    premise_levels.insert("supermarket".to_string(), 1.0);
    let mut categorical = BTreeMap::new();
    categorical.insert("brand".to_string(), brand_levels);
    categorical.insert("premise".to_string(), premise_levels);

    let model = QuantityRegressor::new(features, 0.5, numeric, categorical).unwrap();

    let mut categories = BTreeMap::new();
    categories.insert("brand".to_string(), vec!["X".to_string()]);
    categories.insert("premise".to_string(), vec!["supermarket".to_string()]);

    ModelBundle { model, categories }
}

#[test]
fn predict_sums_numeric_and_level_weights() {
    let bundle = sample_bundle();
    let features = df!(
        "prev_week_quantity" => &[10.0, 0.0],
        "rolling_mean_4w" => &[4.0, 0.0],
        "brand" => &["X", "Y"],
        "premise" => &["supermarket", "supermarket"],
    )
    .unwrap();

    let predicted = bundle.model.predict(&features).unwrap();
    // 0.5 + 10*1.0 + 4*0.5 + 2.0 + 1.0; the unknown brand contributes nothing
    assert_eq!(predicted, vec![15.5, 1.5]);
}

#[test]
fn null_levels_contribute_nothing() {
    let bundle = sample_bundle();
    let features = df!(
        "prev_week_quantity" => &[0.0, 0.0],
        "rolling_mean_4w" => &[0.0, 0.0],
        "brand" => &[None::<&str>, Some("X")],
        "premise" => &[Some("supermarket"), None::<&str>],
    )
    .unwrap();

    let predicted = bundle.model.predict(&features).unwrap();
    assert_eq!(predicted, vec![1.5, 2.5]);
}

#[test]
fn bundle_round_trips_through_json() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("models").join("model.json");

    let bundle = sample_bundle();
    bundle.save(&path).unwrap();
    let loaded = ModelBundle::load(&path).unwrap();

    assert_eq!(loaded.model.feature_names(), bundle.model.feature_names());
    assert_eq!(loaded.categories, bundle.categories);
}

#[test]
fn missing_bundle_is_an_io_error() {
    let err = ModelBundle::load(Path::new("nonexistent/model.json")).unwrap_err();
    assert!(matches!(err, PipelineError::IoError(_)));
}

#[test]
fn undeclared_weighted_column_is_rejected() {
    let features = vec!["prev_week_quantity".to_string()];
    let mut numeric = BTreeMap::new();
    numeric.insert("rolling_mean_4w".to_string(), 1.0);

    let result = QuantityRegressor::new(features, 0.0, numeric, BTreeMap::new());
    assert!(matches!(result, Err(PipelineError::ModelError(_))));
}
