use demand_forecast::features::attach_history_features;
use polars::df;
use polars::prelude::*;

fn weekly_frame(stores: &[i64], products: &[i64], quantities: &[f64]) -> DataFrame {
    df!(
        "store_id" => stores,
        "product_id" => products,
        "quantity" => quantities,
    )
    .unwrap()
}

fn float_column(df: &DataFrame, name: &str) -> Vec<Option<f64>> {
    df.column(name)
        .unwrap()
        .as_materialized_series()
        .f64()
        .unwrap()
        .into_iter()
        .collect()
}

#[test]
fn lag_is_the_previous_week_quantity() {
    let mut df = weekly_frame(&[1, 1, 1], &[7, 7, 7], &[10.0, 5.0, 8.0]);
    attach_history_features(&mut df).unwrap();

    let lag = float_column(&df, "prev_week_quantity");
    assert_eq!(lag, vec![None, Some(10.0), Some(5.0)]);
}

#[test]
fn trailing_mean_uses_exactly_four_prior_weeks() {
    let quantities = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
    let mut df = weekly_frame(&[1; 6], &[7; 6], &quantities);
    attach_history_features(&mut df).unwrap();

    let rolling = float_column(&df, "rolling_mean_4w");
    assert_eq!(&rolling[..4], &[None, None, None, None]);
    assert_eq!(rolling[4], Some((1.0 + 2.0 + 3.0 + 4.0) / 4.0));
    assert_eq!(rolling[5], Some((2.0 + 3.0 + 4.0 + 5.0) / 4.0));
}

#[test]
fn store_boundaries_do_not_leak_history() {
    let mut df = weekly_frame(&[1, 1, 2, 2], &[7, 7, 7, 7], &[10.0, 20.0, 30.0, 40.0]);
    attach_history_features(&mut df).unwrap();

    let lag = float_column(&df, "prev_week_quantity");
    assert_eq!(lag, vec![None, Some(10.0), None, Some(30.0)]);
}

#[test]
fn product_change_resets_the_series() {
    let mut df = weekly_frame(&[1, 1, 1], &[7, 7, 8], &[10.0, 20.0, 30.0]);
    attach_history_features(&mut df).unwrap();

    let lag = float_column(&df, "prev_week_quantity");
    assert_eq!(lag, vec![None, Some(10.0), None]);

    let rolling = float_column(&df, "rolling_mean_4w");
    assert_eq!(rolling, vec![None, None, None]);
}
