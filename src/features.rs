//! Per-series history features for the weekly modeling table.

use crate::data::{column_as_f64, column_as_i64};
use crate::error::Result;
use crate::schema::{keys, weekly};
use polars::prelude::*;

/// Number of strictly prior weeks in the trailing mean window.
const TRAILING_WINDOW: usize = 4;

/// Append `prev_week_quantity` and `rolling_mean_4w` to a weekly table.
///
/// The input must already be sorted by (store_id, product_id, year, week).
/// Both features are computed as an explicit scan within each
/// (store_id, product_id) series so they only ever see strictly prior
/// weeks: the first row of a series has no lag, and a row with fewer than
/// four prior weeks has no trailing mean. Gaps are left null here; the
/// caller decides the fill.
pub fn attach_history_features(df: &mut DataFrame) -> Result<()> {
    let stores = column_as_i64(df, keys::STORE_ID)?;
    let products = column_as_i64(df, keys::PRODUCT_ID)?;
    let quantities = column_as_f64(df, weekly::QUANTITY)?;

    let height = df.height();
    let mut lag: Vec<Option<f64>> = Vec::with_capacity(height);
    let mut trailing: Vec<Option<f64>> = Vec::with_capacity(height);

    let mut series_key: Option<(i64, i64)> = None;
    let mut history: Vec<f64> = Vec::new();

    for row in 0..height {
        let key = (stores[row], products[row]);
        if series_key != Some(key) {
            series_key = Some(key);
            history.clear();
        }

        lag.push(history.last().copied());
        if history.len() >= TRAILING_WINDOW {
            let window = &history[history.len() - TRAILING_WINDOW..];
            trailing.push(Some(window.iter().sum::<f64>() / TRAILING_WINDOW as f64));
        } else {
            trailing.push(None);
        }

        history.push(quantities[row]);
    }

    df.with_column(Series::new(weekly::PREV_WEEK_QUANTITY.into(), lag))?;
    df.with_column(Series::new(weekly::ROLLING_MEAN_4W.into(), trailing))?;
    Ok(())
}
