//! Evaluator: score a held-out weekly table with a pretrained bundle.
//!
//! The evaluation table must match the Dataset Builder's output schema
//! plus the ground-truth quantity column. Feature selection, category
//! alignment, and the numeric fill mirror what the training side did, so
//! the model sees the feature space it was fitted in.

use crate::data::{self, column_as_f64, column_as_opt_str};
use crate::error::Result;
use crate::metrics::{wmape, EvaluationReport};
use crate::model::ModelBundle;
use crate::schema::{keys, results, weekly};
use polars::prelude::*;
use std::collections::{BTreeMap, HashSet};
use std::path::Path;

/// Scored evaluation: the per-row results table plus the summary report.
#[derive(Debug, Clone)]
pub struct Evaluation {
    /// year, week, store_id, product_id, actual and predicted quantity.
    pub results: DataFrame,
    pub report: EvaluationReport,
}

/// Read an evaluation table from CSV.
pub fn read_dataset(path: &Path) -> Result<DataFrame> {
    let df = CsvReadOptions::default()
        .with_has_header(true)
        .try_into_reader_with_file_path(Some(path.to_path_buf()))?
        .finish()?;
    Ok(df)
}

/// Score the evaluation table with the bundle.
pub fn evaluate_dataset(bundle: &ModelBundle, dataset: &DataFrame) -> Result<Evaluation> {
    let features = dataset.select(bundle.model.feature_names().iter().map(String::as_str))?;
    let features = align_categories(features, &bundle.categories)?;
    let features = fill_numeric_nulls(features)?;

    let actual = column_as_f64(dataset, weekly::QUANTITY)?;
    let predicted = bundle.model.predict(&features)?;
    let score = wmape(&actual, &predicted)?;

    let mut table = dataset.select([
        keys::YEAR,
        keys::WEEK,
        keys::STORE_ID,
        keys::PRODUCT_ID,
    ])?;
    let rounded: Vec<i64> = predicted.iter().map(|p| p.round() as i64).collect();
    table.with_column(Series::new(results::ACTUAL.into(), actual))?;
    table.with_column(Series::new(results::PREDICTED.into(), rounded))?;

    Ok(Evaluation {
        results: table,
        report: EvaluationReport {
            rows: predicted.len(),
            wmape: score,
        },
    })
}

/// Write the results table as CSV, creating the destination folder if
/// absent.
pub fn write_results(df: &mut DataFrame, path: &Path) -> Result<()> {
    data::write_csv(df, path)
}

/// Restrict every categorical column to the category values seen at
/// training time. A value outside the set becomes null; the row stays.
fn align_categories(
    mut df: DataFrame,
    categories: &BTreeMap<String, Vec<String>>,
) -> Result<DataFrame> {
    for (name, allowed) in categories {
        // A categorical the model knows about but the feature frame does
        // not carry is simply skipped.
        if df.column(name.as_str()).is_err() {
            continue;
        }

        let levels: HashSet<&str> = allowed.iter().map(String::as_str).collect();
        let aligned: Vec<Option<String>> = column_as_opt_str(&df, name)?
            .into_iter()
            .map(|value| value.filter(|level| levels.contains(level.as_str())))
            .collect();
        df.with_column(Series::new(name.as_str().into(), aligned))?;
    }
    Ok(df)
}

/// Fill nulls in numeric columns with zero; categorical columns keep the
/// nulls produced by alignment.
fn fill_numeric_nulls(df: DataFrame) -> Result<DataFrame> {
    let fills: Vec<Expr> = df
        .get_columns()
        .iter()
        .filter(|column| data::is_numeric_dtype(column.dtype()))
        .map(|column| {
            let name = column.name().to_string();
            col(name.as_str()).fill_null(lit(0).cast(column.dtype().clone()))
        })
        .collect();

    if fills.is_empty() {
        return Ok(df);
    }
    let df = df.lazy().with_columns(fills).collect()?;
    Ok(df)
}
