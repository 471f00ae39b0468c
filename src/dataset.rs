//! Dataset Builder: raw sources to the weekly modeling table.
//!
//! A single pass over the three raw tables: join, filter out unusable
//! rows, stamp ISO calendar columns, aggregate to weekly grain per
//! (store, product), re-attach static attributes, and derive the history
//! features. The result is one flat CSV; nothing else is written.

use crate::config::BuilderConfig;
use crate::data::{self, column_as_datetimes};
use crate::error::Result;
use crate::features::attach_history_features;
use crate::schema::{calendar, keys, product, store, transaction, weekly};
use chrono::Datelike;
use polars::prelude::*;
use std::path::Path;

/// The three raw sources, identifier columns already canonical.
#[derive(Debug, Clone)]
pub struct RawSources {
    pub stores: DataFrame,
    pub transactions: DataFrame,
    pub products: DataFrame,
}

impl RawSources {
    /// Load all three sources from the configured locations.
    pub fn load(cfg: &BuilderConfig) -> Result<Self> {
        Ok(Self {
            stores: data::load_stores(&cfg.stores)?,
            transactions: data::load_transactions(&cfg.transactions)?,
            products: data::load_products(&cfg.products)?,
        })
    }
}

/// Build the weekly modeling table from the raw sources.
pub fn build_weekly_dataset(sources: &RawSources) -> Result<DataFrame> {
    let joined = join_sources(sources)?;
    let cleaned = drop_unusable_rows(joined)?;
    let stamped = attach_calendar_columns(cleaned)?;
    let aggregated = aggregate_weekly(&stamped)?;
    let enriched = attach_static_attributes(aggregated, &stamped)?;

    // Strict chronological order within each (store, product) series;
    // the history scan depends on it.
    let mut ordered = enriched
        .lazy()
        .sort(
            [keys::STORE_ID, keys::PRODUCT_ID, keys::YEAR, keys::WEEK],
            SortMultipleOptions::default(),
        )
        .collect()?;

    attach_history_features(&mut ordered)?;
    fill_missing(ordered)
}

/// Write the weekly table as a UTF-8 CSV with a header row, creating the
/// destination directory if absent.
pub fn write_dataset(df: &mut DataFrame, path: &Path) -> Result<()> {
    data::write_csv(df, path)
}

fn join_sources(sources: &RawSources) -> Result<DataFrame> {
    let df = sources
        .transactions
        .clone()
        .lazy()
        .join(
            sources.stores.clone().lazy(),
            [col(keys::STORE_ID)],
            [col(keys::STORE_ID)],
            JoinArgs::new(JoinType::Left),
        )
        .join(
            sources.products.clone().lazy(),
            [col(keys::PRODUCT_ID)],
            [col(keys::PRODUCT_ID)],
            JoinArgs::new(JoinType::Left),
        )
        .collect()?;
    Ok(df)
}

/// Drop transactions without a usable subcategory or premise.
///
/// The upstream system treats these as discardable records, not errors.
/// Whether that filter is intentional business logic or papers over a
/// join-quality issue is an open question; see DESIGN.md before changing
/// it.
fn drop_unusable_rows(df: DataFrame) -> Result<DataFrame> {
    let df = df
        .lazy()
        .filter(
            col(product::SUBCATEGORY)
                .is_not_null()
                .and(col(store::PREMISE).is_not_null()),
        )
        .collect()?;
    Ok(df)
}

/// Stamp ISO year, ISO week, calendar month, and calendar day onto every
/// transaction.
fn attach_calendar_columns(mut df: DataFrame) -> Result<DataFrame> {
    let stamps = column_as_datetimes(&df, transaction::DATE)?;

    let mut years = Vec::with_capacity(stamps.len());
    let mut weeks = Vec::with_capacity(stamps.len());
    let mut months = Vec::with_capacity(stamps.len());
    let mut days = Vec::with_capacity(stamps.len());
    for stamp in &stamps {
        let date = stamp.date();
        let iso = date.iso_week();
        years.push(iso.year());
        weeks.push(iso.week() as i32);
        months.push(date.month() as i32);
        days.push(date);
    }

    df.with_column(Series::new(keys::YEAR.into(), years))?;
    df.with_column(Series::new(keys::WEEK.into(), weeks))?;
    df.with_column(Series::new(calendar::MONTH.into(), months))?;
    df.with_column(Series::new(calendar::DAY.into(), days))?;
    Ok(df)
}

/// Collapse transactions to weekly grain per (year, week, store, product).
fn aggregate_weekly(stamped: &DataFrame) -> Result<DataFrame> {
    let df = stamped
        .clone()
        .lazy()
        .group_by([
            col(keys::YEAR),
            col(keys::WEEK),
            col(keys::STORE_ID),
            col(keys::PRODUCT_ID),
        ])
        .agg([
            col(transaction::QUANTITY).sum().alias(weekly::QUANTITY),
            col(transaction::NET_VALUE)
                .mean()
                .alias(weekly::AVG_NET_VALUE),
            col(transaction::DISCOUNT).sum().alias(weekly::TOTAL_DISCOUNT),
            col(calendar::DAY)
                .n_unique()
                .cast(DataType::Int64)
                .alias(weekly::ACTIVE_DAYS),
            col(calendar::MONTH).first(),
        ])
        .collect()?;
    Ok(df)
}

/// Re-attach the static store/product attributes to the weekly rows.
///
/// Lookup tables are collapsed to one row per key before the join so a
/// dirty source with conflicting attribute rows cannot fan out the weekly
/// table and break key uniqueness.
fn attach_static_attributes(aggregated: DataFrame, stamped: &DataFrame) -> Result<DataFrame> {
    let product_lookup = stamped
        .clone()
        .lazy()
        .group_by([col(keys::PRODUCT_ID)])
        .agg([
            col(product::BRAND).first(),
            col(product::CATEGORY).first(),
            col(product::MANUFACTURER).first(),
        ]);

    let store_lookup = stamped
        .clone()
        .lazy()
        .group_by([col(keys::STORE_ID)])
        .agg([
            col(store::PREMISE).first(),
            col(store::CATEGORY).first(),
            col(store::ZIPCODE).first(),
        ]);

    let df = aggregated
        .lazy()
        .join(
            product_lookup,
            [col(keys::PRODUCT_ID)],
            [col(keys::PRODUCT_ID)],
            JoinArgs::new(JoinType::Left),
        )
        .join(
            store_lookup,
            [col(keys::STORE_ID)],
            [col(keys::STORE_ID)],
            JoinArgs::new(JoinType::Left),
        )
        .collect()?;
    Ok(df)
}

/// Replace every remaining null with zero: numeric columns get `0`,
/// string columns get `"0"`. Join misses and short history both land
/// here.
fn fill_missing(df: DataFrame) -> Result<DataFrame> {
    let dtypes: Vec<(String, DataType)> = df
        .get_columns()
        .iter()
        .map(|column| (column.name().to_string(), column.dtype().clone()))
        .collect();

    let mut fills: Vec<Expr> = Vec::new();
    for (name, dtype) in &dtypes {
        if *dtype == DataType::String {
            fills.push(col(name.as_str()).fill_null(lit("0")));
        } else if data::is_numeric_dtype(dtype) {
            fills.push(col(name.as_str()).fill_null(lit(0).cast(dtype.clone())));
        }
    }

    let df = df.lazy().with_columns(fills).collect()?;
    Ok(df)
}
