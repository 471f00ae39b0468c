//! Raw source loading and column extraction helpers.
//!
//! The three raw sources arrive as Parquet files. Loading renames the
//! store/product identifier columns to the shared canonical names so the
//! joins in [`crate::dataset`] line up, and verifies required columns up
//! front so a malformed file fails with the column named rather than deep
//! inside a join.

use crate::error::{PipelineError, Result};
use crate::schema::{keys, product, store, transaction};
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use polars::prelude::*;
use std::fs::{self, File};
use std::path::Path;

/// Days from 0001-01-01 (CE) to the 1970-01-01 epoch.
const EPOCH_CE_DAYS: i32 = 719_163;

/// Timestamp formats accepted for string-typed transaction dates.
const TIMESTAMP_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

/// Read a Parquet file into a DataFrame.
pub fn read_parquet(path: &Path) -> Result<DataFrame> {
    let file = File::open(path)?;
    let df = ParquetReader::new(file).finish()?;
    Ok(df)
}

/// Load the store master file and canonicalize its column names.
pub fn load_stores(path: &Path) -> Result<DataFrame> {
    let df = read_parquet(path)?;
    require_columns(
        &df,
        &[
            store::RAW_ID,
            store::PREMISE,
            store::RAW_CATEGORY,
            store::ZIPCODE,
        ],
    )?;
    rename_columns(
        df,
        &[
            (store::RAW_ID, keys::STORE_ID),
            (store::RAW_CATEGORY, store::CATEGORY),
        ],
    )
}

/// Load the product master file and canonicalize its column names.
pub fn load_products(path: &Path) -> Result<DataFrame> {
    let df = read_parquet(path)?;
    require_columns(
        &df,
        &[
            product::RAW_ID,
            product::BRAND,
            product::RAW_CATEGORY,
            product::MANUFACTURER,
            product::SUBCATEGORY,
        ],
    )?;
    rename_columns(
        df,
        &[
            (product::RAW_ID, keys::PRODUCT_ID),
            (product::RAW_CATEGORY, product::CATEGORY),
        ],
    )
}

/// Load the raw transaction file and cast its measures to Float64.
pub fn load_transactions(path: &Path) -> Result<DataFrame> {
    let df = read_parquet(path)?;
    require_columns(
        &df,
        &[
            keys::STORE_ID,
            keys::PRODUCT_ID,
            transaction::DATE,
            transaction::QUANTITY,
            transaction::NET_VALUE,
            transaction::DISCOUNT,
        ],
    )?;
    let df = df
        .lazy()
        .with_columns([
            col(transaction::QUANTITY).cast(DataType::Float64),
            col(transaction::NET_VALUE).cast(DataType::Float64),
            col(transaction::DISCOUNT).cast(DataType::Float64),
        ])
        .collect()?;
    Ok(df)
}

/// Fail with the first absent column named.
pub fn require_columns(df: &DataFrame, required: &[&str]) -> Result<()> {
    for &name in required {
        if df.column(name).is_err() {
            return Err(PipelineError::MissingColumn(name.to_string()));
        }
    }
    Ok(())
}

fn rename_columns(df: DataFrame, pairs: &[(&str, &str)]) -> Result<DataFrame> {
    let old: Vec<&str> = pairs.iter().map(|(from, _)| *from).collect();
    let new: Vec<&str> = pairs.iter().map(|(_, to)| *to).collect();
    let df = df.lazy().rename(old, new, true).collect()?;
    Ok(df)
}

/// Write a table as a UTF-8 CSV with a header row, creating the
/// destination directory first.
pub(crate) fn write_csv(df: &mut DataFrame, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let file = File::create(path)?;
    CsvWriter::new(file).include_header(true).finish(df)?;
    Ok(())
}

pub(crate) fn is_numeric_dtype(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Float64
            | DataType::Float32
            | DataType::Int64
            | DataType::Int32
            | DataType::Int16
            | DataType::Int8
            | DataType::UInt64
            | DataType::UInt32
            | DataType::UInt16
            | DataType::UInt8
    )
}

/// Extract a numeric column as f64 values, nulls as zero.
pub fn column_as_f64(df: &DataFrame, name: &str) -> Result<Vec<f64>> {
    let column = df
        .column(name)
        .map_err(|_| PipelineError::MissingColumn(name.to_string()))?;
    let series = column.as_materialized_series();

    let values = match series.dtype() {
        DataType::Float64 => series.f64()?.into_iter().map(|v| v.unwrap_or(0.0)).collect(),
        DataType::Float32 => series
            .f32()?
            .into_iter()
            .map(|v| v.unwrap_or(0.0) as f64)
            .collect(),
        DataType::Int64 => series
            .i64()?
            .into_iter()
            .map(|v| v.unwrap_or(0) as f64)
            .collect(),
        DataType::Int32 => series
            .i32()?
            .into_iter()
            .map(|v| v.unwrap_or(0) as f64)
            .collect(),
        DataType::UInt64 => series
            .u64()?
            .into_iter()
            .map(|v| v.unwrap_or(0) as f64)
            .collect(),
        DataType::UInt32 => series
            .u32()?
            .into_iter()
            .map(|v| v.unwrap_or(0) as f64)
            .collect(),
        other => {
            return Err(PipelineError::DataError(format!(
                "Column '{}' has non-numeric type {:?}",
                name, other
            )))
        }
    };
    Ok(values)
}

/// Extract an integer column as i64 values; a null is a data error.
pub fn column_as_i64(df: &DataFrame, name: &str) -> Result<Vec<i64>> {
    let column = df
        .column(name)
        .map_err(|_| PipelineError::MissingColumn(name.to_string()))?;
    let series = column.as_materialized_series();

    let raw: Vec<Option<i64>> = match series.dtype() {
        DataType::Int64 => series.i64()?.into_iter().collect(),
        DataType::Int32 => series.i32()?.into_iter().map(|v| v.map(i64::from)).collect(),
        DataType::UInt64 => series
            .u64()?
            .into_iter()
            .map(|v| v.map(|v| v as i64))
            .collect(),
        DataType::UInt32 => series
            .u32()?
            .into_iter()
            .map(|v| v.map(i64::from))
            .collect(),
        other => {
            return Err(PipelineError::DataError(format!(
                "Column '{}' has non-integer type {:?}",
                name, other
            )))
        }
    };

    raw.into_iter()
        .map(|v| {
            v.ok_or_else(|| PipelineError::DataError(format!("Column '{}' contains nulls", name)))
        })
        .collect()
}

/// Extract a string column, preserving nulls.
pub fn column_as_opt_str(df: &DataFrame, name: &str) -> Result<Vec<Option<String>>> {
    let column = df
        .column(name)
        .map_err(|_| PipelineError::MissingColumn(name.to_string()))?;
    let series = column.as_materialized_series();

    match series.dtype() {
        DataType::String => Ok(series
            .str()?
            .into_iter()
            .map(|v| v.map(str::to_string))
            .collect()),
        other => Err(PipelineError::DataError(format!(
            "Column '{}' has non-string type {:?}",
            name, other
        ))),
    }
}

/// Extract a timestamp column as chrono values.
///
/// Accepts a native Datetime or Date column, or strings in one of the
/// accepted timestamp formats (date-only strings resolve to midnight).
/// A null or unparseable entry is a data error.
pub fn column_as_datetimes(df: &DataFrame, name: &str) -> Result<Vec<NaiveDateTime>> {
    let column = df
        .column(name)
        .map_err(|_| PipelineError::MissingColumn(name.to_string()))?;
    let series = column.as_materialized_series();

    match series.dtype() {
        DataType::String => series
            .str()?
            .into_iter()
            .map(|value| {
                let raw = value.ok_or_else(|| {
                    PipelineError::DataError(format!("Column '{}' contains null timestamps", name))
                })?;
                parse_timestamp(raw)
            })
            .collect(),
        DataType::Datetime(unit, _) => {
            let unit = *unit;
            series
                .datetime()?
                .physical()
                .into_iter()
                .map(|value| {
                    let ticks = value.ok_or_else(|| {
                        PipelineError::DataError(format!(
                            "Column '{}' contains null timestamps",
                            name
                        ))
                    })?;
                    let (secs, nanos) = match unit {
                        TimeUnit::Nanoseconds => (
                            ticks.div_euclid(1_000_000_000),
                            ticks.rem_euclid(1_000_000_000) as u32,
                        ),
                        TimeUnit::Microseconds => (
                            ticks.div_euclid(1_000_000),
                            (ticks.rem_euclid(1_000_000) * 1_000) as u32,
                        ),
                        TimeUnit::Milliseconds => (
                            ticks.div_euclid(1_000),
                            (ticks.rem_euclid(1_000) * 1_000_000) as u32,
                        ),
                    };
                    DateTime::from_timestamp(secs, nanos)
                        .map(|dt| dt.naive_utc())
                        .ok_or_else(|| {
                            PipelineError::DataError(format!(
                                "Timestamp out of range in column '{}': {}",
                                name, ticks
                            ))
                        })
                })
                .collect()
        }
        DataType::Date => series
            .date()?
            .physical()
            .into_iter()
            .map(|value| {
                let days = value.ok_or_else(|| {
                    PipelineError::DataError(format!("Column '{}' contains null dates", name))
                })?;
                NaiveDate::from_num_days_from_ce_opt(EPOCH_CE_DAYS + days)
                    .map(|date| date.and_time(NaiveTime::MIN))
                    .ok_or_else(|| {
                        PipelineError::DataError(format!(
                            "Date out of range in column '{}': {}",
                            name, days
                        ))
                    })
            })
            .collect(),
        other => Err(PipelineError::DataError(format!(
            "Column '{}' has non-temporal type {:?}",
            name, other
        ))),
    }
}

fn parse_timestamp(raw: &str) -> Result<NaiveDateTime> {
    for format in TIMESTAMP_FORMATS {
        if let Ok(stamp) = NaiveDateTime::parse_from_str(raw, format) {
            return Ok(stamp);
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Ok(date.and_time(NaiveTime::MIN));
    }
    Err(PipelineError::DataError(format!(
        "Unparseable timestamp: '{}'",
        raw
    )))
}
