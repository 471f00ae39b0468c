//! # Demand Forecast
//!
//! A Rust pipeline for weekly retail demand forecasting, in two batch
//! stages:
//!
//! - **Dataset Builder**: joins raw store, transaction, and product
//!   records, aggregates them to weekly grain per (store, product),
//!   derives lag and trailing-mean features, and writes a flat modeling
//!   table.
//! - **Evaluator**: loads a pretrained model bundle, aligns the held-out
//!   table's categorical features with the training-time encodings,
//!   predicts, reports WMAPE, and writes an actual-vs-predicted results
//!   table.
//!
//! The two stages communicate only through the table file on disk; each
//! runs as a zero-argument binary (`build_dataset`, `evaluate`) over the
//! fixed locations in [`config`].
//!
//! ## Quick Start
//!
//! ```no_run
//! use demand_forecast::config::BuilderConfig;
//! use demand_forecast::dataset::{build_weekly_dataset, write_dataset, RawSources};
//!
//! # fn main() -> demand_forecast::Result<()> {
//! let cfg = BuilderConfig::default();
//! let sources = RawSources::load(&cfg)?;
//! let mut weekly = build_weekly_dataset(&sources)?;
//! write_dataset(&mut weekly, &cfg.output)?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod data;
pub mod dataset;
pub mod error;
pub mod evaluate;
pub mod features;
pub mod metrics;
pub mod model;
pub mod schema;

// Re-export commonly used types
pub use crate::config::{BuilderConfig, EvaluatorConfig};
pub use crate::dataset::{build_weekly_dataset, write_dataset, RawSources};
pub use crate::error::{PipelineError, Result};
pub use crate::evaluate::{evaluate_dataset, read_dataset, write_results, Evaluation};
pub use crate::metrics::{wmape, EvaluationReport};
pub use crate::model::{ModelBundle, QuantityRegressor};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
