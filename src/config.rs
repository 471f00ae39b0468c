//! Fixed file locations for the two batch jobs.
//!
//! Neither job takes arguments, flags, or environment configuration; the
//! defaults below are the contract. Tests point the same structs at
//! temporary directories.

use std::path::{Path, PathBuf};

/// File locations for the Dataset Builder job.
#[derive(Debug, Clone)]
pub struct BuilderConfig {
    /// Store master data (Parquet)
    pub stores: PathBuf,
    /// Raw transaction records (Parquet)
    pub transactions: PathBuf,
    /// Product master data (Parquet)
    pub products: PathBuf,
    /// Destination of the weekly modeling table (CSV)
    pub output: PathBuf,
}

impl Default for BuilderConfig {
    fn default() -> Self {
        Self {
            stores: PathBuf::from("data/raw/stores.parquet"),
            transactions: PathBuf::from("data/raw/transactions.parquet"),
            products: PathBuf::from("data/raw/products.parquet"),
            output: PathBuf::from("data/weekly_dataset.csv"),
        }
    }
}

impl BuilderConfig {
    /// Raw source paths that are absent on disk, in load order.
    pub fn missing_inputs(&self) -> Vec<&Path> {
        [
            self.stores.as_path(),
            self.transactions.as_path(),
            self.products.as_path(),
        ]
        .into_iter()
        .filter(|path| !path.exists())
        .collect()
    }
}

/// File locations for the Evaluator job.
#[derive(Debug, Clone)]
pub struct EvaluatorConfig {
    /// Serialized model bundle (JSON)
    pub model: PathBuf,
    /// Evaluation table with the ground-truth quantity column (CSV)
    pub dataset: PathBuf,
    /// Destination of the actual-vs-predicted results table (CSV)
    pub results: PathBuf,
}

impl Default for EvaluatorConfig {
    fn default() -> Self {
        Self {
            model: PathBuf::from("models/model.json"),
            dataset: PathBuf::from("data/weekly_dataset.csv"),
            results: PathBuf::from("results/evaluation_results.csv"),
        }
    }
}

impl EvaluatorConfig {
    /// Input paths that are absent on disk, in load order.
    pub fn missing_inputs(&self) -> Vec<&Path> {
        [self.model.as_path(), self.dataset.as_path()]
            .into_iter()
            .filter(|path| !path.exists())
            .collect()
    }
}
