//! Error types for the demand_forecast crate

use thiserror::Error;

/// Custom error types for the demand_forecast crate
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Error related to data loading or table contents
    #[error("Data error: {0}")]
    DataError(String),

    /// A required column is absent from an input table
    #[error("Missing column: {0}")]
    MissingColumn(String),

    /// Error related to parameter or input validation
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Error related to the model bundle
    #[error("Model error: {0}")]
    ModelError(String),

    /// Error from IO operations
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Error from Polars operations
    #[error("Polars error: {0}")]
    PolarsError(String),

    /// Error from (de)serializing the model bundle
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// Result type with our custom error
pub type Result<T> = std::result::Result<T, PipelineError>;

impl From<polars::prelude::PolarsError> for PipelineError {
    fn from(err: polars::prelude::PolarsError) -> Self {
        PipelineError::PolarsError(err.to_string())
    }
}
