//! Forecast error metrics for the evaluation job.

use crate::error::{PipelineError, Result};

/// Keeps the denominator defined when every actual value is zero.
const WMAPE_EPSILON: f64 = 1e-10;

/// Weighted Mean Absolute Percentage Error: the sum of absolute errors
/// over the sum of absolute actuals.
pub fn wmape(actual: &[f64], predicted: &[f64]) -> Result<f64> {
    if actual.len() != predicted.len() {
        return Err(PipelineError::ValidationError(format!(
            "Actual and predicted lengths differ: {} vs {}",
            actual.len(),
            predicted.len()
        )));
    }

    let sum_abs_err: f64 = actual
        .iter()
        .zip(predicted)
        .map(|(a, p)| (a - p).abs())
        .sum();
    let sum_actual: f64 = actual.iter().map(|a| a.abs()).sum();
    Ok(sum_abs_err / (sum_actual + WMAPE_EPSILON))
}

/// Summary of one evaluation run.
#[derive(Debug, Clone)]
pub struct EvaluationReport {
    /// Number of scored rows.
    pub rows: usize,
    /// Weighted Mean Absolute Percentage Error over those rows.
    pub wmape: f64,
}

impl std::fmt::Display for EvaluationReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Evaluated {} rows", self.rows)?;
        write!(f, "Model performance (WMAPE): {:.4}", self.wmape)
    }
}
