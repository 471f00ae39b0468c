//! Pretrained model bundle: regressor plus categorical encodings.
//!
//! Training happens offline; this crate only consumes the resulting
//! asset. The bundle is a JSON file carrying the regressor and, for each
//! categorical feature, the exact set of category values the model was
//! fitted against.

use crate::data::{column_as_f64, column_as_opt_str};
use crate::error::{PipelineError, Result};
use polars::prelude::DataFrame;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Linear regressor over numeric features and categorical level weights.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuantityRegressor {
    /// Feature columns the model was trained on, in training order.
    features: Vec<String>,
    intercept: f64,
    /// Weight per numeric feature column.
    numeric_weights: BTreeMap<String, f64>,
    /// Weight per category level, per categorical feature column.
    category_weights: BTreeMap<String, BTreeMap<String, f64>>,
}

impl QuantityRegressor {
    /// Create a regressor, verifying every weighted column is declared in
    /// the feature list.
    pub fn new(
        features: Vec<String>,
        intercept: f64,
        numeric_weights: BTreeMap<String, f64>,
        category_weights: BTreeMap<String, BTreeMap<String, f64>>,
    ) -> Result<Self> {
        let model = Self {
            features,
            intercept,
            numeric_weights,
            category_weights,
        };
        model.validate()?;
        Ok(model)
    }

    /// Feature columns the model requires, in training order.
    pub fn feature_names(&self) -> &[String] {
        &self.features
    }

    /// Categorical feature columns the model carries level weights for.
    pub fn categorical_features(&self) -> impl Iterator<Item = &str> {
        self.category_weights.keys().map(String::as_str)
    }

    /// Predict one quantity per row of a prepared feature table.
    ///
    /// Numeric features contribute weight times value; categorical
    /// features contribute the weight of the observed level. A null or
    /// unknown level contributes nothing.
    pub fn predict(&self, features: &DataFrame) -> Result<Vec<f64>> {
        let mut predictions = vec![self.intercept; features.height()];

        for (name, weight) in &self.numeric_weights {
            let values = column_as_f64(features, name)?;
            for (prediction, value) in predictions.iter_mut().zip(values) {
                *prediction += weight * value;
            }
        }

        for (name, levels) in &self.category_weights {
            let values = column_as_opt_str(features, name)?;
            for (prediction, value) in predictions.iter_mut().zip(values) {
                if let Some(weight) = value.as_deref().and_then(|level| levels.get(level)) {
                    *prediction += weight;
                }
            }
        }

        Ok(predictions)
    }

    fn validate(&self) -> Result<()> {
        let weighted = self
            .numeric_weights
            .keys()
            .chain(self.category_weights.keys());
        for name in weighted {
            if !self.features.iter().any(|feature| feature == name) {
                return Err(PipelineError::ModelError(format!(
                    "Weighted column '{}' is not in the declared feature list",
                    name
                )));
            }
        }
        Ok(())
    }
}

/// Serialized model asset: the trained regressor and, per categorical
/// column, the category values seen at training time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelBundle {
    pub model: QuantityRegressor,
    /// Allowed category values per categorical column, in training order.
    pub categories: BTreeMap<String, Vec<String>>,
}

impl ModelBundle {
    /// Load a bundle from its JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)?;
        let bundle: ModelBundle = serde_json::from_str(&raw)?;
        bundle.model.validate()?;
        Ok(bundle)
    }

    /// Write the bundle as JSON, creating the destination directory if
    /// absent. The training side uses this; the tests use it to fabricate
    /// fixtures.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let raw = serde_json::to_string_pretty(self)?;
        fs::write(path, raw)?;
        Ok(())
    }
}
