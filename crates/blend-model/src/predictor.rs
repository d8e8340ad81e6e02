//! The bulk-prediction capability consumed by the inference pipeline.
//!
//! Any model backend that can score a whole feature matrix at once satisfies
//! [`Predictor`]. The pipeline never reconciles feature layouts itself: a
//! backend that knows its training columns rejects anything else.

use crate::error::{ModelError, Result};
use crate::types::PredictionMatrix;
use polars::prelude::*;
use std::fmt;

/// A loaded, immutable multi-output regression model.
///
/// Implementations must be deterministic and must not mutate themselves while
/// predicting; a single instance is shared by every concurrent request.
pub trait Predictor: Send + Sync + fmt::Debug {
    /// Number of values produced per input row.
    fn n_outputs(&self) -> usize;

    /// Feature names the model was trained on, in order, when known.
    fn feature_names(&self) -> Option<&[String]> {
        None
    }

    /// Score every row of `features`. Returns one prediction row per input row.
    fn predict(&self, features: &DataFrame) -> Result<PredictionMatrix>;
}

/// Check that `features` has exactly the expected columns in the expected order.
pub fn check_feature_names(features: &DataFrame, expected: &[String]) -> Result<()> {
    let found: Vec<String> = features
        .get_column_names()
        .iter()
        .map(|s| s.to_string())
        .collect();
    if found == expected {
        return Ok(());
    }

    let missing: Vec<&str> = expected
        .iter()
        .filter(|name| !found.contains(name))
        .map(String::as_str)
        .collect();
    let unexpected: Vec<&str> = found
        .iter()
        .filter(|name| !expected.contains(name))
        .map(String::as_str)
        .collect();

    let message = if missing.is_empty() && unexpected.is_empty() {
        format!(
            "feature order differs from training order; expected {:?}, got {:?}",
            expected, found
        )
    } else {
        format!(
            "missing features {:?}, unexpected features {:?}",
            missing, unexpected
        )
    };
    Err(ModelError::FeatureMismatch(message))
}

/// Row-major copy of a feature DataFrame, validated for scoring.
///
/// Every cell must be present and finite.
#[derive(Debug, Clone)]
pub struct FeatureMatrix {
    values: Vec<f64>,
    n_rows: usize,
    n_cols: usize,
}

impl FeatureMatrix {
    pub fn from_dataframe(df: &DataFrame) -> Result<Self> {
        let (n_rows, n_cols) = df.shape();
        let mut values = vec![0.0; n_rows * n_cols];

        for (col_idx, column) in df.get_columns().iter().enumerate() {
            let name = column.name().to_string();
            let series = column
                .as_materialized_series()
                .strict_cast(&DataType::Float64)
                .map_err(|e| {
                    ModelError::InvalidInput(format!("column '{}' is not numeric: {}", name, e))
                })?;

            for (row_idx, value) in series.f64()?.into_iter().enumerate() {
                match value {
                    Some(v) if v.is_finite() => values[row_idx * n_cols + col_idx] = v,
                    _ => {
                        return Err(ModelError::InvalidInput(format!(
                            "input contains NaN, infinity or a missing value in column '{}' (row {})",
                            name, row_idx
                        )));
                    }
                }
            }
        }

        Ok(Self {
            values,
            n_rows,
            n_cols,
        })
    }

    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    pub fn n_cols(&self) -> usize {
        self.n_cols
    }

    #[inline]
    pub fn row(&self, row: usize) -> &[f64] {
        &self.values[row * self.n_cols..(row + 1) * self.n_cols]
    }
}
