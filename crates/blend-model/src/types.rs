//! Prediction and model metadata types.

use crate::error::{ModelError, Result};
use polars::prelude::*;
use serde::{Deserialize, Serialize};

/// Dense row-major prediction output: one row per input row, `n_cols` values per row.
#[derive(Debug, Clone, PartialEq)]
pub struct PredictionMatrix {
    values: Vec<f64>,
    n_rows: usize,
    n_cols: usize,
}

impl PredictionMatrix {
    /// Wrap row-major values. `values.len()` must equal `n_rows * n_cols`.
    pub fn new(values: Vec<f64>, n_rows: usize, n_cols: usize) -> Result<Self> {
        if values.len() != n_rows * n_cols {
            return Err(ModelError::InvalidInput(format!(
                "prediction buffer holds {} values, expected {} rows x {} columns",
                values.len(),
                n_rows,
                n_cols
            )));
        }
        Ok(Self {
            values,
            n_rows,
            n_cols,
        })
    }

    /// Build from per-row vectors. All rows must have the same width.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self> {
        let n_rows = rows.len();
        let n_cols = rows.first().map_or(0, Vec::len);
        let mut values = Vec::with_capacity(n_rows * n_cols);
        for (i, row) in rows.into_iter().enumerate() {
            if row.len() != n_cols {
                return Err(ModelError::InvalidInput(format!(
                    "prediction row {} has {} values, expected {}",
                    i,
                    row.len(),
                    n_cols
                )));
            }
            values.extend(row);
        }
        Self::new(values, n_rows, n_cols)
    }

    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    pub fn n_cols(&self) -> usize {
        self.n_cols
    }

    /// Values of one row.
    pub fn row(&self, row: usize) -> &[f64] {
        &self.values[row * self.n_cols..(row + 1) * self.n_cols]
    }

    /// Values of one output column, top to bottom.
    pub fn column(&self, col: usize) -> Vec<f64> {
        (0..self.n_rows)
            .map(|row| self.values[row * self.n_cols + col])
            .collect()
    }

    /// Convert into a DataFrame with one `Float64` column per output.
    pub fn to_dataframe(&self, column_names: &[String]) -> Result<DataFrame> {
        if column_names.len() != self.n_cols {
            return Err(ModelError::InvalidInput(format!(
                "{} column names given for {} prediction columns",
                column_names.len(),
                self.n_cols
            )));
        }

        let columns: Vec<Column> = column_names
            .iter()
            .enumerate()
            .map(|(col, name)| Column::new(name.as_str().into(), self.column(col)))
            .collect();

        Ok(DataFrame::new(columns)?)
    }
}

/// Metadata about a loaded model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelInfo {
    /// Kind of model (e.g. `"random_forest"`).
    pub model_type: String,
    /// Number of trees in the ensemble.
    pub n_estimators: usize,
    /// Number of outputs per row.
    pub n_outputs: usize,
    /// Feature names in training order.
    pub feature_names: Vec<String>,
}
