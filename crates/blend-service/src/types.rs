//! Result types returned by an inference run.

use blend_processing::{ColumnAdjustment, TransformSummary};
use chrono::{DateTime, Utc};
use polars::prelude::DataFrame;
use serde::{Deserialize, Serialize};

/// Predictions for one record set.
#[derive(Debug, Clone)]
pub struct PredictionOutput {
    /// `[ID?, BlendProperty1..BlendProperty10]`, one row per input row.
    pub predictions: DataFrame,
    pub summary: RunSummary,
}

/// What one inference run did.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    /// When the run finished.
    pub completed_at: DateTime<Utc>,
    /// Source of the record set, when known (e.g. the input file).
    pub source: Option<String>,
    pub rows_in: usize,
    pub columns_in: usize,
    pub rows_out: usize,
    pub columns_out: usize,
    /// Identifier column passed through, if the input had one.
    pub id_column: Option<String>,
    pub imputations: Vec<ColumnAdjustment>,
    pub cappings: Vec<ColumnAdjustment>,
    /// Model input columns, in order.
    pub feature_columns: Vec<String>,
    pub duration_ms: u64,
}

impl RunSummary {
    pub(crate) fn from_transform(
        transform: TransformSummary,
        columns_in: usize,
        id_column: Option<String>,
    ) -> Self {
        Self {
            completed_at: Utc::now(),
            source: None,
            rows_in: transform.rows,
            columns_in,
            rows_out: 0,
            columns_out: 0,
            id_column,
            imputations: transform.imputations,
            cappings: transform.cappings,
            feature_columns: transform.feature_columns,
            duration_ms: 0,
        }
    }

    /// Attach the name of the record set's source.
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    pub fn values_imputed(&self) -> usize {
        self.imputations.iter().map(|a| a.count).sum()
    }

    pub fn values_capped(&self) -> usize {
        self.cappings.iter().map(|a| a.count).sum()
    }
}
