//! Summary types describing what the transformation steps did.

use serde::{Deserialize, Serialize};

/// Kind of change applied to a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdjustmentKind {
    /// Missing values were filled with the column's imputation mean.
    Imputed,
    /// Values below the lower bound were raised to it.
    CappedLower,
    /// Values above the upper bound were lowered to it.
    CappedUpper,
}

impl AdjustmentKind {
    /// Get a human-readable display name for the adjustment.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Imputed => "Imputed",
            Self::CappedLower => "Capped at lower bound",
            Self::CappedUpper => "Capped at upper bound",
        }
    }
}

/// A change applied to the values of a single column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnAdjustment {
    pub column: String,
    pub kind: AdjustmentKind,
    /// Number of cells that changed.
    pub count: usize,
    /// The fill value or bound the cells were set to.
    pub value: f64,
}

impl ColumnAdjustment {
    pub fn new(column: impl Into<String>, kind: AdjustmentKind, count: usize, value: f64) -> Self {
        Self {
            column: column.into(),
            kind,
            count,
            value,
        }
    }
}

/// Summary of one pass through the feature pipeline.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TransformSummary {
    /// Number of rows in (and out of) the pipeline.
    pub rows: usize,
    /// Number of feature-bearing columns before engineering.
    pub columns_before: usize,
    /// Columns that received an imputation.
    pub imputations: Vec<ColumnAdjustment>,
    /// Columns that had values clipped.
    pub cappings: Vec<ColumnAdjustment>,
    /// Fraction columns carried into the model input, in order.
    pub fraction_columns: Vec<String>,
    /// Final model input column names, in order.
    pub feature_columns: Vec<String>,
    /// Missing cells left in the model input.
    pub remaining_missing: usize,
}

impl TransformSummary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of cells filled by the imputer.
    pub fn values_imputed(&self) -> usize {
        self.imputations.iter().map(|a| a.count).sum()
    }

    /// Total number of cells clipped by the outlier capper.
    pub fn values_capped(&self) -> usize {
        self.cappings.iter().map(|a| a.count).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_totals() {
        let mut summary = TransformSummary::new();
        summary
            .imputations
            .push(ColumnAdjustment::new("a", AdjustmentKind::Imputed, 3, 0.5));
        summary
            .cappings
            .push(ColumnAdjustment::new("b", AdjustmentKind::CappedLower, 2, -1.0));
        summary
            .cappings
            .push(ColumnAdjustment::new("b", AdjustmentKind::CappedUpper, 1, 1.0));

        assert_eq!(summary.values_imputed(), 3);
        assert_eq!(summary.values_capped(), 3);
    }

    #[test]
    fn test_adjustment_kind_serialization() {
        let json = serde_json::to_string(&AdjustmentKind::CappedUpper).unwrap();
        assert_eq!(json, "\"capped_upper\"");
    }
}
