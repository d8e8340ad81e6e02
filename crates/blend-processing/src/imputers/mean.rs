//! Mean imputation from precomputed fill values.

use crate::artifacts::ImputationMeans;
use crate::error::{Result, ResultExt};
use crate::types::{AdjustmentKind, ColumnAdjustment};
use crate::utils::{column_names, numeric_series};
use polars::prelude::*;
use tracing::debug;

/// Fills missing values using the means recorded at training time.
pub struct MeanImputer;

impl MeanImputer {
    /// Fill every missing cell of every column that has a recorded mean.
    ///
    /// Columns without an entry in `means` are left exactly as they are,
    /// including their missing cells. Returns one adjustment per column that
    /// actually had cells filled.
    pub fn apply(df: &mut DataFrame, means: &ImputationMeans) -> Result<Vec<ColumnAdjustment>> {
        let mut adjustments = Vec::new();

        for col_name in column_names(df) {
            let Some(fill_value) = means.get(&col_name) else {
                // No recorded mean: pass through unchanged.
                continue;
            };

            let series = numeric_series(df, &col_name)?;
            let missing = series.null_count();
            if missing == 0 {
                continue;
            }

            let filled = series
                .f64()?
                .apply(|v| Some(v.unwrap_or(fill_value)))
                .into_series();
            df.replace(&col_name, filled)
                .context(format!("Imputing '{}'", col_name))?;

            debug!(
                "Filled '{}' with mean {:.4}: {} values",
                col_name, fill_value, missing
            );
            adjustments.push(ColumnAdjustment::new(
                col_name,
                AdjustmentKind::Imputed,
                missing,
                fill_value,
            ));
        }

        Ok(adjustments)
    }
}
