//! Outlier capping module.
//!
//! Clips numeric columns into the precomputed bounds recorded at training time.

use crate::artifacts::OutlierBounds;
use crate::error::{Result, ResultExt};
use crate::types::{AdjustmentKind, ColumnAdjustment};
use crate::utils::{column_names, numeric_series};
use polars::prelude::*;
use tracing::debug;

/// Caps column values at their configured lower and upper bounds.
pub struct OutlierCapper;

impl OutlierCapper {
    /// Clip every value of every bounded column into `[lower, upper]`.
    ///
    /// Columns without a bound pass through unchanged. Missing cells stay
    /// missing. Each column is handled independently.
    pub fn apply(df: &mut DataFrame, bounds: &OutlierBounds) -> Result<Vec<ColumnAdjustment>> {
        let mut adjustments = Vec::new();

        for col_name in column_names(df) {
            let Some(bound) = bounds.get(&col_name) else {
                // Not a capped column.
                continue;
            };

            let series = numeric_series(df, &col_name)?;
            let values = series.f64()?;

            let (lower, upper) = (bound.lower(), bound.upper());
            let below = values
                .into_iter()
                .filter(|v| v.is_some_and(|val| val < lower))
                .count();
            let above = values
                .into_iter()
                .filter(|v| v.is_some_and(|val| val > upper))
                .count();

            let capped = values
                .apply(|v| v.map(|val| bound.clamp(val)))
                .into_series();
            df.replace(&col_name, capped)
                .context(format!("Capping '{}'", col_name))?;

            if below > 0 {
                adjustments.push(ColumnAdjustment::new(
                    col_name.clone(),
                    AdjustmentKind::CappedLower,
                    below,
                    lower,
                ));
            }
            if above > 0 {
                adjustments.push(ColumnAdjustment::new(
                    col_name.clone(),
                    AdjustmentKind::CappedUpper,
                    above,
                    upper,
                ));
            }
            if below + above > 0 {
                debug!(
                    "Capped {} values in '{}' to [{}, {}]",
                    below + above,
                    col_name,
                    lower,
                    upper
                );
            }
        }

        Ok(adjustments)
    }
}
