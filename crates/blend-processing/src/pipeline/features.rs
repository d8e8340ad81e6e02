//! Weighted-average feature engineering.
//!
//! For every property index `p` the engineer sums
//! `Component{j}_fraction * Component{j}_Property{p}` over all components `j`
//! whose fraction and property columns are both present, producing
//! `WeightedAvg_Property{p}`. The model input is every fraction column in its
//! original order followed by the ten weighted averages.
//!
//! Index ranges are fixed by [`COMPONENT_COUNT`] and [`PROPERTY_COUNT`], not
//! derived from the data: all ten weighted averages are always emitted, even
//! when no component contributes to them.

use crate::error::{Result, ResultExt};
use crate::schema::{
    COMPONENT_COUNT, PROPERTY_COUNT, fraction_column, is_fraction_column, property_column,
    weighted_avg_column,
};
use crate::utils::{column_names, optional_numeric_series};
use polars::prelude::*;
use tracing::debug;

/// Builds the model feature matrix from a cleaned record set.
pub struct FeatureEngineer;

impl FeatureEngineer {
    /// Select fraction columns and derive the weighted-average columns.
    ///
    /// Missing pairs contribute nothing. A missing cell inside a present pair
    /// makes that row's weighted average missing.
    pub fn engineer(df: &DataFrame) -> Result<DataFrame> {
        let height = df.height();
        let fraction_cols: Vec<String> = column_names(df)
            .into_iter()
            .filter(|name| is_fraction_column(name))
            .collect();

        let mut columns: Vec<Column> = Vec::with_capacity(fraction_cols.len() + PROPERTY_COUNT);
        for name in &fraction_cols {
            columns.push(df.column(name)?.clone());
        }

        for property in 1..=PROPERTY_COUNT {
            let weighted = Self::weighted_average(df, property, height)?;
            columns.push(weighted.into_series().into_column());
        }

        debug!(
            "Engineered {} features ({} fraction columns) for {} rows",
            columns.len(),
            fraction_cols.len(),
            height
        );

        DataFrame::new(columns).context("Assembling feature matrix")
    }

    /// Sum of `fraction * property` over the components that carry both columns.
    fn weighted_average(df: &DataFrame, property: usize, height: usize) -> Result<Float64Chunked> {
        let name = weighted_avg_column(property);
        let mut accumulator = Float64Chunked::full(name.as_str().into(), 0.0, height);

        for component in 1..=COMPONENT_COUNT {
            let fraction = optional_numeric_series(df, &fraction_column(component))?;
            let value = optional_numeric_series(df, &property_column(component, property))?;

            let (Some(fraction), Some(value)) = (fraction, value) else {
                // Absent pair: zero contribution.
                continue;
            };

            let contribution = fraction.f64()? * value.f64()?;
            accumulator = &accumulator + &contribution;
        }

        accumulator.rename(name.as_str().into());
        Ok(accumulator)
    }
}
