//! Feature pipeline executor.
//!
//! Runs imputation, outlier capping and feature engineering in that order
//! against a borrowed set of precomputed artifacts.

use crate::artifacts::{ImputationMeans, OutlierBounds};
use crate::error::{Result, ResultExt};
use crate::imputers::MeanImputer;
use crate::pipeline::features::FeatureEngineer;
use crate::pipeline::outliers::OutlierCapper;
use crate::schema::is_fraction_column;
use crate::types::TransformSummary;
use crate::utils::column_names;
use polars::prelude::*;
use tracing::{debug, info};

/// The model input produced by [`FeaturePipeline::transform`].
#[derive(Debug, Clone)]
pub struct FeatureOutput {
    pub features: DataFrame,
    pub summary: TransformSummary,
}

/// Sequences the three transformation steps.
///
/// Holds only shared references; the same artifacts can back any number of
/// pipelines on any number of threads.
#[derive(Debug, Clone, Copy)]
pub struct FeaturePipeline<'a> {
    means: &'a ImputationMeans,
    bounds: &'a OutlierBounds,
}

impl<'a> FeaturePipeline<'a> {
    pub fn new(means: &'a ImputationMeans, bounds: &'a OutlierBounds) -> Self {
        Self { means, bounds }
    }

    /// Impute, cap and engineer a feature-bearing record set.
    ///
    /// The input must already have its identifier column removed. Row order is
    /// preserved.
    pub fn transform(&self, mut df: DataFrame) -> Result<FeatureOutput> {
        let mut summary = TransformSummary::new();
        summary.rows = df.height();
        summary.columns_before = df.width();

        debug!("Imputing missing values...");
        summary.imputations =
            MeanImputer::apply(&mut df, self.means).context("Imputation failed")?;

        debug!("Capping outliers...");
        summary.cappings =
            OutlierCapper::apply(&mut df, self.bounds).context("Outlier capping failed")?;

        debug!("Engineering features...");
        let features = FeatureEngineer::engineer(&df).context("Feature engineering failed")?;

        summary.feature_columns = column_names(&features);
        summary.fraction_columns = summary
            .feature_columns
            .iter()
            .filter(|name| is_fraction_column(name))
            .cloned()
            .collect();
        summary.remaining_missing = features
            .get_columns()
            .iter()
            .map(|col| col.null_count())
            .sum();

        info!(
            "Feature pipeline: {} rows, {} values imputed, {} values capped, {} features",
            summary.rows,
            summary.values_imputed(),
            summary.values_capped(),
            features.width()
        );

        Ok(FeatureOutput { features, summary })
    }
}
