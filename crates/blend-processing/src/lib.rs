//! Feature transformation library for fuel blend datasets.
//!
//! Turns a raw record set of blend components into the feature matrix a
//! property-prediction model was trained on.
//!
//! # Overview
//!
//! - **Imputation**: missing cells are filled with precomputed per-column means
//! - **Outlier Capping**: values are clipped into precomputed per-column bounds
//! - **Feature Engineering**: `WeightedAvg_Property{p}` is derived from every
//!   `Component{j}_fraction` / `Component{j}_Property{p}` pair
//!
//! Means and bounds are loaded once and borrowed by every run. Columns without
//! a mean or bound, and component pairs that are not in the data, are skipped
//! rather than treated as errors.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use blend_processing::{FeaturePipeline, ImputationMeans, OutlierBounds};
//!
//! let means = ImputationMeans::from_json_file("imputation_means.json")?;
//! let bounds = OutlierBounds::from_json_file("outlier_bounds.json")?;
//!
//! let output = FeaturePipeline::new(&means, &bounds).transform(df)?;
//! println!("{} features, {} values imputed",
//!     output.features.width(),
//!     output.summary.values_imputed());
//! ```

pub mod artifacts;
pub mod error;
pub mod imputers;
pub mod pipeline;
pub mod schema;
pub mod types;
pub mod utils;

// Re-exports for convenient access
pub use artifacts::{Bound, ImputationMeans, OutlierBounds};
pub use error::{ProcessingError, Result as ProcessingResult, ResultExt};
pub use imputers::MeanImputer;
pub use pipeline::{FeatureEngineer, FeatureOutput, FeaturePipeline, OutlierCapper};
pub use types::{AdjustmentKind, ColumnAdjustment, TransformSummary};
pub use utils::{column_names, numeric_series, optional_numeric_series};
