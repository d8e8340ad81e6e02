//! Feature transformation pipeline.
//!
//! This module contains the three transformation steps and the executor that
//! sequences them.

pub mod executor;
pub mod features;
pub mod outliers;

pub use executor::{FeatureOutput, FeaturePipeline};
pub use features::FeatureEngineer;
pub use outliers::OutlierCapper;
