//! Imputation module for handling missing values.
//!
//! Missing cells are filled from precomputed per-column means; columns without
//! a recorded mean keep their missing values.

mod mean;

pub use mean::MeanImputer;
