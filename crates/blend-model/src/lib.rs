//! blend-model: multi-output regression models for blend property inference.
//!
//! This crate loads a trained model artifact and scores an engineered feature
//! matrix in bulk, producing one row of property predictions per input row.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use blend_model::{ForestModel, Predictor};
//!
//! let model = ForestModel::load("random_forest_multioutput.json")?;
//! let predictions = model.predict(&features)?;
//!
//! assert_eq!(predictions.n_rows(), features.height());
//! assert_eq!(predictions.n_cols(), model.n_outputs());
//! ```
//!
//! # Architecture
//!
//! ```text
//! features (DataFrame) ──► check_feature_names ──► FeatureMatrix ──► Predictor ──► PredictionMatrix
//! ```
//!
//! [`Predictor`] is the seam the inference service depends on. [`ForestModel`]
//! is the bundled backend; tests substitute lightweight stubs.
//!
//! # Error Handling
//!
//! All fallible operations return [`Result<T, ModelError>`]:
//!
//! - [`ModelError::ModelNotFound`] - The model file does not exist
//! - [`ModelError::InvalidModel`] - The artifact describes an unusable model
//! - [`ModelError::FeatureMismatch`] - Feature names or order differ from training
//! - [`ModelError::InvalidInput`] - Missing, NaN or non-numeric feature values
//!
//! # Thread Safety
//!
//! Loaded models are immutable. A single instance can be wrapped in an `Arc`
//! and shared by any number of concurrent callers. [`ForestModel`] scores rows
//! in parallel on the rayon global pool.

mod error;
mod forest;
mod predictor;
mod types;

// Re-export public API
//
// Error types
pub use error::{ModelError, Result};
// Model backends
pub use forest::{ForestModel, Node, Tree};
// Prediction capability
pub use predictor::{FeatureMatrix, Predictor, check_feature_names};
// Output and metadata types
pub use types::{ModelInfo, PredictionMatrix};
