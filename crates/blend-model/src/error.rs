//! Error types for the blend-model crate.
//!
//! This module defines [`ModelError`], the error type returned by model
//! loading and prediction.

use thiserror::Error;

/// The main error type for blend-model operations.
///
/// This enum is marked `#[non_exhaustive]` to allow adding new variants
/// without breaking downstream code.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum ModelError {
    /// The specified model file was not found.
    #[error("Model not found: {path}")]
    ModelNotFound {
        /// The path that was not found.
        path: String,
    },

    /// The model artifact parsed but describes an unusable model.
    ///
    /// Common causes:
    /// - No trees, or a tree with no nodes
    /// - A split that points outside the tree or backwards
    /// - A leaf whose width differs from `n_outputs`
    #[error("Invalid model: {0}")]
    InvalidModel(String),

    /// The feature matrix columns differ from the ones the model was trained on.
    ///
    /// Names and order must match exactly.
    #[error("Feature names mismatch: {0}")]
    FeatureMismatch(String),

    /// The feature matrix contains values the model cannot score.
    ///
    /// Common causes:
    /// - Missing values that were never imputed
    /// - NaN or infinite values
    /// - Non-numeric columns
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Polars error while reading the feature matrix.
    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    /// The model file is not valid JSON or does not match the model schema.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error during model load/save.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ModelError {
    /// Whether the error was caused by the feature matrix passed to `predict`
    /// rather than by the model artifact itself.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            Self::FeatureMismatch(_) | Self::InvalidInput(_) | Self::Polars(_)
        )
    }
}

/// Result type alias for model operations.
pub type Result<T> = std::result::Result<T, ModelError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let err = ModelError::ModelNotFound {
            path: "random_forest_multioutput.json".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Model not found: random_forest_multioutput.json"
        );
    }

    #[test]
    fn test_is_input_error() {
        assert!(ModelError::InvalidInput("NaN".to_string()).is_input_error());
        assert!(ModelError::FeatureMismatch("x".to_string()).is_input_error());
        assert!(!ModelError::InvalidModel("no trees".to_string()).is_input_error());
    }
}
