//! Custom error types for the feature transformation pipeline.
//!
//! This module provides the error hierarchy using `thiserror` for the
//! imputation, outlier capping and feature engineering steps, as well as for
//! loading the precomputed means and bounds artifacts.
//!
//! Errors are serializable so that an outer layer can hand them to a client
//! as a `{code, message}` pair.

use serde::Serialize;
use serde::ser::SerializeStruct;
use thiserror::Error;

/// The main error type for the feature transformation pipeline.
#[derive(Error, Debug)]
pub enum ProcessingError {
    /// A column that has to be numeric could not be interpreted as numbers.
    #[error("Column '{column}' is not numeric: {reason}")]
    MalformedColumn { column: String, reason: String },

    /// An artifact file does not exist.
    #[error("Artifact not found: {0}")]
    ArtifactNotFound(String),

    /// An artifact was readable but its content is unusable.
    #[error("Invalid artifact '{name}': {reason}")]
    InvalidArtifact { name: String, reason: String },

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Polars error wrapper.
    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error with context.
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<ProcessingError>,
    },
}

impl ProcessingError {
    /// Add context to an error.
    pub fn with_context(self, context: impl Into<String>) -> Self {
        ProcessingError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Get a stable error code for callers that branch on the failure kind.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::MalformedColumn { .. } => "MALFORMED_COLUMN",
            Self::ArtifactNotFound(_) => "ARTIFACT_NOT_FOUND",
            Self::InvalidArtifact { .. } => "INVALID_ARTIFACT",
            Self::Io(_) => "IO_ERROR",
            Self::Polars(_) => "POLARS_ERROR",
            Self::Json(_) => "JSON_ERROR",
            Self::WithContext { source, .. } => source.error_code(),
        }
    }

    /// Check if this error was caused by the shape or content of the input data
    /// rather than by the loaded artifacts.
    pub fn is_input_error(&self) -> bool {
        match self {
            Self::MalformedColumn { .. } | Self::Polars(_) => true,
            Self::WithContext { source, .. } => source.is_input_error(),
            _ => false,
        }
    }
}

/// Errors are serialized as a struct with `code` and `message` fields.
impl Serialize for ProcessingError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut state = serializer.serialize_struct("ProcessingError", 2)?;
        state.serialize_field("code", &self.error_code())?;
        state.serialize_field("message", &self.to_string())?;
        state.end()
    }
}

/// Result type alias for processing operations.
pub type Result<T> = std::result::Result<T, ProcessingError>;

/// Extension trait for adding context to Results.
pub trait ResultExt<T> {
    /// Add context to an error result.
    fn context(self, context: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, polars::error::PolarsError> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| ProcessingError::Polars(e).with_context(context))
    }
}
