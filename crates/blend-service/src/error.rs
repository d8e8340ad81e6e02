//! Error type returned by the inference service.
//!
//! Every failure of a request surfaces as a single [`InferenceError`]; no
//! partial predictions are ever returned.

use crate::config::ConfigValidationError;
use blend_model::ModelError;
use blend_processing::ProcessingError;
use serde::Serialize;
use serde::ser::SerializeStruct;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum InferenceError {
    /// Startup artifacts failed to load; the service is degraded.
    #[error("Server not ready: {reason}")]
    ServerNotReady { reason: String },

    /// The request could not be read as a record set.
    #[error("Malformed input: {0}")]
    MalformedInput(String),

    /// The request has more rows than the configured limit.
    #[error("Input too large: {rows} rows exceeds the limit of {max_rows}")]
    InputTooLarge { rows: usize, max_rows: usize },

    /// The predictor returned a matrix of the wrong shape.
    #[error("Invalid prediction: {0}")]
    InvalidPrediction(String),

    /// Imputation, capping or feature engineering failed.
    #[error(transparent)]
    Processing(#[from] ProcessingError),

    /// Model loading or prediction failed.
    #[error(transparent)]
    Model(#[from] ModelError),

    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(#[from] ConfigValidationError),
}

impl InferenceError {
    /// Get a stable error code for this error.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::ServerNotReady { .. } => "SERVER_NOT_READY",
            Self::MalformedInput(_) => "MALFORMED_INPUT",
            Self::InputTooLarge { .. } => "INPUT_TOO_LARGE",
            Self::InvalidPrediction(_) => "INVALID_PREDICTION",
            Self::Processing(e) => e.error_code(),
            Self::Model(ModelError::ModelNotFound { .. }) => "MODEL_NOT_FOUND",
            Self::Model(ModelError::InvalidModel(_)) => "INVALID_MODEL",
            Self::Model(ModelError::FeatureMismatch(_)) => "FEATURE_MISMATCH",
            Self::Model(ModelError::InvalidInput(_)) => "INVALID_INPUT",
            Self::Model(_) => "MODEL_ERROR",
            Self::Polars(_) => "POLARS_ERROR",
            Self::Io(_) => "IO_ERROR",
            Self::InvalidConfig(_) => "INVALID_CONFIG",
        }
    }

    /// Whether the request itself is at fault, as opposed to the service.
    pub fn is_client_error(&self) -> bool {
        match self {
            Self::MalformedInput(_) | Self::InputTooLarge { .. } | Self::Polars(_) => true,
            Self::Processing(e) => e.is_input_error(),
            Self::Model(e) => e.is_input_error(),
            _ => false,
        }
    }
}

/// Errors are serialized as a struct with `code` and `message` fields.
impl Serialize for InferenceError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut state = serializer.serialize_struct("InferenceError", 2)?;
        state.serialize_field("code", &self.error_code())?;
        state.serialize_field("message", &self.to_string())?;
        state.end()
    }
}

pub type Result<T> = std::result::Result<T, InferenceError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        let err = InferenceError::ServerNotReady {
            reason: "model missing".to_string(),
        };
        assert_eq!(err.error_code(), "SERVER_NOT_READY");
        assert!(!err.is_client_error());

        let err = InferenceError::from(ModelError::FeatureMismatch("x".to_string()));
        assert_eq!(err.error_code(), "FEATURE_MISMATCH");
        assert!(err.is_client_error());
    }

    #[test]
    fn test_processing_errors_keep_their_code() {
        let err = InferenceError::from(ProcessingError::MalformedColumn {
            column: "Component1_fraction".to_string(),
            reason: "not a number".to_string(),
        });
        assert_eq!(err.error_code(), "MALFORMED_COLUMN");
        assert!(err.is_client_error());
        assert!(err.to_string().contains("Component1_fraction"));
    }

    #[test]
    fn test_serialization() {
        let err = InferenceError::InputTooLarge {
            rows: 20,
            max_rows: 10,
        };
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["code"], "INPUT_TOO_LARGE");
        assert_eq!(
            json["message"],
            "Input too large: 20 rows exceeds the limit of 10"
        );
    }
}
