//! Configuration for the inference service.
//!
//! This module provides the artifact locations and request limits, using the
//! builder pattern for programmatic setup and serde for config files.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Configuration for the inference service.
///
/// Use [`ServiceConfig::builder()`] to create a configuration with a fluent
/// API, or [`ServiceConfig::from_json_file`] to read one from disk. Fields
/// missing from a config file take their defaults.
///
/// # Example
///
/// ```rust,ignore
/// use blend_service::ServiceConfig;
///
/// let config = ServiceConfig::builder()
///     .model_path("artifacts/random_forest_multioutput.json")
///     .max_rows(100_000)
///     .build()?;
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Path to the serialized forest model.
    /// Default: "random_forest_multioutput.json"
    pub model_path: PathBuf,

    /// Path to the per-column outlier bounds.
    /// Default: "outlier_bounds.json"
    pub bounds_path: PathBuf,

    /// Path to the per-column imputation means.
    /// Default: "imputation_means.json"
    pub means_path: PathBuf,

    /// Identifier column passed through to the output.
    /// Default: "ID"
    pub id_column: String,

    /// Largest record set accepted per request. `None` means unlimited.
    /// Default: None
    pub max_rows: Option<usize>,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            model_path: PathBuf::from("random_forest_multioutput.json"),
            bounds_path: PathBuf::from("outlier_bounds.json"),
            means_path: PathBuf::from("imputation_means.json"),
            id_column: blend_processing::schema::DEFAULT_ID_COLUMN.to_string(),
            max_rows: None,
        }
    }
}

impl ServiceConfig {
    /// Create a new configuration builder.
    pub fn builder() -> ServiceConfigBuilder {
        ServiceConfigBuilder::default()
    }

    /// Read a configuration from a JSON file and validate it.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigValidationError> {
        let path = path.as_ref();
        let unreadable = |reason: String| ConfigValidationError::Unreadable {
            path: path.display().to_string(),
            reason,
        };

        let json = std::fs::read_to_string(path).map_err(|e| unreadable(e.to_string()))?;
        let config: Self = serde_json::from_str(&json).map_err(|e| unreadable(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration and return errors if invalid.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        for (field, path) in [
            ("model_path", &self.model_path),
            ("bounds_path", &self.bounds_path),
            ("means_path", &self.means_path),
        ] {
            if path.as_os_str().is_empty() {
                return Err(ConfigValidationError::EmptyPath(field.to_string()));
            }
        }

        if self.id_column.trim().is_empty() {
            return Err(ConfigValidationError::EmptyIdColumn);
        }

        if self.max_rows == Some(0) {
            return Err(ConfigValidationError::InvalidMaxRows);
        }

        Ok(())
    }
}

/// Errors that can occur during configuration validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("Path for '{0}' must not be empty")]
    EmptyPath(String),

    #[error("Identifier column name must not be empty")]
    EmptyIdColumn,

    #[error("Invalid max_rows: 0 (must be at least 1 when set)")]
    InvalidMaxRows,

    #[error("Cannot read config file '{path}': {reason}")]
    Unreadable { path: String, reason: String },
}

/// Builder for [`ServiceConfig`] with fluent API.
#[derive(Debug, Default)]
pub struct ServiceConfigBuilder {
    model_path: Option<PathBuf>,
    bounds_path: Option<PathBuf>,
    means_path: Option<PathBuf>,
    id_column: Option<String>,
    max_rows: Option<usize>,
}

impl ServiceConfigBuilder {
    /// Start from an existing configuration instead of the defaults.
    pub fn from_config(config: ServiceConfig) -> Self {
        Self {
            model_path: Some(config.model_path),
            bounds_path: Some(config.bounds_path),
            means_path: Some(config.means_path),
            id_column: Some(config.id_column),
            max_rows: config.max_rows,
        }
    }

    pub fn model_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.model_path = Some(path.into());
        self
    }

    pub fn bounds_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.bounds_path = Some(path.into());
        self
    }

    pub fn means_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.means_path = Some(path.into());
        self
    }

    /// Set the identifier column that bypasses the feature pipeline.
    pub fn id_column(mut self, column: impl Into<String>) -> Self {
        self.id_column = Some(column.into());
        self
    }

    /// Reject record sets with more than `rows` rows.
    pub fn max_rows(mut self, rows: usize) -> Self {
        self.max_rows = Some(rows);
        self
    }

    /// Build the configuration.
    ///
    /// Returns a validated `ServiceConfig` or an error if validation fails.
    pub fn build(self) -> Result<ServiceConfig, ConfigValidationError> {
        let defaults = ServiceConfig::default();
        let config = ServiceConfig {
            model_path: self.model_path.unwrap_or(defaults.model_path),
            bounds_path: self.bounds_path.unwrap_or(defaults.bounds_path),
            means_path: self.means_path.unwrap_or(defaults.means_path),
            id_column: self.id_column.unwrap_or(defaults.id_column),
            max_rows: self.max_rows,
        };

        config.validate()?;
        Ok(config)
    }
}
