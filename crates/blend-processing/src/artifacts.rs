//! Precomputed imputation means and outlier bounds.
//!
//! Both artifacts are produced offline alongside the model and loaded once at
//! startup. They are plain JSON objects keyed by column name:
//!
//! ```json
//! { "Component1_fraction": 0.21, "Component1_Property1": -0.04 }
//! ```
//!
//! ```json
//! { "Component1_Property1": { "lower": -3.1, "upper": 2.9 } }
//! ```
//!
//! Lookups return `Option` so callers handle the "no entry for this column"
//! case explicitly. A missing entry is never an error.

use crate::error::{ProcessingError, Result, ResultExt};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use tracing::debug;

/// Column name to fill value for missing cells.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImputationMeans(HashMap<String, f64>);

impl ImputationMeans {
    /// Create an empty mapping.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse means from a JSON string.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let means: Self = serde_json::from_str(json)?;
        for (column, value) in &means.0 {
            if !value.is_finite() {
                return Err(ProcessingError::InvalidArtifact {
                    name: "imputation means".to_string(),
                    reason: format!("mean for '{}' is not finite", column),
                });
            }
        }
        Ok(means)
    }

    /// Load means from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = read_artifact(path)?;
        let means = Self::from_json_str(&json)
            .context(format!("Loading imputation means from {}", path.display()))?;
        debug!("Loaded {} imputation means from {}", means.len(), path.display());
        Ok(means)
    }

    /// Fill value for a column, or `None` when no mean was recorded for it.
    pub fn get(&self, column: &str) -> Option<f64> {
        self.0.get(column).copied()
    }

    /// Set the fill value for a column.
    pub fn insert(&mut self, column: impl Into<String>, value: f64) {
        self.0.insert(column.into(), value);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<S: Into<String>> FromIterator<(S, f64)> for ImputationMeans {
    fn from_iter<I: IntoIterator<Item = (S, f64)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

/// Inclusive clipping range for one column.
///
/// Every constructor checks that both ends are finite and `lower <= upper`,
/// including deserialization.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawBound")]
pub struct Bound {
    lower: f64,
    upper: f64,
}

/// Unvalidated `{lower, upper}` pair as it appears in the bounds file.
#[derive(Debug, Deserialize)]
struct RawBound {
    lower: f64,
    upper: f64,
}

impl TryFrom<RawBound> for Bound {
    type Error = ProcessingError;

    fn try_from(raw: RawBound) -> Result<Self> {
        Self::checked("bound", raw.lower, raw.upper)
    }
}

impl Bound {
    /// Create a bound, rejecting inverted or non-finite ranges.
    pub fn new(lower: f64, upper: f64) -> Result<Self> {
        Self::checked("bound", lower, upper)
    }

    fn checked(column: &str, lower: f64, upper: f64) -> Result<Self> {
        if !lower.is_finite() || !upper.is_finite() {
            return Err(ProcessingError::InvalidArtifact {
                name: "outlier bounds".to_string(),
                reason: format!("bound for '{}' is not finite", column),
            });
        }
        if lower > upper {
            return Err(ProcessingError::InvalidArtifact {
                name: "outlier bounds".to_string(),
                reason: format!(
                    "bound for '{}' has lower {} above upper {}",
                    column, lower, upper
                ),
            });
        }
        Ok(Self { lower, upper })
    }

    pub fn lower(&self) -> f64 {
        self.lower
    }

    pub fn upper(&self) -> f64 {
        self.upper
    }

    /// Clip a value into `[lower, upper]`. NaN stays NaN.
    #[inline]
    pub fn clamp(&self, value: f64) -> f64 {
        value.clamp(self.lower, self.upper)
    }
}

/// Column name to clipping range.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OutlierBounds(HashMap<String, Bound>);

impl OutlierBounds {
    /// Create an empty mapping.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse bounds from a JSON string, validating every range.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let raw: HashMap<String, RawBound> = serde_json::from_str(json)?;
        raw.into_iter()
            .map(|(column, bound)| {
                let bound = Bound::checked(&column, bound.lower, bound.upper)?;
                Ok((column, bound))
            })
            .collect::<Result<HashMap<_, _>>>()
            .map(Self)
    }

    /// Load bounds from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = read_artifact(path)?;
        let bounds = Self::from_json_str(&json)
            .context(format!("Loading outlier bounds from {}", path.display()))?;
        debug!("Loaded {} outlier bounds from {}", bounds.len(), path.display());
        Ok(bounds)
    }

    /// Range for a column, or `None` when the column is not capped.
    pub fn get(&self, column: &str) -> Option<Bound> {
        self.0.get(column).copied()
    }

    /// Set the range for a column.
    pub fn insert(&mut self, column: impl Into<String>, bound: Bound) {
        self.0.insert(column.into(), bound);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<S: Into<String>> FromIterator<(S, Bound)> for OutlierBounds {
    fn from_iter<I: IntoIterator<Item = (S, Bound)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

fn read_artifact(path: &Path) -> Result<String> {
    if !path.exists() {
        return Err(ProcessingError::ArtifactNotFound(
            path.display().to_string(),
        ));
    }
    Ok(std::fs::read_to_string(path)?)
}
