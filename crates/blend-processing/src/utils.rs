//! Shared utilities for the transformation steps.

use crate::error::{ProcessingError, Result};
use polars::prelude::*;

/// Check if a DataType is numeric (integer or float).
#[inline]
pub fn is_numeric_dtype(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
            | DataType::Float32
            | DataType::Float64
    )
}

/// Column names of a DataFrame as owned strings, in column order.
pub fn column_names(df: &DataFrame) -> Vec<String> {
    df.get_column_names()
        .iter()
        .map(|s| s.to_string())
        .collect()
}

/// Fetch a column as a `Float64` series.
///
/// Integer columns are widened; string columns are parsed strictly, so a
/// single unparseable cell fails the whole column. An all-empty column read
/// from CSV comes back as strings and casts to an all-null float column.
pub fn numeric_series(df: &DataFrame, col_name: &str) -> Result<Series> {
    let series = df.column(col_name)?.as_materialized_series();
    if series.dtype() == &DataType::Float64 {
        return Ok(series.clone());
    }
    if is_numeric_dtype(series.dtype()) {
        return Ok(series.cast(&DataType::Float64)?);
    }

    series
        .strict_cast(&DataType::Float64)
        .map_err(|e| ProcessingError::MalformedColumn {
            column: col_name.to_string(),
            reason: e.to_string(),
        })
}

/// Like [`numeric_series`], but `Ok(None)` when the column does not exist.
pub fn optional_numeric_series(df: &DataFrame, col_name: &str) -> Result<Option<Series>> {
    match df.get_column_index(col_name) {
        Some(_) => numeric_series(df, col_name).map(Some),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_numeric_dtype() {
        assert!(is_numeric_dtype(&DataType::Int64));
        assert!(is_numeric_dtype(&DataType::Float32));
        assert!(!is_numeric_dtype(&DataType::String));
        assert!(!is_numeric_dtype(&DataType::Boolean));
    }

    #[test]
    fn test_numeric_series_widens_integers() {
        let df = df!["a" => [1i64, 2, 3]].unwrap();
        let series = numeric_series(&df, "a").unwrap();
        assert_eq!(series.dtype(), &DataType::Float64);
        assert_eq!(series.f64().unwrap().get(2), Some(3.0));
    }

    #[test]
    fn test_numeric_series_parses_numeric_strings() {
        let df = df!["a" => [Some("1.5"), None, Some("-2")]].unwrap();
        let series = numeric_series(&df, "a").unwrap();
        let values: Vec<Option<f64>> = series.f64().unwrap().into_iter().collect();
        assert_eq!(values, vec![Some(1.5), None, Some(-2.0)]);
    }

    #[test]
    fn test_numeric_series_rejects_text() {
        let df = df!["a" => ["1.0", "heavy", "2.0"]].unwrap();
        let err = numeric_series(&df, "a").unwrap_err();
        assert!(matches!(err, ProcessingError::MalformedColumn { ref column, .. } if column == "a"));
    }

    #[test]
    fn test_optional_numeric_series_absent_column() {
        let df = df!["a" => [1.0]].unwrap();
        assert!(optional_numeric_series(&df, "b").unwrap().is_none());
        assert!(optional_numeric_series(&df, "a").unwrap().is_some());
    }
}
