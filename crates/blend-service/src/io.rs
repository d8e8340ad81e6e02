//! CSV in, CSV out.
//!
//! Request bodies are CSV with a header row; empty cells parse as nulls.
//! Responses are written back as CSV with a header row.

use crate::error::{InferenceError, Result};
use polars::prelude::*;
use std::io::{Cursor, Write};
use std::path::Path;

/// Column types are inferred from every row, so a column that only turns
/// fractional (or only gains values) late in the file still parses.
const INFER_SCHEMA_ROWS: Option<usize> = None;

/// Read a CSV file into a record set.
pub fn read_csv_file(path: impl AsRef<Path>) -> Result<DataFrame> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(InferenceError::MalformedInput(format!(
            "input file not found: {}",
            path.display()
        )));
    }

    CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(INFER_SCHEMA_ROWS)
        .try_into_reader_with_file_path(Some(path.to_path_buf()))?
        .finish()
        .map_err(|e| {
            InferenceError::MalformedInput(format!("failed to parse {}: {}", path.display(), e))
        })
}

/// Read an in-memory CSV payload into a record set.
pub fn read_csv_bytes(bytes: &[u8]) -> Result<DataFrame> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Err(InferenceError::MalformedInput(
            "request body is empty".to_string(),
        ));
    }

    CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(INFER_SCHEMA_ROWS)
        .into_reader_with_file_handle(Cursor::new(bytes))
        .finish()
        .map_err(|e| InferenceError::MalformedInput(format!("failed to parse CSV: {}", e)))
}

/// Write a record set as CSV with a header row.
pub fn write_csv<W: Write>(df: &mut DataFrame, writer: W) -> Result<()> {
    CsvWriter::new(writer)
        .include_header(true)
        .with_separator(b',')
        .finish(df)?;
    Ok(())
}

/// Write a record set to a CSV file, replacing any existing file.
pub fn write_csv_file(df: &mut DataFrame, path: impl AsRef<Path>) -> Result<()> {
    let file = std::fs::File::create(path.as_ref())?;
    write_csv(df, file)
}

/// Serialize a record set to CSV bytes.
pub fn to_csv_bytes(df: &mut DataFrame) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    write_csv(df, &mut buffer)?;
    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_bytes_with_gaps() {
        let csv = b"ID,Component1_fraction,Component1_Property1\n1,0.5,\n2,,3.0\n";
        let df = read_csv_bytes(csv).unwrap();

        assert_eq!(df.shape(), (2, 3));
        assert_eq!(df.column("Component1_fraction").unwrap().null_count(), 1);
        assert_eq!(df.column("Component1_Property1").unwrap().null_count(), 1);
    }

    #[test]
    fn test_read_late_fractional_value() {
        let mut csv = String::from("ID,Component1_Property1\n");
        for i in 0..10_000 {
            csv.push_str(&format!("{},1\n", i));
        }
        csv.push_str("10000,1.5\n");

        let df = read_csv_bytes(csv.as_bytes()).unwrap();

        assert_eq!(df.height(), 10_001);
        let column = df.column("Component1_Property1").unwrap();
        assert_eq!(column.dtype(), &DataType::Float64);
        let values = column.as_materialized_series().f64().unwrap().clone();
        assert_eq!(values.get(10_000), Some(1.5));
        assert_eq!(values.get(0), Some(1.0));
    }

    #[test]
    fn test_read_empty_body() {
        let err = read_csv_bytes(b"  \n").unwrap_err();
        assert!(matches!(err, InferenceError::MalformedInput(_)));
    }

    #[test]
    fn test_read_missing_file() {
        let err = read_csv_file("/nonexistent/test.csv").unwrap_err();
        assert!(matches!(err, InferenceError::MalformedInput(_)));
    }

    #[test]
    fn test_write_then_read() {
        let mut df = df!["ID" => [7i64, 8], "BlendProperty1" => [0.25, -1.5]].unwrap();

        let bytes = to_csv_bytes(&mut df).unwrap();
        let text = String::from_utf8(bytes.clone()).unwrap();
        assert!(text.starts_with("ID,BlendProperty1\n"));

        let parsed = read_csv_bytes(&bytes).unwrap();
        assert_eq!(parsed.shape(), (2, 2));
    }
}
