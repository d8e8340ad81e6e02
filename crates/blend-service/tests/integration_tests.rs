//! Integration tests for the inference service.
//!
//! These tests run the full path from startup artifacts to prediction CSVs.

use approx::assert_relative_eq;
use blend_model::{ForestModel, PredictionMatrix, Predictor};
use blend_processing::schema::{TARGET_COLUMNS, TARGET_COUNT};
use blend_processing::{Bound, ImputationMeans, OutlierBounds};
use blend_service::{Artifacts, InferenceError, InferenceService, ServiceConfig, ServiceState};
use polars::prelude::*;
use pretty_assertions::assert_eq;
use std::path::PathBuf;
use std::sync::Arc;

// ============================================================================
// Helper Functions
// ============================================================================

fn fixtures_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

fn fixture_config() -> ServiceConfig {
    let fixtures = fixtures_path();
    ServiceConfig::builder()
        .model_path(fixtures.join("random_forest_multioutput.json"))
        .bounds_path(fixtures.join("outlier_bounds.json"))
        .means_path(fixtures.join("imputation_means.json"))
        .build()
        .unwrap()
}

fn fixture_service() -> InferenceService {
    let service = InferenceService::from_config(fixture_config());
    assert!(service.state().is_ready());
    service
}

fn f64_column(df: &DataFrame, name: &str) -> Vec<f64> {
    df.column(name)
        .unwrap()
        .as_materialized_series()
        .f64()
        .unwrap()
        .into_iter()
        .map(|v| v.unwrap())
        .collect()
}

fn i64_column(df: &DataFrame, name: &str) -> Vec<i64> {
    df.column(name)
        .unwrap()
        .as_materialized_series()
        .i64()
        .unwrap()
        .into_iter()
        .map(|v| v.unwrap())
        .collect()
}

/// Sums the engineered features of each row into every output.
#[derive(Debug)]
struct FeatureSumPredictor;

impl Predictor for FeatureSumPredictor {
    fn n_outputs(&self) -> usize {
        TARGET_COUNT
    }

    fn predict(&self, features: &DataFrame) -> blend_model::Result<PredictionMatrix> {
        let matrix = blend_model::FeatureMatrix::from_dataframe(features)?;
        let rows = (0..matrix.n_rows())
            .map(|i| vec![matrix.row(i).iter().sum::<f64>(); TARGET_COUNT])
            .collect();
        PredictionMatrix::from_rows(rows)
    }
}

fn stub_service(means: ImputationMeans, bounds: OutlierBounds) -> InferenceService {
    let artifacts = Artifacts::new(Arc::new(FeatureSumPredictor), means, bounds);
    InferenceService::new(ServiceConfig::default(), ServiceState::ready(artifacts))
}

// ============================================================================
// End-to-End Tests with the Fixture Artifacts
// ============================================================================

#[test]
fn test_fixture_file_end_to_end() {
    let service = fixture_service();
    let dir = tempfile::tempdir().unwrap();
    let output_path = dir.path().join("blend_sample_predictions.csv");

    let summary = service
        .run_file(&fixtures_path().join("blend_sample.csv"), &output_path)
        .unwrap();

    assert_eq!(summary.rows_in, 4);
    assert_eq!(summary.rows_out, 4);
    assert_eq!(summary.columns_out, 11);
    // One fraction, one property and the outlier.
    assert_eq!(summary.values_imputed(), 2);
    assert_eq!(summary.values_capped(), 1);
    assert!(summary.source.as_deref().unwrap().ends_with("blend_sample.csv"));

    let written = blend_service::io::read_csv_file(&output_path).unwrap();
    let mut expected_names = vec!["ID".to_string()];
    expected_names.extend(TARGET_COLUMNS.iter().cloned());
    let names: Vec<String> = written
        .get_column_names()
        .iter()
        .map(|s| s.to_string())
        .collect();
    assert_eq!(names, expected_names);

    // IDs keep input order, not sorted order.
    assert_eq!(i64_column(&written, "ID"), vec![104, 101, 103, 102]);

    for target in TARGET_COLUMNS.iter() {
        let values = f64_column(&written, target);
        let expected = [2.5, 1.5, 2.5, 1.5];
        for (value, expected) in values.iter().zip(expected) {
            assert_relative_eq!(*value, expected);
        }
    }
}

#[test]
fn test_fixture_csv_bytes() {
    let body = std::fs::read(fixtures_path().join("blend_sample.csv")).unwrap();
    let response = fixture_service().run_csv(&body).unwrap();
    let text = String::from_utf8(response).unwrap();

    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 5);
    assert_eq!(lines[0].split(',').count(), 11);
    assert!(lines[1].starts_with("104,"));
}

#[test]
fn test_missing_components_are_a_feature_mismatch() {
    // Only three of the five fraction columns: the model's layout differs.
    let df = df![
        "ID" => [1i64],
        "Component1_fraction" => [0.5],
        "Component2_fraction" => [0.3],
        "Component3_fraction" => [0.2],
    ]
    .unwrap();

    let err = fixture_service().run(df).unwrap_err();

    assert_eq!(err.error_code(), "FEATURE_MISMATCH");
    assert!(err.is_client_error());
}

#[test]
fn test_non_numeric_component_column() {
    let body = b"ID,Component1_fraction\n1,abc\n";
    let means: ImputationMeans = [("Component1_fraction", 0.2)].into_iter().collect();
    let err = stub_service(means, OutlierBounds::new())
        .run_csv(body)
        .unwrap_err();

    assert_eq!(err.error_code(), "MALFORMED_COLUMN");
}

#[test]
fn test_unimputed_missing_value_reaches_predictor() {
    // No mean for the fraction column, so its gap survives to the model input.
    let df = df![
        "Component1_fraction" => [Some(0.5), None],
        "Component1_Property1" => [Some(2.0), Some(4.0)],
    ]
    .unwrap();

    let err = stub_service(ImputationMeans::new(), OutlierBounds::new())
        .run(df)
        .unwrap_err();

    assert!(matches!(err, InferenceError::Model(_)));
    assert_eq!(err.error_code(), "INVALID_INPUT");
}

// ============================================================================
// Transformation Semantics Through the Whole Service
// ============================================================================

#[test]
fn test_weighted_average_example() {
    let df = df![
        "ID" => ["a"],
        "Component1_fraction" => [0.5],
        "Component1_Property1" => [10.0],
        "Component2_fraction" => [0.5],
        "Component2_Property1" => [18.0],
    ]
    .unwrap();

    let output = stub_service(ImputationMeans::new(), OutlierBounds::new())
        .run(df)
        .unwrap();

    // Fractions 0.5 + 0.5, WeightedAvg_Property1 = 14.0, the other nine are 0.0.
    assert_relative_eq!(f64_column(&output.predictions, "BlendProperty1")[0], 15.0);
    assert_eq!(
        output.summary.feature_columns[..3].to_vec(),
        vec![
            "Component1_fraction".to_string(),
            "Component2_fraction".to_string(),
            "WeightedAvg_Property1".to_string(),
        ]
    );
}

#[test]
fn test_imputation_and_capping_feed_the_model() {
    let df = df![
        "Component1_fraction" => [None, Some(1.0)],
        "Component1_Property1" => [Some(3.0), Some(50.0)],
    ]
    .unwrap();
    let means: ImputationMeans = [("Component1_fraction", 0.5)].into_iter().collect();
    let bounds: OutlierBounds = [("Component1_Property1", Bound::new(0.0, 10.0).unwrap())]
        .into_iter()
        .collect();

    let output = stub_service(means, bounds).run(df).unwrap();
    let sums = f64_column(&output.predictions, "BlendProperty10");

    // Row 0: fraction 0.5 + 0.5 * 3.0. Row 1: fraction 1.0 + 1.0 * 10.0.
    assert_relative_eq!(sums[0], 2.0);
    assert_relative_eq!(sums[1], 11.0);
}

#[test]
fn test_no_component_columns() {
    let df = df!["ID" => [1i64, 2, 3], "Unrelated" => [1.0, 2.0, 3.0]].unwrap();

    let output = stub_service(ImputationMeans::new(), OutlierBounds::new())
        .run(df)
        .unwrap();

    assert_eq!(output.predictions.shape(), (3, 11));
    assert_eq!(f64_column(&output.predictions, "BlendProperty1"), vec![0.0; 3]);
    assert_eq!(output.summary.feature_columns.len(), 10);
}

#[test]
fn test_zero_rows() {
    let df = df![
        "ID" => Vec::<i64>::new(),
        "Component1_fraction" => Vec::<f64>::new(),
        "Component1_Property1" => Vec::<f64>::new(),
    ]
    .unwrap();

    let output = stub_service(ImputationMeans::new(), OutlierBounds::new())
        .run(df)
        .unwrap();

    assert_eq!(output.predictions.shape(), (0, 11));
}

// ============================================================================
// Startup and Concurrency
// ============================================================================

#[test]
fn test_degraded_startup() {
    let dir = tempfile::tempdir().unwrap();
    let config = ServiceConfig::builder()
        .model_path(dir.path().join("random_forest_multioutput.json"))
        .bounds_path(fixtures_path().join("outlier_bounds.json"))
        .means_path(fixtures_path().join("imputation_means.json"))
        .build()
        .unwrap();

    let service = InferenceService::from_config(config);

    assert!(!service.state().is_ready());
    let body = std::fs::read(fixtures_path().join("blend_sample.csv")).unwrap();
    let err = service.run_csv(&body).unwrap_err();
    assert_eq!(err.error_code(), "SERVER_NOT_READY");
    assert!(!err.is_client_error());
}

#[test]
fn test_corrupt_model_degrades() {
    let dir = tempfile::tempdir().unwrap();
    let model_path = dir.path().join("model.json");
    std::fs::write(&model_path, r#"{"feature_names": [], "n_outputs": 10, "trees": []}"#).unwrap();

    let config = ServiceConfig::builder()
        .model_path(&model_path)
        .bounds_path(fixtures_path().join("outlier_bounds.json"))
        .means_path(fixtures_path().join("imputation_means.json"))
        .build()
        .unwrap();

    assert!(!InferenceService::from_config(config).state().is_ready());
}

#[test]
fn test_concurrent_runs_share_artifacts() {
    let service = Arc::new(fixture_service());
    let body = Arc::new(std::fs::read(fixtures_path().join("blend_sample.csv")).unwrap());
    let expected = service.run_csv(&body).unwrap();

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let service = Arc::clone(&service);
            let body = Arc::clone(&body);
            std::thread::spawn(move || service.run_csv(&body).unwrap())
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap(), expected);
    }
}

#[test]
fn test_saved_forest_loads_into_service() {
    let model = ForestModel::load(fixtures_path().join("random_forest_multioutput.json")).unwrap();
    assert_eq!(model.info().n_estimators, 2);

    let dir = tempfile::tempdir().unwrap();
    let model_path = dir.path().join("copy.json");
    model.save(&model_path).unwrap();

    let config = ServiceConfig::builder()
        .model_path(&model_path)
        .bounds_path(fixtures_path().join("outlier_bounds.json"))
        .means_path(fixtures_path().join("imputation_means.json"))
        .max_rows(3)
        .build()
        .unwrap();
    let service = InferenceService::from_config(config);
    assert!(service.state().is_ready());

    let body = std::fs::read(fixtures_path().join("blend_sample.csv")).unwrap();
    let err = service.run_csv(&body).unwrap_err();
    assert!(matches!(
        err,
        InferenceError::InputTooLarge {
            rows: 4,
            max_rows: 3
        }
    ));
}
