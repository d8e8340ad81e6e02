//! The inference orchestrator.
//!
//! Sequences identifier extraction, the feature pipeline and the predictor,
//! then reattaches identifiers to the predictions by row position.

use crate::config::ServiceConfig;
use crate::error::{InferenceError, Result};
use crate::io;
use crate::state::ServiceState;
use crate::types::{PredictionOutput, RunSummary};
use blend_processing::FeaturePipeline;
use blend_processing::schema::{TARGET_COLUMNS, TARGET_COUNT};
use polars::prelude::*;
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info};

/// Runs record sets through the loaded artifacts.
///
/// Holds no per-request state, so one service can serve any number of
/// concurrent callers.
#[derive(Debug, Clone)]
pub struct InferenceService {
    config: ServiceConfig,
    state: ServiceState,
}

impl InferenceService {
    pub fn new(config: ServiceConfig, state: ServiceState) -> Self {
        Self { config, state }
    }

    /// Load the artifacts named by `config`. Never fails; a service whose
    /// artifacts did not load answers every request with `ServerNotReady`.
    pub fn from_config(config: ServiceConfig) -> Self {
        let state = ServiceState::load(&config);
        Self::new(config, state)
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    pub fn state(&self) -> &ServiceState {
        &self.state
    }

    /// Predict blend properties for every row of `df`.
    ///
    /// The output holds `BlendProperty1..BlendProperty10` in input row order,
    /// preceded by the identifier column when the input has one. Any failure
    /// aborts the whole run.
    pub fn run(&self, mut df: DataFrame) -> Result<PredictionOutput> {
        let start_time = Instant::now();
        let artifacts = self.state.artifacts()?;

        let n_rows = df.height();
        if let Some(max_rows) = self.config.max_rows {
            if n_rows > max_rows {
                return Err(InferenceError::InputTooLarge {
                    rows: n_rows,
                    max_rows,
                });
            }
        }
        let columns_in = df.width();

        info!("Step 1: Extracting identifier column...");
        let id_column = self.config.id_column.as_str();
        let ids = match df.get_column_index(id_column) {
            Some(_) => Some(df.drop_in_place(id_column)?),
            None => {
                debug!("No '{}' column in input", id_column);
                None
            }
        };

        info!("Step 2: Transforming features...");
        let pipeline = FeaturePipeline::new(&artifacts.means, &artifacts.bounds);
        let transformed = pipeline.transform(df)?;

        info!("Step 3: Predicting {} rows...", n_rows);
        let predictions = artifacts.predictor.predict(&transformed.features)?;

        if predictions.n_cols() != TARGET_COUNT {
            return Err(InferenceError::InvalidPrediction(format!(
                "model returned {} outputs per row, expected {}",
                predictions.n_cols(),
                TARGET_COUNT
            )));
        }
        if predictions.n_rows() != n_rows {
            return Err(InferenceError::InvalidPrediction(format!(
                "model returned {} rows for {} input rows",
                predictions.n_rows(),
                n_rows
            )));
        }

        info!("Step 4: Assembling output...");
        let mut output = predictions.to_dataframe(&TARGET_COLUMNS)?;
        let id_name = ids.as_ref().map(|c| c.name().to_string());
        if let Some(ids) = ids {
            output.insert_column(0, ids)?;
        }

        let mut summary = RunSummary::from_transform(transformed.summary, columns_in, id_name);
        summary.rows_out = output.height();
        summary.columns_out = output.width();
        summary.duration_ms = start_time.elapsed().as_millis() as u64;

        info!(
            "Predicted {} rows in {}ms ({} values imputed, {} values capped)",
            summary.rows_out,
            summary.duration_ms,
            summary.values_imputed(),
            summary.values_capped()
        );

        Ok(PredictionOutput {
            predictions: output,
            summary,
        })
    }

    /// CSV request body in, CSV response body out.
    pub fn run_csv(&self, body: &[u8]) -> Result<Vec<u8>> {
        self.state.artifacts()?;
        let df = io::read_csv_bytes(body)?;
        let mut output = self.run(df)?;
        io::to_csv_bytes(&mut output.predictions)
    }

    /// Predict for a CSV file and write the predictions to `output`.
    pub fn run_file(&self, input: &Path, output: &Path) -> Result<RunSummary> {
        self.state.artifacts()?;
        info!("Loading dataset from: {}", input.display());
        let df = io::read_csv_file(input)?;
        debug!("Dataset loaded: {:?}", df.shape());

        let mut result = self.run(df)?;
        io::write_csv_file(&mut result.predictions, output)?;
        info!("Predictions written to: {}", output.display());

        Ok(result.summary.with_source(input.display().to_string()))
    }
}

static_assertions::assert_impl_all!(InferenceService: Send, Sync);
