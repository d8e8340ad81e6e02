//! CLI entry point for batch blend property prediction.

use anyhow::{Result, anyhow};
use blend_service::{InferenceError, InferenceService, RunSummary, ServiceConfig};
use blend_service::config::ServiceConfigBuilder;
use clap::Parser;
use rayon::prelude::*;
use serde::Serialize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};

#[derive(Parser, Debug)]
#[command(
    version,
    about = "Fuel blend property prediction",
    long_about = "Predicts BlendProperty1..BlendProperty10 for every row of one or more CSV files.\n\n\
                  EXAMPLES:\n  \
                  # Predict with artifacts in the current directory\n  \
                  blend-predict -i test.csv\n\n  \
                  # Several inputs at once, custom artifact locations\n  \
                  blend-predict -i a.csv -i b.csv --model models/forest.json -o results/\n\n  \
                  # Machine-readable run summaries\n  \
                  blend-predict -i test.csv --json"
)]
struct Args {
    /// CSV file(s) to predict. May be given more than once
    #[arg(short, long, required = true, num_args = 1..)]
    input: Vec<PathBuf>,

    /// Output directory for prediction CSVs
    #[arg(short, long, default_value = "./outputs")]
    output: PathBuf,

    /// JSON config file; command line flags override its values
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Path to the serialized forest model
    #[arg(long)]
    model: Option<PathBuf>,

    /// Path to the outlier bounds JSON
    #[arg(long)]
    bounds: Option<PathBuf>,

    /// Path to the imputation means JSON
    #[arg(long)]
    means: Option<PathBuf>,

    /// Identifier column passed through to the output
    #[arg(long)]
    id_column: Option<String>,

    /// Reject inputs with more rows than this
    #[arg(long)]
    max_rows: Option<usize>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Suppress progress output (only show errors and final result)
    #[arg(short, long)]
    quiet: bool,

    /// Output JSON run summaries to stdout instead of a human-readable summary
    ///
    /// Disables all logs so stdout only carries JSON.
    #[arg(long)]
    json: bool,
}

/// Result of predicting one input file.
#[derive(Debug, Serialize)]
struct FileOutcome {
    input: String,
    output: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    summary: Option<RunSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<InferenceError>,
}

/// Initialize the tracing subscriber for logging.
///
/// When `json_output` is true, logging is completely disabled to ensure
/// only JSON is written to stdout.
fn init_logging(level: &str, quiet: bool, json_output: bool) {
    if json_output {
        return;
    }

    use tracing_subscriber::EnvFilter;

    let effective_level = if quiet { "warn" } else { level };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(effective_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();

    init_logging(&args.log_level, args.quiet, args.json);

    let config = build_config(&args)?;

    if !args.output.exists() {
        std::fs::create_dir_all(&args.output)?;
        info!("Created output directory: {}", args.output.display());
    }

    let service = InferenceService::from_config(config);
    if !service.state().is_ready() {
        warn!("Service is degraded; every input will be refused");
    }

    let outputs = output_paths(&args.input, &args.output);
    let outcomes: Vec<FileOutcome> = args
        .input
        .par_iter()
        .zip(outputs.par_iter())
        .map(|(input, output)| predict_file(&service, input, output))
        .collect();

    let failed = outcomes.iter().filter(|o| o.error.is_some()).count();

    if args.json {
        println!("{}", serde_json::to_string_pretty(&outcomes)?);
    } else {
        print_human_readable_summary(&outcomes);
    }

    if failed > 0 {
        return Err(anyhow!("{} of {} inputs failed", failed, outcomes.len()));
    }
    Ok(())
}

/// Config file (or defaults), then command line overrides.
fn build_config(args: &Args) -> Result<ServiceConfig> {
    let base = match &args.config {
        Some(path) => ServiceConfig::from_json_file(path)?,
        None => ServiceConfig::default(),
    };

    let mut builder = ServiceConfigBuilder::from_config(base);
    if let Some(ref path) = args.model {
        builder = builder.model_path(path);
    }
    if let Some(ref path) = args.bounds {
        builder = builder.bounds_path(path);
    }
    if let Some(ref path) = args.means {
        builder = builder.means_path(path);
    }
    if let Some(ref column) = args.id_column {
        builder = builder.id_column(column);
    }
    if let Some(rows) = args.max_rows {
        builder = builder.max_rows(rows);
    }

    Ok(builder.build()?)
}

/// One prediction CSV per input, named `<stem>_predictions.csv`.
///
/// Inputs that share a stem get `<stem>_2_predictions.csv`, `<stem>_3_...` and
/// so on, so no run overwrites another's output.
fn output_paths(inputs: &[PathBuf], output_dir: &Path) -> Vec<PathBuf> {
    let mut taken = HashSet::new();

    inputs
        .iter()
        .map(|input| {
            let stem = extract_file_stem(input);
            let mut name = format!("{}_predictions.csv", stem);
            let mut suffix = 2;
            while !taken.insert(name.clone()) {
                name = format!("{}_{}_predictions.csv", stem, suffix);
                suffix += 1;
            }
            output_dir.join(name)
        })
        .collect()
}

fn predict_file(service: &InferenceService, input: &Path, output: &Path) -> FileOutcome {
    let (summary, error) = match service.run_file(input, output) {
        Ok(summary) => (Some(summary), None),
        Err(e) => {
            error!("Prediction failed for {}: {}", input.display(), e);
            (None, Some(e))
        }
    };

    FileOutcome {
        input: input.display().to_string(),
        output: output.display().to_string(),
        summary,
        error,
    }
}

/// Extract the file stem (name without extension) from a path.
fn extract_file_stem(path: &Path) -> String {
    path.file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("input")
        .to_string()
}

fn print_human_readable_summary(outcomes: &[FileOutcome]) {
    println!();
    println!("{}", "=".repeat(80));
    println!("PREDICTION COMPLETE");
    println!("{}", "=".repeat(80));

    for outcome in outcomes {
        println!();
        match (&outcome.summary, &outcome.error) {
            (Some(summary), _) => {
                println!(
                    "Input:  {} ({} rows x {} columns)",
                    outcome.input, summary.rows_in, summary.columns_in
                );
                println!(
                    "Output: {} ({} rows x {} columns)",
                    outcome.output, summary.rows_out, summary.columns_out
                );
                println!("  Duration: {}ms", summary.duration_ms);
                println!(
                    "  Values imputed: {} across {} columns",
                    summary.values_imputed(),
                    summary.imputations.len()
                );
                println!("  Values capped: {}", summary.values_capped());
                println!("  Model features: {}", summary.feature_columns.len());

                let adjustments: Vec<_> = summary
                    .imputations
                    .iter()
                    .chain(&summary.cappings)
                    .collect();
                if !adjustments.is_empty() {
                    println!("  Adjustments:");
                    for adjustment in adjustments.iter().take(10) {
                        println!(
                            "    - {}: {} ({} values, {:.4})",
                            adjustment.column,
                            adjustment.kind.display_name(),
                            adjustment.count,
                            adjustment.value
                        );
                    }
                    if adjustments.len() > 10 {
                        println!("    ... and {} more", adjustments.len() - 10);
                    }
                }
            }
            (None, Some(error)) => {
                println!("Input:  {}", outcome.input);
                println!("  FAILED [{}]: {}", error.error_code(), error);
            }
            (None, None) => {}
        }
    }

    println!();
    println!("{}", "=".repeat(80));
}
