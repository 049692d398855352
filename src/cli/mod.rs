//! Command-line interface for training, evaluation, prediction and serving

use clap::{Parser, Subcommand};
use colored::*;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::export::ArtifactStore;
use crate::inference::{predict_with_store, PredictRequest, Record};
use crate::training::{Trainer, TrainingConfig, DEFAULT_TARGET};

// ─── Styling helpers ───────────────────────────────────────────────────────────

fn dim(s: &str) -> ColoredString   { s.truecolor(100, 100, 100) }
fn accent(s: &str) -> ColoredString { s.truecolor(120, 170, 255) }
fn muted(s: &str) -> ColoredString  { s.truecolor(140, 140, 140) }
fn ok(s: &str) -> ColoredString     { s.truecolor(100, 210, 120) }

fn kv(key: &str, val: &str) -> String {
    format!("  {:<16} {}", muted(key), val.white())
}

fn step_run(msg: &str) {
    print!("  {} {}... ", accent("›"), msg);
    let _ = std::io::stdout().flush();
}

fn step_done(detail: &str) {
    println!("{} {}", ok("done"), dim(detail));
}

fn section(title: &str) {
    println!();
    println!("  {}", title.white().bold());
    println!("  {}", dim(&"─".repeat(56)));
}

fn metric_row(name: &str, value: f64) {
    println!("  {:<16} {}", muted(name), format!("{:.4}", value).white().bold());
}

// ─── CLI definition ────────────────────────────────────────────────────────────

#[derive(Parser)]
#[command(name = "house-price")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Train, evaluate and serve a linear house price model")]
#[command(long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Fit a model on a CSV dataset and store it
    Train {
        /// Input CSV file
        #[arg(short, long)]
        data: PathBuf,

        /// Directory holding the model artifacts
        #[arg(long, env = "MODELS_DIR", default_value = "./models")]
        models_dir: PathBuf,

        /// Target column name
        #[arg(short, long, default_value = DEFAULT_TARGET)]
        target: String,

        /// Fraction of rows held out for metrics
        #[arg(long, default_value = "0.2")]
        test_size: f64,

        /// Seed for the train/test shuffle
        #[arg(long, default_value = "42")]
        seed: u64,
    },

    /// Score the stored model over a full dataset
    Evaluate {
        /// Input CSV file
        #[arg(short, long)]
        data: PathBuf,

        /// Directory holding the model artifacts
        #[arg(long, env = "MODELS_DIR", default_value = "./models")]
        models_dir: PathBuf,
    },

    /// Predict prices with the stored model
    Predict {
        /// Single record as a JSON object
        #[arg(short, long, conflicts_with = "records_file")]
        record: Option<String>,

        /// JSON file holding an array of records
        #[arg(long)]
        records_file: Option<PathBuf>,

        /// Directory holding the model artifacts
        #[arg(long, env = "MODELS_DIR", default_value = "./models")]
        models_dir: PathBuf,
    },

    /// Start the HTTP API
    Serve {
        /// Server port (defaults to API_PORT or 8000)
        #[arg(short, long)]
        port: Option<u16>,

        /// Server host (defaults to API_HOST or 0.0.0.0)
        #[arg(long)]
        host: Option<String>,
    },
}

// ─── Commands ──────────────────────────────────────────────────────────────────

pub fn cmd_train(
    data_path: &Path,
    models_dir: &Path,
    target: &str,
    test_size: f64,
    seed: u64,
) -> anyhow::Result<()> {
    section("Train");

    let config = TrainingConfig::new(target)
        .with_test_size(test_size)
        .with_random_seed(seed);
    let store = ArtifactStore::new(models_dir);

    step_run(&format!("Fitting on {}", data_path.display().to_string().cyan()));
    let start = Instant::now();
    let report = Trainer::new(config).train_and_save(data_path, &store)?;
    step_done(&format!("{:?}", start.elapsed()));

    println!();
    println!("{}", kv("Train rows", &report.train_size.to_string()));
    println!("{}", kv("Test rows", &report.test_size.to_string()));
    metric_row("MAE", report.mae);
    metric_row("RMSE", report.rmse);
    metric_row("R²", report.r2);
    println!("{}", kv("Saved", &report.model_path));
    println!();

    Ok(())
}

pub fn cmd_evaluate(data_path: &Path, models_dir: &Path) -> anyhow::Result<()> {
    section("Evaluate");

    let store = ArtifactStore::new(models_dir);

    step_run(&format!("Scoring {}", data_path.display().to_string().cyan()));
    let start = Instant::now();
    let report = Trainer::default().evaluate_saved(data_path, &store)?;
    step_done(&format!("{:?}", start.elapsed()));

    println!();
    println!("{}", kv("Samples", &report.samples.to_string()));
    metric_row("MAE", report.mae);
    metric_row("MSE", report.mse);
    metric_row("RMSE", report.rmse);
    metric_row("R²", report.r2);
    println!();

    Ok(())
}

/// Build a request from the CLI's record sources
pub fn build_request(record: Option<&str>, records_file: Option<&Path>) -> anyhow::Result<PredictRequest> {
    let mut request = PredictRequest::default();
    if let Some(json) = record {
        let parsed: Record = serde_json::from_str(json)?;
        request.record = Some(parsed);
    }
    if let Some(path) = records_file {
        let parsed: Vec<Record> = serde_json::from_str(&std::fs::read_to_string(path)?)?;
        request.records = Some(parsed);
    }
    Ok(request)
}

pub fn cmd_predict(
    record: Option<&str>,
    records_file: Option<&Path>,
    models_dir: &Path,
) -> anyhow::Result<()> {
    section("Predict");

    let request = build_request(record, records_file)?;
    let store = ArtifactStore::new(models_dir);
    let predictions = predict_with_store(&store, &request)?;

    for (i, price) in predictions.iter().enumerate() {
        println!("  {:<16} {}", muted(&format!("Record {}", i + 1)), format!("${:.2}", price).white().bold());
    }
    println!();

    Ok(())
}

pub async fn cmd_serve(host: Option<String>, port: Option<u16>) -> anyhow::Result<()> {
    use crate::server::{run_server, ServerConfig};

    let defaults = ServerConfig::default();
    let config = ServerConfig {
        host: host.unwrap_or(defaults.host.clone()),
        port: port.unwrap_or(defaults.port),
        ..defaults
    };

    section(&format!("House Price API v{}", env!("CARGO_PKG_VERSION")));
    println!("{}", kv("UI", &format!("http://{}:{}/ui", config.host, config.port)));
    println!("{}", kv("Health", &format!("http://{}:{}/health", config.host, config.port)));
    println!("{}", kv("Models", &config.models_dir));
    println!("{}", kv("Data", &config.data_dir));
    println!();
    println!("  {}", dim("ctrl+c to stop"));
    println!();

    run_server(config).await
}
