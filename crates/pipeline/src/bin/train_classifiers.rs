//! Classifier Trainer - Command-Line Entry Point

use anyhow::{Context, Result};
use clap::Parser;
use pipeline::{init_logging, run_training, LogFormat, PipelineConfig};
use std::path::PathBuf;
use tracing::info;

/// Fit the configured classifiers on a training table and score them on a test table
#[derive(Parser)]
#[command(name = "train-classifiers")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Training feature table
    #[arg(long)]
    train: Option<PathBuf>,

    /// Test feature table
    #[arg(long)]
    test: Option<PathBuf>,

    /// Results table to write
    #[arg(long)]
    results: Option<PathBuf>,

    /// Print the effective configuration as JSON and exit
    #[arg(long)]
    print_config: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Log output format
    #[arg(long, value_enum, default_value_t = LogFormat::Text)]
    log_format: LogFormat,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.log_format);

    let mut config = PipelineConfig::load(cli.config.as_deref()).context("Failed to load configuration")?;
    let training = &mut config.training;
    if let Some(path) = cli.train {
        training.train_path = path;
    }
    if let Some(path) = cli.test {
        training.test_path = path;
    }
    if let Some(path) = cli.results {
        training.results_path = path;
    }

    if cli.print_config {
        println!("{}", serde_json::to_string_pretty(&config.training)?);
        return Ok(());
    }

    info!("=== Mango Classifier Trainer v{} ===", env!("CARGO_PKG_VERSION"));
    let report = run_training(&config.training).context("Training failed")?;

    for (name, accuracy) in report.entries() {
        println!("{} Accuracy: {}", name, accuracy);
    }
    println!("Results saved to {}", config.training.results_path.display());
    Ok(())
}
