//! Feature Extractor - Command-Line Entry Point

use anyhow::{Context, Result};
use clap::Parser;
use feature_engine::ColorMode;
use pipeline::{init_logging, run_extraction, LogFormat, PipelineConfig};
use std::path::PathBuf;
use tracing::info;

/// Compute GLCM texture and color features for every image under ROOT
#[derive(Parser)]
#[command(name = "extract-features")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Dataset root laid out as <split>/<class_label>/<image>
    root: PathBuf,

    /// Directory receiving <split>.csv
    #[arg(short, long, default_value = ".")]
    output_dir: PathBuf,

    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Zero the background with an Otsu threshold and emit a single intensity average
    #[arg(long)]
    masked: bool,

    /// Equalize the intensity histogram before the GLCM
    #[arg(long)]
    equalize: bool,

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
    if cli.masked {
        config.extraction.masked = true;
        config.extraction.color = ColorMode::Intensity;
    }
    if cli.equalize {
        config.extraction.equalize = true;
    }

    if cli.print_config {
        println!("{}", serde_json::to_string_pretty(&config.extraction)?);
        return Ok(());
    }

    info!("=== Mango Feature Extractor v{} ===", env!("CARGO_PKG_VERSION"));
    let written = run_extraction(&config.extraction, &cli.root, &cli.output_dir)
        .with_context(|| format!("Feature extraction failed for {}", cli.root.display()))?;

    for table in written {
        println!("{} CSV saved to: {}", capitalize(&table.split), table.path.display());
    }
    Ok(())
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
