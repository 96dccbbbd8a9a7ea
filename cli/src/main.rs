use std::fs;
use std::path::PathBuf;

use cacti_report_extract::reader::TextEncoding;
use cacti_report_extract::{AnalysisConfig, analyze_directory, stats, table};
use clap::Parser;
use tracing::warn;
use tracing_subscriber::EnvFilter;

mod charts;
mod error_log;

#[derive(Debug, Parser)]
#[command(name = "cacti-analyze")]
#[command(about = "Summarize CACTI cache-model reports into a CSV table and charts")]
#[command(version)]
struct Cli {
    /// Directory containing the CACTI report files.
    #[arg(long)]
    results_dir: Option<PathBuf>,
    /// Output path for the CSV summary table.
    #[arg(long)]
    output: Option<PathBuf>,
    /// Append-only log for visualization failures.
    #[arg(long)]
    error_log: Option<PathBuf>,
    /// Directory receiving the chart images.
    #[arg(long)]
    charts_dir: Option<PathBuf>,
    /// Report file extension (e.g. out).
    #[arg(long)]
    extension: Option<String>,
    /// Comma-separated decode priority list (e.g. utf-8,latin-1,cp1252).
    #[arg(long)]
    encodings: Option<String>,
    /// YAML configuration file; command-line flags take precedence.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Also write every report record as JSON to this path.
    #[arg(long)]
    records_json: Option<PathBuf>,
    /// Skip chart rendering.
    #[arg(long)]
    no_charts: bool,
    /// Enable debug logging on stderr.
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(err) = run(cli) {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<(), String> {
    let config = resolve_config(&cli)?;
    let results_dir = &config.results_dir;

    if !results_dir.exists() {
        fs::create_dir_all(results_dir).map_err(|err| {
            format!(
                "Failed to create results directory '{}': {err}",
                results_dir.display()
            )
        })?;
        println!(
            "Directory {} created. Place the CACTI result files in it and run again.",
            results_dir.display()
        );
        return Ok(());
    }

    println!("Analyzing results in {}...", results_dir.display());

    let analysis = analyze_directory(&config).map_err(|err| {
        format!(
            "Failed to read results directory '{}': {err}",
            results_dir.display()
        )
    })?;

    table::write_table(&config.output_csv, &analysis.records).map_err(|err| {
        format!(
            "Failed to write summary table '{}': {err}",
            config.output_csv.display()
        )
    })?;

    let summary = analysis.summary();
    println!();
    println!("Results analyzed: {}", summary.total);
    println!("  Valid configurations: {}", summary.valid);
    println!("  Invalid configurations/errors: {}", summary.rejected);
    println!("CSV report saved to: {}", config.output_csv.display());

    if let Some(path) = &cli.records_json {
        table::write_records_json(path, &analysis.records)
            .map_err(|err| format!("Failed to write records '{}': {err}", path.display()))?;
        println!("Records saved to: {}", path.display());
    }

    if let Err(err) = report_valid_rows(&config, !cli.no_charts) {
        println!("Error generating visualizations: {err}");
        if let Err(log_err) = error_log::append(&config.error_log, &err.to_string()) {
            warn!(
                path = %config.error_log.display(),
                error = %log_err,
                "Failed to append to error log"
            );
        }
    }

    Ok(())
}

/// Layers command-line flags over the YAML config (or the defaults).
fn resolve_config(cli: &Cli) -> Result<AnalysisConfig, String> {
    let mut config = match &cli.config {
        Some(path) => AnalysisConfig::load(path)
            .map_err(|err| format!("Failed to load config '{}': {err}", path.display()))?,
        None => AnalysisConfig::default(),
    };

    if let Some(dir) = &cli.results_dir {
        config.results_dir = dir.clone();
    }
    if let Some(output) = &cli.output {
        config.output_csv = output.clone();
    }
    if let Some(log) = &cli.error_log {
        config.error_log = log.clone();
    }
    if let Some(dir) = &cli.charts_dir {
        config.charts_dir = dir.clone();
    }
    if let Some(extension) = &cli.extension {
        config.extension = extension.trim_start_matches('.').to_string();
    }
    if cli.encodings.is_some() {
        config.encodings = parse_csv_list(cli.encodings.clone())
            .iter()
            .map(|name| name.parse::<TextEncoding>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|err| format!("--encodings: {err}"))?;
    }

    Ok(config)
}

/// Reads the valid rows back from the CSV, renders the charts and prints the
/// descriptive statistics.
fn report_valid_rows(
    config: &AnalysisConfig,
    render_charts: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let rows = table::load_valid_rows(&config.output_csv)?;

    if rows.is_empty() {
        println!("No valid data for visualization.");
        return Ok(());
    }

    if render_charts {
        charts::render_all(&rows, &config.charts_dir)?;
    }

    println!();
    println!("Descriptive statistics for valid configurations:");
    print!("{}", stats::render_describe(&stats::describe(&rows)));
    Ok(())
}

fn parse_csv_list(raw: Option<String>) -> Vec<String> {
    raw.unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(ToString::to_string)
        .collect()
}
