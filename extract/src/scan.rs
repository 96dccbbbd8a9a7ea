//! Results directory scanning and per-file analysis.

use std::fs;
use std::path::Path;

use cacti_report_core::{ReportOutcome, ReportRecord};
use tracing::{debug, info, warn};

use crate::config::AnalysisConfig;
use crate::error::Result;
use crate::reader::{TextEncoding, read_report};

/// Records produced by one pass over a results directory, in listing order.
#[derive(Debug, Clone, Default)]
pub struct AnalysisRun {
    pub records: Vec<ReportRecord>,
}

/// Valid versus non-valid tallies for the console summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RunSummary {
    pub total: usize,
    pub valid: usize,
    /// Invalid configurations and errors together.
    pub rejected: usize,
}

impl AnalysisRun {
    pub fn summary(&self) -> RunSummary {
        let valid = self
            .records
            .iter()
            .filter(|record| record.status().is_valid())
            .count();
        RunSummary {
            total: self.records.len(),
            valid,
            rejected: self.records.len() - valid,
        }
    }
}

/// Reads, classifies and extracts one report file.
///
/// Never fails: read problems become an error record with the I/O cause as
/// the reason.
pub fn analyze_file(path: &Path, encodings: &[TextEncoding]) -> ReportRecord {
    let filename = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    let decoded = match read_report(path, encodings) {
        Ok(decoded) => decoded,
        Err(err) => {
            warn!(file = %filename, error = %err, "Failed to read report");
            return ReportRecord::error(filename, format!("Read error: {}", io_cause(&err)));
        }
    };

    let record = crate::analyze_text(&filename, &decoded.content);
    match &record.outcome {
        ReportOutcome::Valid(report) => debug!(
            file = %filename,
            metrics = report.metrics.len(),
            area = report.area.is_some(),
            "Extracted metrics"
        ),
        ReportOutcome::Invalid { reason } => {
            debug!(file = %filename, reason = %reason, "Invalid configuration")
        }
        ReportOutcome::Error { .. } => debug!(file = %filename, "Report carries an error marker"),
    }
    record
}

/// Analyzes every report in `config.results_dir`, one file at a time.
///
/// Rows follow directory listing order; entries whose name does not end with
/// the configured extension are skipped.
///
/// # Errors
///
/// Returns [`Io`](crate::ExtractError::Io) only when the directory itself
/// cannot be listed. Per-file failures are captured as error records.
pub fn analyze_directory(config: &AnalysisConfig) -> Result<AnalysisRun> {
    let mut run = AnalysisRun::default();

    for entry in fs::read_dir(&config.results_dir)? {
        let entry = entry?;
        let name = entry.file_name();
        let name = name.to_string_lossy();
        if !config.matches_extension(&name) {
            continue;
        }
        run.records
            .push(analyze_file(&entry.path(), &config.encodings));
    }

    let summary = run.summary();
    info!(
        dir = %config.results_dir.display(),
        total = summary.total,
        valid = summary.valid,
        rejected = summary.rejected,
        "Analyzed results directory"
    );
    Ok(run)
}

/// The bare I/O message, without the error-type prefix.
fn io_cause(err: &crate::ExtractError) -> String {
    match err {
        crate::ExtractError::Io(io) => io.to_string(),
        other => other.to_string(),
    }
}
