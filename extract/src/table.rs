//! Tabular summary artifact.
//!
//! Every record becomes one CSV row with the fixed [`COLUMNS`] schema. Cells
//! the record does not populate hold [`NOT_AVAILABLE`]. The chart and
//! statistics stages read the file back through [`load_valid_rows`], so they
//! depend only on the table, not on the in-memory records.

use std::fs::File;
use std::io::{BufWriter, Read, Write};
use std::path::Path;

use cacti_report_core::{Metric, ReportOutcome, ReportRecord, ReportStatus, format_float};

use crate::error::{ExtractError, Result};

/// Placeholder written for absent values.
pub const NOT_AVAILABLE: &str = "N/A";

/// Column order of the summary table.
pub const COLUMNS: [&str; 14] = [
    "filename",
    "status",
    "cache_size",
    "block_size",
    "associativity",
    "access_time",
    "cycle_time",
    "read_energy",
    "write_energy",
    "leakage_power",
    "area_mm2",
    "efficiency",
    "sets",
    "banks",
];

/// Columns coerced to numbers for charts and descriptive statistics.
pub const NUMERIC_COLUMNS: [&str; 7] = [
    "access_time",
    "cycle_time",
    "read_energy",
    "write_energy",
    "leakage_power",
    "area_mm2",
    "efficiency",
];

/// Cell value of `column` for `record`, or `None` when the record does not
/// populate it.
pub fn cell(record: &ReportRecord, column: &str) -> Option<String> {
    match column {
        "filename" => return Some(record.filename.clone()),
        "status" => return Some(record.status().to_string()),
        _ => {}
    }

    let ReportOutcome::Valid(report) = &record.outcome else {
        return None;
    };

    match column {
        "cache_size" => Some(report.parameters.cache_size.clone()),
        "block_size" => Some(report.parameters.block_size.clone()),
        "associativity" => Some(report.parameters.associativity.clone()),
        "area_mm2" => report.area.map(|area| format_float(area.area_mm2)),
        "efficiency" => report.efficiency.map(format_float),
        _ => Metric::ALL
            .into_iter()
            .find(|metric| metric.column_name() == column)
            .and_then(|metric| report.metric(metric))
            .map(ToString::to_string),
    }
}

/// Full row for `record` in [`COLUMNS`] order, placeholders included.
pub fn row(record: &ReportRecord) -> Vec<String> {
    COLUMNS
        .iter()
        .map(|column| cell(record, column).unwrap_or_else(|| NOT_AVAILABLE.to_string()))
        .collect()
}

/// Writes the header and one row per record to `writer`.
pub fn write_table_to<W: Write>(writer: W, records: &[ReportRecord]) -> Result<()> {
    let mut csv = csv::WriterBuilder::new()
        .terminator(csv::Terminator::CRLF)
        .from_writer(writer);
    csv.write_record(COLUMNS)?;
    for record in records {
        csv.write_record(row(record))?;
    }
    csv.flush()?;
    Ok(())
}

/// Writes the summary table to `path`, replacing any previous file.
///
/// # Errors
///
/// Returns [`Io`](ExtractError::Io) or [`Csv`](ExtractError::Csv) when the
/// file cannot be created or written.
pub fn write_table(path: &Path, records: &[ReportRecord]) -> Result<()> {
    let file = File::create(path)?;
    write_table_to(file, records)
}

/// A `status = valid` row read back from the summary table.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidRow {
    pub filename: String,
    pub block_size: String,
    pub associativity: String,
    /// Values of [`NUMERIC_COLUMNS`], in order; `None` where the cell is not
    /// a number.
    pub values: [Option<f64>; 7],
}

impl ValidRow {
    /// Numeric value of one of the [`NUMERIC_COLUMNS`].
    pub fn value(&self, column: &str) -> Option<f64> {
        NUMERIC_COLUMNS
            .iter()
            .position(|name| *name == column)
            .and_then(|idx| self.values[idx])
    }

    pub fn block_size_value(&self) -> Option<f64> {
        parse_number(&self.block_size)
    }

    pub fn associativity_value(&self) -> Option<f64> {
        parse_number(&self.associativity)
    }
}

/// Parses a cell as a finite number; placeholders and text yield `None`.
fn parse_number(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|value| value.is_finite())
}

/// Reads the valid rows of a summary table from `reader`.
pub fn load_valid_rows_from<R: Read>(reader: R) -> Result<Vec<ValidRow>> {
    let mut csv = csv::Reader::from_reader(reader);
    let headers = csv.headers()?.clone();
    let index_of = |name: &str| {
        headers.iter().position(|header| header == name).ok_or_else(|| {
            ExtractError::InvalidInput(format!("summary table has no '{name}' column"))
        })
    };

    let filename_idx = index_of("filename")?;
    let status_idx = index_of("status")?;
    let block_idx = index_of("block_size")?;
    let assoc_idx = index_of("associativity")?;
    let mut numeric_idx = [0usize; 7];
    for (slot, column) in numeric_idx.iter_mut().zip(NUMERIC_COLUMNS) {
        *slot = index_of(column)?;
    }

    let mut rows = Vec::new();
    for record in csv.records() {
        let record = record?;
        let field = |idx: usize| record.get(idx).unwrap_or_default();
        let valid = field(status_idx)
            .parse::<ReportStatus>()
            .is_ok_and(ReportStatus::is_valid);
        if !valid {
            continue;
        }
        rows.push(ValidRow {
            filename: field(filename_idx).to_string(),
            block_size: field(block_idx).to_string(),
            associativity: field(assoc_idx).to_string(),
            values: numeric_idx.map(|idx| parse_number(field(idx))),
        });
    }
    Ok(rows)
}

/// Reads the valid rows of the summary table at `path`.
///
/// # Errors
///
/// Fails when the file cannot be read, is not CSV, or lacks one of the
/// required columns.
pub fn load_valid_rows(path: &Path) -> Result<Vec<ValidRow>> {
    let file = File::open(path)?;
    load_valid_rows_from(file)
}

/// Writes every record, valid or not, as a pretty-printed JSON array.
///
/// Unlike the summary table this keeps `height_mm` and `width_mm`.
///
/// # Errors
///
/// Returns [`Io`](ExtractError::Io) or [`Json`](ExtractError::Json) when the
/// file cannot be created or the records cannot be written.
pub fn write_records_json(path: &Path, records: &[ReportRecord]) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut writer, records)?;
    writer.flush()?;
    Ok(())
}
