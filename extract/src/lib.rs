//! Reading, classification and metric extraction for CACTI report files.
//!
//! A results directory holds one text report per simulated cache
//! configuration. This crate turns each report into a
//! [`ReportRecord`](cacti_report_core::ReportRecord) and the set of records
//! into a fixed-schema CSV table:
//!
//! 1. [`reader`] decodes the file, trying each configured encoding before
//!    falling back to lossy UTF-8.
//! 2. [`classify`] looks for the invalid-configuration and error markers.
//! 3. [`extractor`] matches the labeled metric fields of valid reports and
//!    derives area and efficiency.
//! 4. [`table`] writes the records as CSV and reads valid rows back for
//!    charting; [`stats`] summarizes the numeric columns.
//!
//! # Main entry points
//!
//! - [`analyze_directory`] scans a results directory.
//! - [`analyze_file`] handles a single report.
//! - [`analyze_text`] classifies and extracts already-decoded content.
//!
//! # Example
//!
//! ```
//! use cacti_report_core::ReportStatus;
//! use cacti_report_extract::analyze_text;
//!
//! let record = analyze_text(
//!     "result_4096_64_8.out",
//!     "Access time (ns): 1.25\nCycle time (ns): 2.5\n",
//! );
//! assert_eq!(record.status(), ReportStatus::Valid);
//! assert_eq!(record.valid_report().unwrap().efficiency, Some(0.5));
//!
//! let record = analyze_text("bad.out", "CONFIGURAÇÃO INVÁLIDA\nMotivo: excede área máxima");
//! assert_eq!(record.reason(), Some("excede área máxima"));
//! ```

pub mod classify;
pub mod config;
pub mod error;
pub mod extractor;
pub mod reader;
pub mod scan;
pub mod stats;
pub mod table;

pub use config::AnalysisConfig;
pub use error::{ExtractError, Result};
pub use scan::{AnalysisRun, RunSummary, analyze_directory, analyze_file};

use cacti_report_core::ReportRecord;
use classify::Classification;

/// Classifies decoded report content and extracts metrics when it is valid.
///
/// `filename` supplies the cache parameters encoded in the report name.
pub fn analyze_text(filename: &str, content: &str) -> ReportRecord {
    match classify::classify(content) {
        Classification::Invalid { reason } => ReportRecord::invalid(filename, reason),
        Classification::Error { reason } => ReportRecord::error(filename, reason),
        Classification::Valid => {
            ReportRecord::valid(filename, extractor::extract_report(filename, content))
        }
    }
}
