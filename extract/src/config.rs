//! Analysis run configuration.
//!
//! Defines the YAML-serializable configuration for an analysis run. Every
//! field is optional in the file; missing fields take the defaults below.
//!
//! # Example YAML
//!
//! ```yaml
//! results_dir: resultados_cacti
//! output_csv: cacti_results_summary.csv
//! error_log: cacti_analysis_errors.log
//! charts_dir: charts
//! extension: out
//! encodings:
//!   - utf-8
//!   - cp1252
//! ```

use std::io::BufReader;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::reader::{DEFAULT_ENCODINGS, TextEncoding};

pub const DEFAULT_RESULTS_DIR: &str = "resultados_cacti";
pub const DEFAULT_OUTPUT_CSV: &str = "cacti_results_summary.csv";
pub const DEFAULT_ERROR_LOG: &str = "cacti_analysis_errors.log";
pub const DEFAULT_EXTENSION: &str = "out";

/// Settings for one analysis run.
///
/// # Examples
///
/// ```
/// use cacti_report_extract::config::AnalysisConfig;
///
/// let config = AnalysisConfig::default();
/// assert_eq!(config.extension, "out");
/// assert!(config.matches_extension("cache_4096_64_8.out"));
/// assert!(!config.matches_extension("notes.txt"));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Directory holding the CACTI report files.
    pub results_dir: PathBuf,
    /// Path of the CSV summary table.
    pub output_csv: PathBuf,
    /// Append-only log for visualization failures.
    pub error_log: PathBuf,
    /// Directory receiving the chart images.
    pub charts_dir: PathBuf,
    /// Report file extension, without the leading dot.
    pub extension: String,
    /// Decode priority list.
    pub encodings: Vec<TextEncoding>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            results_dir: PathBuf::from(DEFAULT_RESULTS_DIR),
            output_csv: PathBuf::from(DEFAULT_OUTPUT_CSV),
            error_log: PathBuf::from(DEFAULT_ERROR_LOG),
            charts_dir: PathBuf::from("."),
            extension: DEFAULT_EXTENSION.to_string(),
            encodings: DEFAULT_ENCODINGS.to_vec(),
        }
    }
}

impl AnalysisConfig {
    /// Loads configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns [`Io`](crate::ExtractError::Io) if the file cannot be read, or
    /// [`Yaml`](crate::ExtractError::Yaml) if parsing fails.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        let reader = BufReader::new(file);
        let config = serde_yaml::from_reader(reader)?;
        Ok(config)
    }

    /// Returns `true` when `filename` ends with `.<extension>`.
    pub fn matches_extension(&self, filename: &str) -> bool {
        let extension = self.extension.trim_start_matches('.');
        filename
            .strip_suffix(extension)
            .is_some_and(|stem| stem.ends_with('.'))
    }
}
