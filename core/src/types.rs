//! Report record definitions for CACTI output analysis.
//!
//! One [`ReportRecord`] is produced per report file. Its [`ReportOutcome`]
//! carries the classification together with everything that depends on it:
//! a reason for invalid and error reports, extracted metrics for valid ones.
//! The types serialize with [`serde`] so records can be dumped as JSON next
//! to the tabular artifact.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Cache size used when the file name carries no size segment.
pub const DEFAULT_CACHE_SIZE: &str = "2048";

/// Placeholder for block size or associativity missing from the file name.
pub const UNKNOWN_PARAMETER: &str = "?";

/// Classification of a report file.
///
/// # Examples
///
/// ```
/// use cacti_report_core::ReportStatus;
///
/// assert_eq!(ReportStatus::Invalid.to_string(), "invalid");
/// assert!(ReportStatus::Valid.is_valid());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportStatus {
    /// The report carried usable metrics.
    Valid,
    /// The tool rejected the cache configuration.
    Invalid,
    /// The file could not be read or the tool reported a runtime error.
    Error,
}

impl ReportStatus {
    /// Returns the lowercase label used in the tabular artifact.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Valid => "valid",
            Self::Invalid => "invalid",
            Self::Error => "error",
        }
    }

    pub fn is_valid(self) -> bool {
        self == Self::Valid
    }
}

impl fmt::Display for ReportStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReportStatus {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim() {
            "valid" => Ok(Self::Valid),
            "invalid" => Ok(Self::Invalid),
            "error" => Ok(Self::Error),
            other => Err(format!("unknown report status '{other}'")),
        }
    }
}

/// Metric vocabulary extracted from report content.
///
/// Area is not part of the vocabulary: height and width are matched by a
/// single two-value label and always travel together as [`AreaMetrics`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    AccessTime,
    CycleTime,
    ReadEnergy,
    WriteEnergy,
    LeakagePower,
    Sets,
    Banks,
}

impl Metric {
    /// Every metric, in extraction order.
    pub const ALL: [Metric; 7] = [
        Metric::AccessTime,
        Metric::CycleTime,
        Metric::ReadEnergy,
        Metric::WriteEnergy,
        Metric::LeakagePower,
        Metric::Sets,
        Metric::Banks,
    ];

    /// Column name of this metric in the tabular artifact.
    pub fn column_name(self) -> &'static str {
        match self {
            Self::AccessTime => "access_time",
            Self::CycleTime => "cycle_time",
            Self::ReadEnergy => "read_energy",
            Self::WriteEnergy => "write_energy",
            Self::LeakagePower => "leakage_power",
            Self::Sets => "sets",
            Self::Banks => "banks",
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column_name())
    }
}

/// A matched metric value.
///
/// Values that look like plain decimals become [`MetricValue::Number`];
/// anything else is kept verbatim as [`MetricValue::Text`].
///
/// # Examples
///
/// ```
/// use cacti_report_core::MetricValue;
///
/// assert_eq!(MetricValue::Number(1.25).to_string(), "1.25");
/// assert_eq!(MetricValue::Number(4096.0).to_string(), "4096.0");
/// assert_eq!(MetricValue::Text("1.2.3".into()).as_f64(), None);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetricValue {
    Number(f64),
    Text(String),
}

impl MetricValue {
    /// Numeric view of the value.
    ///
    /// Text values are parsed once more, so a textual value that still reads
    /// as a float yields a number. Returns `None` otherwise.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(value) => Some(*value),
            Self::Text(raw) => raw.trim().parse().ok(),
        }
    }
}

impl fmt::Display for MetricValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(value) => write!(f, "{}", format_float(*value)),
            Self::Text(raw) => f.write_str(raw),
        }
    }
}

/// Formats a float the way the summary table expects.
///
/// Uses the shortest round-trip digits. Whole numbers keep a single decimal
/// (`64.0`). Magnitudes below `1e-4` or from `1e16` up switch to exponent
/// form with a signed, two-digit exponent (`1e-05`, `2.5e+16`).
pub fn format_float(value: f64) -> String {
    if value.is_nan() {
        return "nan".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "inf" } else { "-inf" }.to_string();
    }

    let scientific = format!("{value:e}");
    let (mantissa, exponent) = scientific.split_once('e').unwrap_or((scientific.as_str(), "0"));
    let exponent: i32 = exponent.parse().unwrap_or(0);
    if value != 0.0 && !(-4..16).contains(&exponent) {
        let sign = if exponent < 0 { '-' } else { '+' };
        return format!("{mantissa}e{sign}{:02}", exponent.unsigned_abs());
    }

    let plain = format!("{value}");
    if plain.contains('.') {
        plain
    } else {
        format!("{plain}.0")
    }
}

/// Cache configuration parameters of one report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheParameters {
    pub cache_size: String,
    pub block_size: String,
    pub associativity: String,
}

impl Default for CacheParameters {
    fn default() -> Self {
        Self {
            cache_size: DEFAULT_CACHE_SIZE.to_string(),
            block_size: UNKNOWN_PARAMETER.to_string(),
            associativity: UNKNOWN_PARAMETER.to_string(),
        }
    }
}

/// Physical dimensions of the modeled cache.
///
/// Only constructed when both height and width were numeric, so the three
/// values are present together or not at all.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AreaMetrics {
    pub height_mm: f64,
    pub width_mm: f64,
    pub area_mm2: f64,
}

impl AreaMetrics {
    pub fn new(height_mm: f64, width_mm: f64) -> Self {
        Self {
            height_mm,
            width_mm,
            area_mm2: height_mm * width_mm,
        }
    }
}

/// Everything extracted from a report classified as valid.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ValidReport {
    #[serde(flatten)]
    pub parameters: CacheParameters,
    /// Metrics whose label was found; absent labels have no entry.
    #[serde(default)]
    pub metrics: BTreeMap<Metric, MetricValue>,
    #[serde(flatten)]
    pub area: Option<AreaMetrics>,
    /// `access_time / cycle_time`, when both are numeric and the ratio is defined.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub efficiency: Option<f64>,
}

impl ValidReport {
    pub fn metric(&self, metric: Metric) -> Option<&MetricValue> {
        self.metrics.get(&metric)
    }
}

/// Classification of a report together with its payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ReportOutcome {
    Valid(ValidReport),
    Invalid { reason: String },
    Error { reason: String },
}

/// Per-file result of classification and extraction.
///
/// # Examples
///
/// ```
/// use cacti_report_core::{ReportRecord, ReportStatus};
///
/// let record = ReportRecord::error("cache_1_2_3.out", "Runtime error");
/// assert_eq!(record.status(), ReportStatus::Error);
/// assert_eq!(record.reason(), Some("Runtime error"));
/// assert!(record.valid_report().is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportRecord {
    pub filename: String,
    #[serde(flatten)]
    pub outcome: ReportOutcome,
}

impl ReportRecord {
    pub fn valid(filename: impl Into<String>, report: ValidReport) -> Self {
        Self {
            filename: filename.into(),
            outcome: ReportOutcome::Valid(report),
        }
    }

    pub fn invalid(filename: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            outcome: ReportOutcome::Invalid {
                reason: reason.into(),
            },
        }
    }

    pub fn error(filename: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            outcome: ReportOutcome::Error {
                reason: reason.into(),
            },
        }
    }

    pub fn status(&self) -> ReportStatus {
        match self.outcome {
            ReportOutcome::Valid(_) => ReportStatus::Valid,
            ReportOutcome::Invalid { .. } => ReportStatus::Invalid,
            ReportOutcome::Error { .. } => ReportStatus::Error,
        }
    }

    /// Explanation for non-valid records; `None` for valid ones.
    pub fn reason(&self) -> Option<&str> {
        match &self.outcome {
            ReportOutcome::Valid(_) => None,
            ReportOutcome::Invalid { reason } | ReportOutcome::Error { reason } => Some(reason),
        }
    }

    /// The extracted payload, when the record is valid.
    pub fn valid_report(&self) -> Option<&ValidReport> {
        match &self.outcome {
            ReportOutcome::Valid(report) => Some(report),
            _ => None,
        }
    }
}
