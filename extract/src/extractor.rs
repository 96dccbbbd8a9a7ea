//! Labeled-field metric extraction from valid CACTI reports.
//!
//! Each metric has one label pattern. The first match in the content wins;
//! a label that never appears leaves the metric absent. Matched values are
//! coerced to numbers only when they look like plain decimals, so odd values
//! survive as text instead of failing the file.

use std::sync::LazyLock;

use cacti_report_core::{AreaMetrics, CacheParameters, Metric, MetricValue, ValidReport};
use regex::Regex;

/// Delimiter between the segments of a report file name.
pub const FILENAME_DELIMITER: char = '_';

/// Label patterns of the metric vocabulary, one capture group each.
pub const METRIC_LABELS: [(Metric, &str); 7] = [
    (Metric::AccessTime, r"Access time \(ns\):\s*([\d.]+)"),
    (Metric::CycleTime, r"Cycle time \(ns\):\s*([\d.]+)"),
    (Metric::ReadEnergy, r"Read Energy \(nJ\):\s*([\d.]+)"),
    (Metric::WriteEnergy, r"Write Energy \(nJ\):\s*([\d.]+)"),
    (
        Metric::LeakagePower,
        r"Leakage Power Closed Page \(mW\):\s*([\d.]+)",
    ),
    (Metric::Sets, r"Number of sets\s*:\s*(\d+)"),
    (Metric::Banks, r"Cache banks \(UCA\)\s*:\s*(\d+)"),
];

/// Height and width share one label with two captures.
pub const AREA_LABEL: &str = r"Cache height x width \(mm\):\s*([\d.]+) x ([\d.]+)";

pub const CACHE_SIZE_LABEL: &str = r"Cache size\s*:\s*(\d+)";
pub const BLOCK_SIZE_LABEL: &str = r"Block size\s*:\s*(\d+)";
pub const ASSOCIATIVITY_LABEL: &str = r"Associativity\s*:\s*(\d+)";

// SAFETY: These regexes are compile-time constants and are validated by tests.
static METRIC_PATTERNS: LazyLock<Vec<(Metric, Regex)>> = LazyLock::new(|| {
    METRIC_LABELS
        .iter()
        .map(|(metric, label)| {
            (
                *metric,
                Regex::new(label).expect("static regex must compile"),
            )
        })
        .collect()
});
static AREA_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(AREA_LABEL).expect("static regex must compile"));
static CACHE_SIZE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(CACHE_SIZE_LABEL).expect("static regex must compile"));
static BLOCK_SIZE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(BLOCK_SIZE_LABEL).expect("static regex must compile"));
static ASSOCIATIVITY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(ASSOCIATIVITY_LABEL).expect("static regex must compile"));

/// Derives cache parameters from a `<prefix>_<cache>_<block>_<assoc>.<ext>`
/// file name.
///
/// Only the associativity segment has its extension stripped. Missing
/// segments fall back to the defaults of [`CacheParameters`].
///
/// # Examples
///
/// ```
/// use cacti_report_extract::extractor::parameters_from_filename;
///
/// let params = parameters_from_filename("result_4096_64_8.out");
/// assert_eq!(params.cache_size, "4096");
/// assert_eq!(params.block_size, "64");
/// assert_eq!(params.associativity, "8");
///
/// let params = parameters_from_filename("result.out");
/// assert_eq!(params.cache_size, "2048");
/// assert_eq!(params.block_size, "?");
/// ```
pub fn parameters_from_filename(filename: &str) -> CacheParameters {
    let segments: Vec<&str> = filename.split(FILENAME_DELIMITER).collect();
    let mut params = CacheParameters::default();

    if let Some(cache_size) = segments.get(1) {
        params.cache_size = (*cache_size).to_string();
    }
    if let Some(block_size) = segments.get(2) {
        params.block_size = (*block_size).to_string();
    }
    if let Some(associativity) = segments.get(3) {
        let stem = associativity.split('.').next().unwrap_or_default();
        params.associativity = stem.to_string();
    }

    params
}

/// Coerces a matched value: plain decimals (digits with at most one `.`)
/// become numbers, anything else is kept as text.
///
/// Scientific notation and thousands separators stay text.
pub fn coerce_value(raw: &str) -> MetricValue {
    let digits = raw.replacen('.', "", 1);
    if !digits.is_empty() && digits.chars().all(char::is_numeric) {
        if let Ok(value) = raw.parse::<f64>() {
            return MetricValue::Number(value);
        }
    }
    MetricValue::Text(raw.to_string())
}

/// Extracts parameters, metrics and derived values from valid report content.
///
/// # Examples
///
/// ```
/// use cacti_report_core::{Metric, MetricValue};
/// use cacti_report_extract::extractor::extract_report;
///
/// let content = "Access time (ns): 1.25\nCycle time (ns): 2.5\n";
/// let report = extract_report("cache_4096_64_8.out", content);
/// assert_eq!(report.metric(Metric::AccessTime), Some(&MetricValue::Number(1.25)));
/// assert_eq!(report.efficiency, Some(0.5));
/// assert!(report.area.is_none());
/// ```
pub fn extract_report(filename: &str, content: &str) -> ValidReport {
    let mut parameters = parameters_from_filename(filename);
    override_parameters(&mut parameters, content);

    let metrics = METRIC_PATTERNS
        .iter()
        .filter_map(|(metric, pattern)| {
            let raw = first_capture(pattern, content)?;
            Some((*metric, coerce_value(raw)))
        })
        .collect();

    let mut report = ValidReport {
        parameters,
        metrics,
        area: extract_area(content),
        efficiency: None,
    };
    report.efficiency = efficiency(&report);
    report
}

/// Parameter labels printed by CACTI take precedence over the file name.
/// Their values go through the same coercion as metrics, so `4096` becomes
/// `4096.0`; file-name segments are kept verbatim.
fn override_parameters(parameters: &mut CacheParameters, content: &str) {
    let labelled = [
        (&*CACHE_SIZE_RE, &mut parameters.cache_size),
        (&*BLOCK_SIZE_RE, &mut parameters.block_size),
        (&*ASSOCIATIVITY_RE, &mut parameters.associativity),
    ];
    for (pattern, slot) in labelled {
        if let Some(raw) = first_capture(pattern, content) {
            *slot = coerce_value(raw).to_string();
        }
    }
}

fn first_capture<'a>(pattern: &Regex, content: &'a str) -> Option<&'a str> {
    pattern
        .captures(content)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Height and width must both parse, or no area value is produced.
fn extract_area(content: &str) -> Option<AreaMetrics> {
    let caps = AREA_RE.captures(content)?;
    let height = caps.get(1)?.as_str().parse::<f64>().ok()?;
    let width = caps.get(2)?.as_str().parse::<f64>().ok()?;
    Some(AreaMetrics::new(height, width))
}

fn efficiency(report: &ValidReport) -> Option<f64> {
    let access = report.metric(Metric::AccessTime)?.as_f64()?;
    let cycle = report.metric(Metric::CycleTime)?.as_f64()?;
    if cycle == 0.0 {
        return None;
    }
    let ratio = access / cycle;
    ratio.is_finite().then_some(ratio)
}
