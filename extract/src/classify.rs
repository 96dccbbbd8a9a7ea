//! Report classification by self-reported status markers.
//!
//! The batch scripts that drive CACTI write their own markers into the
//! report when a configuration is rejected or a run fails. Detection is a
//! plain, case-sensitive substring search. The invalid-configuration marker
//! is checked first because rejected configurations may also print error
//! text.

/// Marker written when CACTI rejects the cache configuration.
pub const INVALID_CONFIG_MARKER: &str = "CONFIGURAÇÃO INVÁLIDA";

/// Marker preceding the rejection reason.
pub const REASON_MARKER: &str = "Motivo:";

/// Markers written when the run itself failed.
pub const ERROR_MARKERS: [&str; 2] = ["ERRO NA EXECUÇÃO", "ERROR"];

pub const GENERIC_INVALID_REASON: &str = "Invalid configuration";
pub const GENERIC_ERROR_REASON: &str = "Runtime error";

/// Status of decoded report content, decided before metric extraction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    Valid,
    Invalid { reason: String },
    Error { reason: String },
}

/// Classifies decoded report content.
///
/// # Examples
///
/// ```
/// use cacti_report_extract::classify::{Classification, classify};
///
/// let content = "CONFIGURAÇÃO INVÁLIDA\nMotivo: excede área máxima\n";
/// assert_eq!(
///     classify(content),
///     Classification::Invalid { reason: "excede área máxima".to_string() }
/// );
/// assert_eq!(classify("Access time (ns): 1.25"), Classification::Valid);
/// ```
pub fn classify(content: &str) -> Classification {
    if content.contains(INVALID_CONFIG_MARKER) {
        return Classification::Invalid {
            reason: invalid_reason(content),
        };
    }

    if ERROR_MARKERS.iter().any(|marker| content.contains(marker)) {
        return Classification::Error {
            reason: GENERIC_ERROR_REASON.to_string(),
        };
    }

    Classification::Valid
}

/// Text between the first reason marker and the next one (or the end),
/// trimmed. Falls back to the generic reason when that text is missing or
/// blank.
fn invalid_reason(content: &str) -> String {
    content
        .split(REASON_MARKER)
        .nth(1)
        .map(str::trim)
        .filter(|reason| !reason.is_empty())
        .unwrap_or(GENERIC_INVALID_REASON)
        .to_string()
}
