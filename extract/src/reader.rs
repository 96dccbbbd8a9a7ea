//! Report file reading with encoding fallback.
//!
//! CACTI runs collected from different machines do not agree on a text
//! encoding. A report is read into memory once, then decoded with each
//! encoding of a priority list until one succeeds. When none does, the bytes
//! are decoded as lossy UTF-8 so the report can still be classified.

use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ExtractError, Result};

/// Text encodings accepted in the decode priority list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TextEncoding {
    #[serde(rename = "utf-8", alias = "utf8")]
    Utf8,
    #[serde(rename = "latin-1", alias = "latin1")]
    Latin1,
    #[serde(rename = "cp1252", alias = "windows-1252")]
    Windows1252,
    #[serde(rename = "iso-8859-1", alias = "iso8859-1")]
    Iso8859_1,
}

/// Default decode order.
pub const DEFAULT_ENCODINGS: [TextEncoding; 4] = [
    TextEncoding::Utf8,
    TextEncoding::Latin1,
    TextEncoding::Windows1252,
    TextEncoding::Iso8859_1,
];

/// Characters for bytes 0x80..=0x9F in Windows-1252. `None` marks the five
/// bytes the code page leaves undefined.
const CP1252_HIGH: [Option<char>; 32] = [
    Some('\u{20AC}'),
    None,
    Some('\u{201A}'),
    Some('\u{0192}'),
    Some('\u{201E}'),
    Some('\u{2026}'),
    Some('\u{2020}'),
    Some('\u{2021}'),
    Some('\u{02C6}'),
    Some('\u{2030}'),
    Some('\u{0160}'),
    Some('\u{2039}'),
    Some('\u{0152}'),
    None,
    Some('\u{017D}'),
    None,
    None,
    Some('\u{2018}'),
    Some('\u{2019}'),
    Some('\u{201C}'),
    Some('\u{201D}'),
    Some('\u{2022}'),
    Some('\u{2013}'),
    Some('\u{2014}'),
    Some('\u{02DC}'),
    Some('\u{2122}'),
    Some('\u{0161}'),
    Some('\u{203A}'),
    Some('\u{0153}'),
    None,
    Some('\u{017E}'),
    Some('\u{0178}'),
];

impl TextEncoding {
    pub fn label(self) -> &'static str {
        match self {
            Self::Utf8 => "utf-8",
            Self::Latin1 => "latin-1",
            Self::Windows1252 => "cp1252",
            Self::Iso8859_1 => "iso-8859-1",
        }
    }

    /// Decodes `bytes` strictly, returning `None` on the first byte sequence
    /// the encoding cannot represent.
    pub fn decode(self, bytes: &[u8]) -> Option<String> {
        match self {
            Self::Utf8 => std::str::from_utf8(bytes).ok().map(str::to_owned),
            // ISO-8859-1 maps every byte to the code point of the same value.
            Self::Latin1 | Self::Iso8859_1 => Some(bytes.iter().map(|&b| char::from(b)).collect()),
            Self::Windows1252 => bytes
                .iter()
                .map(|&b| match b {
                    0x80..=0x9F => CP1252_HIGH[usize::from(b - 0x80)],
                    _ => Some(char::from(b)),
                })
                .collect(),
        }
    }
}

impl fmt::Display for TextEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for TextEncoding {
    type Err = ExtractError;

    fn from_str(raw: &str) -> Result<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "utf-8" | "utf8" => Ok(Self::Utf8),
            "latin-1" | "latin1" => Ok(Self::Latin1),
            "cp1252" | "windows-1252" => Ok(Self::Windows1252),
            "iso-8859-1" | "iso8859-1" => Ok(Self::Iso8859_1),
            other => Err(ExtractError::InvalidInput(format!(
                "unknown text encoding '{other}'"
            ))),
        }
    }
}

/// Text decoded from a report file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedText {
    pub content: String,
    /// Encoding that decoded the file; `None` when the lossy fallback was used.
    pub encoding: Option<TextEncoding>,
}

impl DecodedText {
    pub fn is_lossy(&self) -> bool {
        self.encoding.is_none()
    }
}

/// Decodes raw report bytes with the first encoding in `encodings` that
/// accepts them, falling back to lossy UTF-8.
pub fn decode_report(bytes: &[u8], encodings: &[TextEncoding]) -> DecodedText {
    for &encoding in encodings {
        if let Some(content) = encoding.decode(bytes) {
            return DecodedText {
                content,
                encoding: Some(encoding),
            };
        }
        debug!(encoding = %encoding, "Decode attempt failed");
    }

    DecodedText {
        content: String::from_utf8_lossy(bytes).into_owned(),
        encoding: None,
    }
}

/// Reads and decodes a report file.
///
/// # Errors
///
/// Returns [`ExtractError::Io`] when the file cannot be opened or read.
/// Decoding itself never fails.
pub fn read_report(path: &Path, encodings: &[TextEncoding]) -> Result<DecodedText> {
    let bytes = fs::read(path)?;
    let decoded = decode_report(&bytes, encodings);
    debug!(
        path = %path.display(),
        encoding = decoded.encoding.map_or("lossy", TextEncoding::label),
        "Decoded report"
    );
    Ok(decoded)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_utf8_preferred_when_valid() {
        let decoded = decode_report("CONFIGURAÇÃO".as_bytes(), &DEFAULT_ENCODINGS);
        assert_eq!(decoded.encoding, Some(TextEncoding::Utf8));
        assert_eq!(decoded.content, "CONFIGURAÇÃO");
    }

    #[test]
    fn test_latin1_fallback_for_non_utf8_bytes() {
        // "ÇÃO" in ISO-8859-1
        let bytes = [b'A', 0xC7, 0xC3, b'O'];
        let decoded = decode_report(&bytes, &DEFAULT_ENCODINGS);
        assert_eq!(decoded.encoding, Some(TextEncoding::Latin1));
        assert_eq!(decoded.content, "AÇÃO");
    }

    #[test]
    fn test_cp1252_maps_high_range() {
        let decoded = TextEncoding::Windows1252.decode(&[0x80, b' ', 0x93, b'x', 0x94]);
        assert_eq!(decoded.as_deref(), Some("€ \u{201C}x\u{201D}"));
    }

    #[test]
    fn test_cp1252_rejects_undefined_bytes() {
        for byte in [0x81, 0x8D, 0x8F, 0x90, 0x9D] {
            assert_eq!(TextEncoding::Windows1252.decode(&[b'a', byte]), None);
        }
    }

    #[test]
    fn test_lossy_fallback_when_every_encoding_fails() {
        let bytes = [b'o', b'k', 0xFF, 0x81];
        let decoded = decode_report(&bytes, &[TextEncoding::Utf8, TextEncoding::Windows1252]);
        assert!(decoded.is_lossy());
        assert!(decoded.content.starts_with("ok"));
        assert!(decoded.content.contains('\u{FFFD}'));
    }

    #[test]
    fn test_empty_priority_list_goes_straight_to_lossy() {
        let decoded = decode_report(b"plain", &[]);
        assert!(decoded.is_lossy());
        assert_eq!(decoded.content, "plain");
    }

    #[test]
    fn test_encoding_names_parse() {
        assert_eq!("UTF-8".parse::<TextEncoding>().unwrap(), TextEncoding::Utf8);
        assert_eq!("latin1".parse::<TextEncoding>().unwrap(), TextEncoding::Latin1);
        assert_eq!(
            "windows-1252".parse::<TextEncoding>().unwrap(),
            TextEncoding::Windows1252
        );
        assert!("ebcdic".parse::<TextEncoding>().is_err());
    }

    #[test]
    fn test_read_report_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_report(&dir.path().join("absent.out"), &DEFAULT_ENCODINGS).unwrap_err();
        assert!(matches!(err, ExtractError::Io(_)));
    }
}
