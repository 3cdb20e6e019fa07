//! Text encoding resolution for exported transcripts.
//!
//! Exports produced on different devices arrive in different encodings. The
//! resolver tries a prioritized list of candidates and keeps the first one
//! that decodes the whole file without error. There is no byte-level
//! guessing beyond that.
//!
//! Latin-1 maps every byte to a code point, so it never fails. With the
//! default order it therefore shadows Windows-1252 and UTF-16; those are
//! reachable by passing a custom candidate list.

use std::borrow::Cow;
use std::fmt;
use std::fs;
use std::path::Path;

use encoding_rs::{Encoding, UTF_16BE, UTF_16LE, WINDOWS_1252};
use serde::{Deserialize, Serialize};

use crate::error::{ChatlensError, Result};

/// A candidate text encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TextEncoding {
    /// Strict UTF-8
    Utf8,
    /// UTF-8 with an optional byte-order-mark signature
    Utf8Sig,
    /// ISO-8859-1
    Latin1,
    /// Windows code page 1252
    Windows1252,
    /// UTF-16, byte order taken from the BOM (little-endian without one)
    Utf16,
}

impl TextEncoding {
    /// The order candidates are tried in by default.
    pub const DEFAULT_ORDER: [TextEncoding; 5] = [
        TextEncoding::Utf8,
        TextEncoding::Utf8Sig,
        TextEncoding::Latin1,
        TextEncoding::Windows1252,
        TextEncoding::Utf16,
    ];

    /// Human-readable encoding name.
    pub fn name(self) -> &'static str {
        match self {
            TextEncoding::Utf8 => "UTF-8",
            TextEncoding::Utf8Sig => "UTF-8-SIG",
            TextEncoding::Latin1 => "Latin-1",
            TextEncoding::Windows1252 => "Windows-1252",
            TextEncoding::Utf16 => "UTF-16",
        }
    }

    /// Decodes `bytes`, returning `None` if any part is malformed.
    pub fn decode(self, bytes: &[u8]) -> Option<String> {
        match self {
            TextEncoding::Utf8 => std::str::from_utf8(bytes).ok().map(str::to_owned),
            TextEncoding::Utf8Sig => {
                let body = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
                std::str::from_utf8(body).ok().map(str::to_owned)
            }
            TextEncoding::Latin1 => Some(encoding_rs::mem::decode_latin1(bytes).into_owned()),
            TextEncoding::Windows1252 => WINDOWS_1252
                .decode_without_bom_handling_and_without_replacement(bytes)
                .map(Cow::into_owned),
            TextEncoding::Utf16 => decode_utf16(bytes),
        }
    }
}

impl fmt::Display for TextEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

fn decode_utf16(bytes: &[u8]) -> Option<String> {
    let (encoding, bom_len): (&'static Encoding, usize) = match Encoding::for_bom(bytes) {
        Some((enc, len)) if enc == UTF_16LE || enc == UTF_16BE => (enc, len),
        Some(_) => return None,
        None => (UTF_16LE, 0),
    };
    let body = &bytes[bom_len..];
    if body.len() % 2 != 0 {
        return None;
    }
    encoding
        .decode_without_bom_handling_and_without_replacement(body)
        .map(Cow::into_owned)
}

/// Decoded file content together with the encoding that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedText {
    pub text: String,
    pub encoding: TextEncoding,
}

/// Decodes `bytes` with the first candidate that succeeds.
///
/// Returns `None` when every candidate fails; callers attach the path.
pub fn decode_bytes(bytes: &[u8], candidates: &[TextEncoding]) -> Option<DecodedText> {
    candidates.iter().find_map(|&encoding| {
        let decoded = encoding.decode(bytes);
        if decoded.is_none() {
            tracing::debug!(encoding = encoding.name(), "decode failed, trying next candidate");
        }
        decoded.map(|text| DecodedText { text, encoding })
    })
}

/// Reads a file and decodes it with the first working candidate encoding.
///
/// # Errors
///
/// - [`ChatlensError::Io`] if the file cannot be read
/// - [`ChatlensError::Encoding`] if no candidate decodes it
pub fn read_file(path: &Path, candidates: &[TextEncoding]) -> Result<DecodedText> {
    let bytes = fs::read(path)?;
    decode_bytes(&bytes, candidates).ok_or_else(|| {
        ChatlensError::encoding(
            Some(path.to_path_buf()),
            candidates.iter().map(|e| e.name()).collect(),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_utf8_wins_first() {
        let decoded = decode_bytes("Привет 👋".as_bytes(), &TextEncoding::DEFAULT_ORDER).unwrap();
        assert_eq!(decoded.encoding, TextEncoding::Utf8);
        assert_eq!(decoded.text, "Привет 👋");
    }

    #[test]
    fn test_utf8_sig_strips_bom() {
        let bytes = b"\xEF\xBB\xBFhello";
        assert_eq!(TextEncoding::Utf8Sig.decode(bytes).unwrap(), "hello");
        // Plain UTF-8 keeps the BOM as a character
        assert_eq!(TextEncoding::Utf8.decode(bytes).unwrap(), "\u{feff}hello");
    }

    #[test]
    fn test_invalid_utf8_falls_back_to_latin1() {
        let bytes = b"caf\xE9";
        let decoded = decode_bytes(bytes, &TextEncoding::DEFAULT_ORDER).unwrap();
        assert_eq!(decoded.encoding, TextEncoding::Latin1);
        assert_eq!(decoded.text, "café");
    }

    #[test]
    fn test_windows_1252_specials() {
        // 0x80 is the euro sign in cp1252 but a C1 control in Latin-1
        let decoded = TextEncoding::Windows1252.decode(b"\x80 5").unwrap();
        assert_eq!(decoded, "€ 5");
    }

    #[test]
    fn test_utf16_with_bom() {
        let mut bytes = vec![0xFF, 0xFE];
        for unit in "hi".encode_utf16() {
            bytes.extend_from_slice(&unit.to_le_bytes());
        }
        let decoded = decode_bytes(&bytes, &[TextEncoding::Utf8, TextEncoding::Utf16]).unwrap();
        assert_eq!(decoded.encoding, TextEncoding::Utf16);
        assert_eq!(decoded.text, "hi");
    }

    #[test]
    fn test_utf16_odd_length_fails() {
        assert!(TextEncoding::Utf16.decode(&[0x41, 0x00, 0x42]).is_none());
    }

    #[test]
    fn test_no_candidate_succeeds() {
        assert!(decode_bytes(b"\xFF\xFF\xFF", &[TextEncoding::Utf8, TextEncoding::Utf8Sig]).is_none());
    }

    #[test]
    fn test_read_file_reports_encoding_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.txt");
        fs::write(&path, b"\xC3\x28").unwrap();

        let err = read_file(&path, &[TextEncoding::Utf8]).unwrap_err();
        assert!(err.is_encoding());
    }

    #[test]
    fn test_read_file_missing_is_io() {
        let err = read_file(Path::new("/definitely/not/here.txt"), &TextEncoding::DEFAULT_ORDER)
            .unwrap_err();
        assert!(err.is_io());
    }
}
