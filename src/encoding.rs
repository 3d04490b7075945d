//! Byte encodings legacy documents arrive in.
//!
//! Legacy Khmer fonts put glyphs at Windows-1252 byte positions, so the codec
//! tables are keyed by cp1252 bytes. Text saved as Latin-1 or UTF-8 has to be
//! brought back to those bytes first.

use std::fmt;
use std::str::FromStr;

use encoding_rs::WINDOWS_1252;

use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextEncoding {
    #[default]
    Cp1252,
    Latin1,
    Utf8,
}

impl TextEncoding {
    pub fn label(self) -> &'static str {
        match self {
            TextEncoding::Cp1252 => "cp1252",
            TextEncoding::Latin1 => "latin-1",
            TextEncoding::Utf8 => "utf-8",
        }
    }

    pub fn display_names() -> &'static [&'static str] {
        &["cp1252", "latin-1", "utf-8"]
    }

    /// Turns raw input bytes into the cp1252 bytes the legacy tables expect.
    pub fn to_legacy_bytes(self, input: &[u8]) -> Result<Vec<u8>> {
        match self {
            TextEncoding::Cp1252 => Ok(input.to_vec()),
            TextEncoding::Latin1 => {
                let text: String = input.iter().map(|&b| char::from(b)).collect();
                encode_cp1252(&text)
            }
            TextEncoding::Utf8 => encode_cp1252(decode_utf8(input)?),
        }
    }
}

fn encode_cp1252(text: &str) -> Result<Vec<u8>> {
    let (bytes, _, had_errors) = WINDOWS_1252.encode(text);
    if had_errors {
        return Err(Error::type_mismatch(
            "input has characters outside the cp1252 code page",
        ));
    }
    Ok(bytes.into_owned())
}

/// Reads Unicode input for the encoding direction.
pub fn decode_utf8(input: &[u8]) -> Result<&str> {
    std::str::from_utf8(input)
        .map_err(|err| Error::type_mismatch(format!("input is not UTF-8 text: {}", err)))
}

impl FromStr for TextEncoding {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().replace('_', "-").as_str() {
            "cp1252" | "windows-1252" => Ok(TextEncoding::Cp1252),
            "latin-1" | "latin1" | "iso-8859-1" => Ok(TextEncoding::Latin1),
            "utf-8" | "utf8" => Ok(TextEncoding::Utf8),
            other => Err(Error::type_mismatch(format!(
                "unknown encoding '{}', expected one of {}",
                other,
                Self::display_names().join(", ")
            ))),
        }
    }
}

impl fmt::Display for TextEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
