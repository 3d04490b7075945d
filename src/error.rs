//! Error types for the converter.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// Malformed or contradictory font catalog data
    #[error("Invalid font catalog: {reason}")]
    Catalog { reason: String },

    /// Font name unknown to the catalog, or hidden
    #[error("Font '{name}' is unknown")]
    FontNotFound { name: String },

    /// Input of the wrong kind for the requested conversion
    #[error("Type mismatch: {reason}")]
    TypeMismatch { reason: String },

    #[error("Malformed catalog XML: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub(crate) fn catalog(reason: impl Into<String>) -> Self {
        Error::Catalog {
            reason: reason.into(),
        }
    }

    pub(crate) fn type_mismatch(reason: impl Into<String>) -> Self {
        Error::TypeMismatch {
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_font_not_found() {
        let err = Error::FontNotFound {
            name: "limon s9".to_string(),
        };
        assert_eq!(err.to_string(), "Font 'limon s9' is unknown");
    }

    #[test]
    fn test_error_display_catalog() {
        let msg = Error::catalog("no fonts found").to_string();
        assert!(msg.contains("Invalid font catalog"));
        assert!(msg.contains("no fonts found"));
    }
}
