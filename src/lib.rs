//! Khmer text conversion between legacy 8-bit font encodings and Unicode.
//!
//! Decoding runs legacy bytes through a font's [`LegacyTable`] and regroups
//! the visual-order result into canonical clusters. Encoding runs the other
//! way: canonical text is put back into typing order and mapped through the
//! font's [`UnicodeTable`].

pub mod catalog;
pub mod codec;
pub mod constants;
pub mod converter;
pub mod decoder;
pub mod encoder;
pub mod encoding;
pub mod error;
pub mod normalizer;
pub mod visual;

pub use catalog::{FontCatalog, FontDefinition, FontId, FontInfo};
pub use codec::{LegacyTable, UnicodeTable};
pub use converter::{KhmerConverter, TargetFont};
pub use encoding::TextEncoding;
pub use error::{Error, Result};
