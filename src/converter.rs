use std::sync::Arc;

use crate::catalog::FontCatalog;
use crate::decoder::process;
use crate::encoder::convert;
use crate::error::Result;
use crate::normalizer::reorder;
use crate::visual::legacy_reorder;

/// Font an encoded document should be displayed with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetFont {
    pub font_type: String,
    pub display_name: String,
    pub size: Option<u32>,
}

/// Both conversion directions over one shared catalog. Cloning is cheap and
/// clones share the catalog's memoized tables.
#[derive(Clone)]
pub struct KhmerConverter {
    catalog: Arc<FontCatalog>,
}

impl KhmerConverter {
    pub fn new(catalog: Arc<FontCatalog>) -> Self {
        KhmerConverter { catalog }
    }

    pub fn catalog(&self) -> &FontCatalog {
        &self.catalog
    }

    /// Legacy bytes in font `font` -> canonical Unicode.
    pub fn decode_from_legacy(&self, input: &[u8], font: &str) -> Result<String> {
        let id = self.catalog.resolve(font)?;
        let table = self.catalog.legacy_table(id)?;
        Ok(reorder(&process(input, &table)))
    }

    /// Canonical Unicode -> legacy bytes in font `font`.
    pub fn encode_to_legacy(&self, text: &str, font: &str) -> Result<Vec<u8>> {
        let id = self.catalog.resolve(font)?;
        let table = self.catalog.unicode_table(id)?;
        Ok(convert(&legacy_reorder(text), &table))
    }

    /// Display font for output encoded with `font`.
    pub fn target_font(&self, font: &str, size: Option<u32>) -> Result<TargetFont> {
        let id = self.catalog.resolve(font)?;
        let definition = self.catalog.font(id);
        Ok(TargetFont {
            font_type: definition.font_type().to_string(),
            display_name: definition.default_name().to_string(),
            size,
        })
    }
}
