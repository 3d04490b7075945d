//! Font catalog: font definitions read from XML, and the codec tables built
//! from them on demand.
//!
//! A catalog document looks like this:
//!
//! ```xml
//! <fonts>
//!   <font type="abc" default="ABC-TEXT-05">
//!     <alias name="ABC-TEXT-05"/>
//!     <maps>
//!       <global><map unicode="ក" legacy="107"/></global>
//!       <tounicode><map unicode="ឬ" legacy="98;164"/></tounicode>
//!       <fromunicode><map unicode="«" legacy="178"/></fromunicode>
//!     </maps>
//!   </font>
//!   <font type="abc-zwsp" inherit="abc"/>
//! </fonts>
//! ```
//!
//! `global` entries feed both directions, `tounicode` only the legacy table and
//! `fromunicode` only the Unicode table. A font starts from a copy of its
//! parent's tables and layers its own entries on top.

use std::fs;
use std::hash::Hash;
use std::path::Path;
use std::sync::Arc;

use fxhash::{FxHashMap, FxHashSet};
use log::{debug, warn};
use once_cell::sync::OnceCell;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use serde::Serialize;

use crate::codec::{LegacyTable, UnicodeTable};
use crate::constants::{khmer_slot, MAX_KEY_LENGTH};
use crate::error::{Error, Result};

const LEGACY_SEPARATOR: char = ';';

/// Lookup key of a font name: lower case, `-` and `_` read as spaces.
pub fn beautify(name: &str) -> String {
    name.to_lowercase().replace(&['-', '_'][..], " ")
}

/// Index of a font inside the catalog that issued it. Ids are not
/// portable between catalogs: methods taking a `FontId` panic on an index
/// their catalog does not have. Use [`FontCatalog::get`] to check one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FontId(usize);

#[derive(Debug, Clone)]
struct MapEntry {
    unicode: String,
    legacy: Vec<u8>,
}

#[derive(Debug, Default)]
struct FontMaps {
    global: Vec<MapEntry>,
    to_unicode: Vec<MapEntry>,
    from_unicode: Vec<MapEntry>,
}

#[derive(Debug)]
pub struct FontDefinition {
    font_type: String,
    parent: Option<FontId>,
    aliases: Vec<String>,
    hidden: bool,
    default_name: Option<String>,
    maps: FontMaps,
    legacy: OnceCell<Arc<LegacyTable>>,
    unicode: OnceCell<Arc<UnicodeTable>>,
}

impl FontDefinition {
    pub fn font_type(&self) -> &str {
        &self.font_type
    }

    pub fn parent(&self) -> Option<FontId> {
        self.parent
    }

    /// Alias names as written in the catalog.
    pub fn aliases(&self) -> &[String] {
        &self.aliases
    }

    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    /// Display name to use for output in this encoding.
    pub fn default_name(&self) -> &str {
        self.default_name.as_deref().unwrap_or(&self.font_type)
    }
}

/// Listing entry for one user-visible font type.
#[derive(Debug, Clone, Serialize)]
pub struct FontInfo {
    pub font_type: String,
    pub default_name: String,
    pub names: Vec<String>,
}

pub struct FontCatalog {
    fonts: Vec<FontDefinition>,
    names: FxHashMap<String, FontId>,
}

impl FontCatalog {
    /// Reads a catalog file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let source = fs::read_to_string(path)?;
        debug!("Loading font catalog from {}", path.display());
        Self::from_xml(&source)
    }

    pub fn from_xml(source: &str) -> Result<Self> {
        let mut reader = Reader::from_str(source);
        reader.config_mut().trim_text(true);

        let mut parser = CatalogParser::default();
        loop {
            match reader.read_event()? {
                Event::Start(e) => parser.start(&e, false)?,
                Event::Empty(e) => parser.start(&e, true)?,
                Event::End(e) => parser.end(e.name().as_ref())?,
                Event::Eof => break,
                _ => {}
            }
        }
        parser.finish()
    }

    /// Finds the font a user-facing name refers to.
    pub fn resolve(&self, name: &str) -> Result<FontId> {
        let key = beautify(name);
        self.names
            .get(&key)
            .copied()
            .ok_or(Error::FontNotFound { name: key })
    }

    pub fn is_convertible(&self, name: &str) -> bool {
        self.resolve(name).is_ok()
    }

    /// Looks a font up by identifier, hidden fonts included.
    pub fn find_type(&self, font_type: &str) -> Option<FontId> {
        let font_type = font_type.to_lowercase();
        self.fonts
            .iter()
            .position(|f| f.font_type == font_type)
            .map(FontId)
    }

    /// # Panics
    ///
    /// Panics if `id` was issued by a catalog with more fonts.
    pub fn font(&self, id: FontId) -> &FontDefinition {
        &self.fonts[id.0]
    }

    pub fn get(&self, id: FontId) -> Option<&FontDefinition> {
        self.fonts.get(id.0)
    }

    pub fn default_font_name(&self, id: FontId) -> &str {
        self.font(id).default_name()
    }

    /// Sorted identifiers of all visible fonts.
    pub fn font_types(&self) -> Vec<&str> {
        let mut types: Vec<&str> = self
            .fonts
            .iter()
            .filter(|f| !f.hidden)
            .map(|f| f.font_type.as_str())
            .collect();
        types.sort_unstable();
        types
    }

    /// Sorted lookup names (identifiers and aliases, beautified).
    pub fn font_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.names.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Names that select `font_type`, without the identifier itself.
    pub fn font_names_for_type(&self, font_type: &str) -> Vec<&str> {
        let own = beautify(font_type);
        let mut names: Vec<&str> = self
            .names
            .iter()
            .filter(|(name, id)| self.fonts[id.0].font_type == font_type && **name != own)
            .map(|(name, _)| name.as_str())
            .collect();
        names.sort_unstable();
        names
    }

    pub fn fonts(&self) -> Vec<FontInfo> {
        self.font_types()
            .into_iter()
            .map(|font_type| FontInfo {
                font_type: font_type.to_string(),
                default_name: self
                    .find_type(font_type)
                    .map(|id| self.default_font_name(id).to_string())
                    .unwrap_or_else(|| font_type.to_string()),
                names: self
                    .font_names_for_type(font_type)
                    .into_iter()
                    .map(str::to_string)
                    .collect(),
            })
            .collect()
    }

    /// Legacy -> Unicode table of a font, built on first use.
    pub fn legacy_table(&self, id: FontId) -> Result<Arc<LegacyTable>> {
        let font = self.font(id);
        font.legacy
            .get_or_try_init(|| {
                let mut table = match font.parent {
                    Some(parent) => LegacyTable::clone(&*self.legacy_table(parent)?),
                    None => LegacyTable::new(),
                };
                let mut layer = Layer::default();
                for entry in &font.maps.global {
                    add_global_legacy(&mut table, &mut layer, entry, &font.font_type)?;
                }
                for entry in &font.maps.to_unicode {
                    add_legacy_sequence(&mut table, &mut layer, entry, "tounicode", &font.font_type)?;
                }
                debug!(
                    "Built legacy table for '{}' ({} sequences)",
                    font.font_type,
                    table.sequence_count()
                );
                Ok(Arc::new(table))
            })
            .map(Arc::clone)
    }

    /// Unicode -> Legacy table of a font, built on first use.
    pub fn unicode_table(&self, id: FontId) -> Result<Arc<UnicodeTable>> {
        let font = self.font(id);
        font.unicode
            .get_or_try_init(|| {
                let mut table = match font.parent {
                    Some(parent) => UnicodeTable::clone(&*self.unicode_table(parent)?),
                    None => UnicodeTable::new(),
                };
                let mut layer = Layer::default();
                for entry in &font.maps.global {
                    add_global_unicode(&mut table, &mut layer, entry, &font.font_type)?;
                }
                for entry in &font.maps.from_unicode {
                    add_unicode_sequence(&mut table, &mut layer, entry, "fromunicode", &font.font_type)?;
                }
                debug!(
                    "Built unicode table for '{}' (longest key {})",
                    font.font_type,
                    table.max_key_len()
                );
                Ok(Arc::new(table))
            })
            .map(Arc::clone)
    }
}

// ============================================================================
// Table construction
// ============================================================================

/// Slots and keys assigned by the font currently being built. Entries inherited
/// from the parent are not recorded here, so overriding them is allowed.
struct Layer<K> {
    slots: FxHashSet<usize>,
    keys: FxHashSet<K>,
}

impl<K> Default for Layer<K> {
    fn default() -> Self {
        Layer {
            slots: FxHashSet::default(),
            keys: FxHashSet::default(),
        }
    }
}

impl<K: Hash + Eq> Layer<K> {
    fn claim_slot(&mut self, slot: usize) -> bool {
        self.slots.insert(slot)
    }

    fn claim_key(&mut self, key: K) -> bool {
        self.keys.insert(key)
    }
}

fn add_global_legacy(
    table: &mut LegacyTable,
    layer: &mut Layer<Vec<u8>>,
    entry: &MapEntry,
    font_type: &str,
) -> Result<()> {
    match entry.legacy.as_slice() {
        [] => Ok(()),
        [byte] => {
            if !layer.claim_slot(*byte as usize) {
                return Err(Error::catalog(format!(
                    "legacy character {:#04x} defined twice in global of font '{}'",
                    byte, font_type
                )));
            }
            table.set_byte(*byte, entry.unicode.as_str());
            Ok(())
        }
        _ => add_legacy_sequence(table, layer, entry, "global", font_type),
    }
}

fn add_legacy_sequence(
    table: &mut LegacyTable,
    layer: &mut Layer<Vec<u8>>,
    entry: &MapEntry,
    section: &str,
    font_type: &str,
) -> Result<()> {
    let len = entry.legacy.len();
    if len == 0 {
        return Ok(());
    }
    if len >= MAX_KEY_LENGTH {
        warn!(
            "Skipping {}-byte legacy key in {} of font '{}'",
            len, section, font_type
        );
        return Ok(());
    }
    if !layer.claim_key(entry.legacy.clone()) {
        return Err(Error::catalog(format!(
            "legacy sequence {:?} defined twice in {} of font '{}'",
            entry.legacy, section, font_type
        )));
    }
    table.insert_sequence(entry.legacy.clone(), entry.unicode.as_str());
    Ok(())
}

fn add_global_unicode(
    table: &mut UnicodeTable,
    layer: &mut Layer<String>,
    entry: &MapEntry,
    font_type: &str,
) -> Result<()> {
    let mut chars = entry.unicode.chars();
    if let (Some(c), None) = (chars.next(), chars.next()) {
        if let Some(slot) = khmer_slot(c) {
            if !layer.claim_slot(slot) {
                return Err(Error::catalog(format!(
                    "unicode character U+{:04X} defined twice in global of font '{}'",
                    c as u32, font_type
                )));
            }
            table.set_khmer(c, entry.legacy.clone());
            return Ok(());
        }
    }
    add_unicode_sequence(table, layer, entry, "global", font_type)
}

fn add_unicode_sequence(
    table: &mut UnicodeTable,
    layer: &mut Layer<String>,
    entry: &MapEntry,
    section: &str,
    font_type: &str,
) -> Result<()> {
    let len = entry.unicode.chars().count();
    if len == 0 {
        return Ok(());
    }
    if len >= MAX_KEY_LENGTH {
        warn!(
            "Skipping {}-character unicode key in {} of font '{}'",
            len, section, font_type
        );
        return Ok(());
    }
    if !layer.claim_key(entry.unicode.clone()) {
        return Err(Error::catalog(format!(
            "unicode string {:?} defined twice in {} of font '{}'",
            entry.unicode, section, font_type
        )));
    }
    table.insert_sequence(&entry.unicode, entry.legacy.clone());
    Ok(())
}

// ============================================================================
// XML parsing
// ============================================================================

#[derive(Debug, Clone, Copy)]
enum Section {
    Global,
    ToUnicode,
    FromUnicode,
}

struct FontBuilder {
    font_type: String,
    parent: Option<FontId>,
    aliases: Vec<String>,
    hidden: bool,
    default_name: Option<String>,
    maps: FontMaps,
    in_maps: bool,
    section: Option<Section>,
}

impl FontBuilder {
    fn build(self) -> FontDefinition {
        FontDefinition {
            font_type: self.font_type,
            parent: self.parent,
            aliases: self.aliases,
            hidden: self.hidden,
            default_name: self.default_name,
            maps: self.maps,
            legacy: OnceCell::new(),
            unicode: OnceCell::new(),
        }
    }
}

#[derive(Default)]
struct CatalogParser {
    fonts: Vec<FontDefinition>,
    current: Option<FontBuilder>,
}

impl CatalogParser {
    fn start(&mut self, e: &BytesStart, empty: bool) -> Result<()> {
        match e.name().as_ref() {
            b"font" => {
                if let Some(open) = &self.current {
                    return Err(Error::catalog(format!(
                        "font element nested inside font '{}'",
                        open.font_type
                    )));
                }
                let builder = self.open_font(e)?;
                if empty {
                    self.fonts.push(builder.build());
                } else {
                    self.current = Some(builder);
                }
            }
            b"alias" => {
                if let Some(font) = self.current.as_mut() {
                    if let Some(name) = attribute(e, b"name")? {
                        font.aliases.push(name);
                    }
                }
            }
            b"maps" => {
                if let Some(font) = self.current.as_mut() {
                    font.in_maps = !empty;
                }
            }
            name @ (b"global" | b"tounicode" | b"fromunicode") => {
                if let Some(font) = self.current.as_mut().filter(|f| f.in_maps && !empty) {
                    font.section = Some(match name {
                        b"global" => Section::Global,
                        b"tounicode" => Section::ToUnicode,
                        _ => Section::FromUnicode,
                    });
                }
            }
            b"map" => {
                if let Some(font) = self.current.as_mut() {
                    if let Some(section) = font.section {
                        let entry = MapEntry {
                            unicode: attribute(e, b"unicode")?.unwrap_or_default(),
                            legacy: parse_legacy(&attribute(e, b"legacy")?.unwrap_or_default())?,
                        };
                        match section {
                            Section::Global => font.maps.global.push(entry),
                            Section::ToUnicode => font.maps.to_unicode.push(entry),
                            Section::FromUnicode => font.maps.from_unicode.push(entry),
                        }
                    }
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn end(&mut self, name: &[u8]) -> Result<()> {
        match name {
            b"font" => {
                if let Some(builder) = self.current.take() {
                    self.fonts.push(builder.build());
                }
            }
            b"maps" => {
                if let Some(font) = self.current.as_mut() {
                    font.in_maps = false;
                    font.section = None;
                }
            }
            b"global" | b"tounicode" | b"fromunicode" => {
                if let Some(font) = self.current.as_mut() {
                    font.section = None;
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn open_font(&self, e: &BytesStart) -> Result<FontBuilder> {
        let font_type = attribute(e, b"type")?.unwrap_or_default().to_lowercase();
        if font_type.is_empty() {
            return Err(Error::catalog("font element without a type"));
        }
        if self.fonts.iter().any(|f| f.font_type == font_type) {
            return Err(Error::catalog(format!(
                "font '{}' is defined twice",
                font_type
            )));
        }

        let parent = match attribute(e, b"inherit")? {
            Some(inherit) if !inherit.is_empty() => {
                let inherit = inherit.to_lowercase();
                let index = self
                    .fonts
                    .iter()
                    .position(|f| f.font_type == inherit)
                    .ok_or_else(|| {
                        Error::catalog(format!(
                            "font '{}' can not inherit unknown font '{}'",
                            font_type, inherit
                        ))
                    })?;
                Some(FontId(index))
            }
            _ => None,
        };

        let hidden = attribute(e, b"hidden")?
            .map(|v| v.eq_ignore_ascii_case("true"))
            .unwrap_or(false);
        let default_name = attribute(e, b"default")?.filter(|v| !v.is_empty());

        Ok(FontBuilder {
            font_type,
            parent,
            aliases: Vec::new(),
            hidden,
            default_name,
            maps: FontMaps::default(),
            in_maps: false,
            section: None,
        })
    }

    fn finish(self) -> Result<FontCatalog> {
        if let Some(open) = self.current {
            return Err(Error::catalog(format!(
                "font '{}' is not closed",
                open.font_type
            )));
        }
        if self.fonts.is_empty() {
            return Err(Error::catalog("no fonts found"));
        }

        let mut names: FxHashMap<String, FontId> = FxHashMap::default();
        for (index, font) in self.fonts.iter().enumerate() {
            if font.hidden {
                continue;
            }
            let id = FontId(index);
            let keys = std::iter::once(beautify(&font.font_type))
                .chain(font.aliases.iter().map(|a| beautify(a)));
            for key in keys {
                if let Some(previous) = names.insert(key.clone(), id) {
                    if previous != id {
                        warn!(
                            "Font name '{}' moves from '{}' to '{}'",
                            key, self.fonts[previous.0].font_type, font.font_type
                        );
                    }
                }
            }
        }

        debug!(
            "Font catalog holds {} fonts under {} names",
            self.fonts.len(),
            names.len()
        );
        Ok(FontCatalog {
            fonts: self.fonts,
            names,
        })
    }
}

fn attribute(e: &BytesStart, name: &[u8]) -> Result<Option<String>> {
    for attr in e.attributes() {
        let attr = attr.map_err(|err| Error::catalog(format!("malformed attribute: {}", err)))?;
        if attr.key.as_ref() == name {
            let value = attr
                .unescape_value()
                .map_err(|err| Error::catalog(format!("malformed attribute value: {}", err)))?;
            return Ok(Some(value.into_owned()));
        }
    }
    Ok(None)
}

/// Parses a `legacy` attribute: byte values separated by `;`, decimal or `0x` hex.
fn parse_legacy(value: &str) -> Result<Vec<u8>> {
    value
        .split(LEGACY_SEPARATOR)
        .map(str::trim)
        .filter(|piece| !piece.is_empty())
        .map(|piece| {
            let parsed = match piece.strip_prefix("0x").or_else(|| piece.strip_prefix("0X")) {
                Some(hex) => u8::from_str_radix(hex, 16),
                None => piece.parse::<u8>(),
            };
            parsed.map_err(|_| Error::catalog(format!("invalid legacy byte '{}'", piece)))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_beautify() {
        assert_eq!(beautify("Limon_S1"), "limon s1");
        assert_eq!(beautify("ABC-TEXT-05"), "abc text 05");
    }

    #[test]
    fn test_parse_legacy() {
        assert_eq!(parse_legacy("98;255").unwrap(), vec![98, 255]);
        assert_eq!(parse_legacy(" 0x41 ; 66;").unwrap(), vec![0x41, 66]);
        assert!(parse_legacy("").unwrap().is_empty());
        assert!(parse_legacy("256").is_err());
        assert!(parse_legacy("abc").is_err());
    }
}
