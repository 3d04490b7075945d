//! Per-font codec tables.
//!
//! A font has one table per direction. [`LegacyTable`] turns legacy bytes into
//! Unicode and [`UnicodeTable`] turns Unicode into legacy bytes. Both combine a
//! fixed-size slot table with maps of longer sequences, and both are consulted
//! longest sequence first.

use fxhash::FxHashMap;

use crate::constants::{khmer_slot, KHMER_TABLE_SIZE, LEGACY_TABLE_SIZE, MAX_KEY_LENGTH};

/// Legacy -> Unicode direction.
#[derive(Debug, Clone)]
pub struct LegacyTable {
    bytes: Vec<String>,
    sequences: FxHashMap<Vec<u8>, String>,
    max_key_len: usize,
}

impl Default for LegacyTable {
    fn default() -> Self {
        LegacyTable {
            bytes: (0..LEGACY_TABLE_SIZE)
                .map(|b| char::from(b as u8).to_string())
                .collect(),
            sequences: FxHashMap::default(),
            max_key_len: 0,
        }
    }
}

impl LegacyTable {
    /// Identity table: every byte stands for the code point of the same value.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_byte(&mut self, byte: u8, replacement: impl Into<String>) {
        self.bytes[byte as usize] = replacement.into();
    }

    /// Adds a byte sequence to the condense map. Keys must be 1..=9 bytes long;
    /// returns false (and leaves the table untouched) otherwise.
    pub fn insert_sequence(&mut self, key: Vec<u8>, replacement: impl Into<String>) -> bool {
        if key.is_empty() || key.len() >= MAX_KEY_LENGTH {
            return false;
        }
        self.max_key_len = self.max_key_len.max(key.len());
        self.sequences.insert(key, replacement.into());
        true
    }

    #[inline]
    pub fn byte(&self, byte: u8) -> &str {
        &self.bytes[byte as usize]
    }

    pub fn sequence(&self, key: &[u8]) -> Option<&str> {
        self.sequences.get(key).map(String::as_str)
    }

    pub fn sequence_count(&self) -> usize {
        self.sequences.len()
    }

    /// Longest condense key that prefixes `input`, with its replacement.
    #[inline]
    pub fn longest_match(&self, input: &[u8]) -> Option<(usize, &str)> {
        let limit = self.max_key_len.min(input.len());
        (1..=limit)
            .rev()
            .find_map(|len| self.sequence(&input[..len]).map(|s| (len, s)))
    }
}

/// Unicode -> Legacy direction.
#[derive(Debug, Clone)]
pub struct UnicodeTable {
    khmer: Vec<Option<Vec<u8>>>,
    // Index n holds the keys of n + 1 characters.
    sequences: Vec<FxHashMap<String, Vec<u8>>>,
}

impl Default for UnicodeTable {
    fn default() -> Self {
        UnicodeTable {
            khmer: vec![None; KHMER_TABLE_SIZE],
            sequences: Vec::new(),
        }
    }
}

impl UnicodeTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the bytes for a code point of the Khmer table. Returns false when
    /// `c` has no slot there.
    pub fn set_khmer(&mut self, c: char, legacy: Vec<u8>) -> bool {
        match khmer_slot(c) {
            Some(slot) => {
                self.khmer[slot] = Some(legacy);
                true
            }
            None => false,
        }
    }

    /// Adds a string of 1..=9 characters to the sequence maps. Returns false
    /// when the key length is out of range.
    pub fn insert_sequence(&mut self, key: &str, legacy: Vec<u8>) -> bool {
        let len = key.chars().count();
        if len == 0 || len >= MAX_KEY_LENGTH {
            return false;
        }
        if self.sequences.len() < len {
            self.sequences.resize_with(len, FxHashMap::default);
        }
        self.sequences[len - 1].insert(key.to_string(), legacy);
        true
    }

    pub fn khmer(&self, c: char) -> Option<&[u8]> {
        khmer_slot(c).and_then(|slot| self.khmer[slot].as_deref())
    }

    pub fn sequence(&self, key: &str) -> Option<&[u8]> {
        let len = key.chars().count();
        if len == 0 {
            return None;
        }
        self.sequences
            .get(len - 1)
            .and_then(|map| map.get(key))
            .map(Vec::as_slice)
    }

    /// Longest configured key length, in characters.
    pub fn max_key_len(&self) -> usize {
        self.sequences.len()
    }

    /// Tries the sequence maps longest first against `text[starts[i]..]`, where
    /// `starts` holds the byte offset of every character plus the end offset.
    /// Returns the number of characters matched and the legacy bytes.
    #[inline]
    pub(crate) fn longest_match<'a>(
        &'a self,
        text: &str,
        starts: &[usize],
        i: usize,
    ) -> Option<(usize, &'a [u8])> {
        let remaining = starts.len() - 1 - i;
        let limit = self.sequences.len().min(remaining);
        (1..=limit).rev().find_map(|len| {
            let key = &text[starts[i]..starts[i + len]];
            self.sequences[len - 1].get(key).map(|v| (len, v.as_slice()))
        })
    }
}
