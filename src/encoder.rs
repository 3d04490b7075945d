//! Unicode (visual order) -> legacy bytes.

use crate::codec::UnicodeTable;
use crate::constants::khmer_slot;

/// Encodes `text` with a font's Unicode table.
///
/// At each position the longest configured sequence wins. Otherwise a code
/// point of the Khmer table emits its entry (or nothing when it has none), an
/// ASCII character below 0x7F passes through as its own byte, and any other
/// character is dropped.
pub fn convert(text: &str, table: &UnicodeTable) -> Vec<u8> {
    let mut starts: Vec<usize> = text.char_indices().map(|(i, _)| i).collect();
    starts.push(text.len());
    let count = starts.len() - 1;

    let mut output = Vec::with_capacity(text.len());
    let mut i = 0;

    while i < count {
        if let Some((len, legacy)) = table.longest_match(text, &starts, i) {
            output.extend_from_slice(legacy);
            i += len;
            continue;
        }

        let c = text[starts[i]..starts[i + 1]]
            .chars()
            .next()
            .unwrap_or_default();
        if khmer_slot(c).is_some() {
            if let Some(legacy) = table.khmer(c) {
                output.extend_from_slice(legacy);
            }
        } else if (c as u32) < 0x7F {
            output.push(c as u8);
        }
        i += 1;
    }

    output
}
