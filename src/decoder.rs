//! Legacy bytes -> Unicode, still in visual order.

use crate::codec::LegacyTable;

/// Replaces every legacy byte with its Unicode text. At each position the
/// longest condense sequence wins; a byte that starts no sequence goes through
/// the single-byte table, so no input byte is ever lost.
pub fn process(input: &[u8], table: &LegacyTable) -> String {
    let mut output = String::with_capacity(input.len() * 3);
    let mut i = 0;

    while i < input.len() {
        match table.longest_match(&input[i..]) {
            Some((len, replacement)) => {
                output.push_str(replacement);
                i += len;
            }
            None => {
                output.push_str(table.byte(input[i]));
                i += 1;
            }
        }
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_table() -> LegacyTable {
        let mut table = LegacyTable::new();
        table.set_byte(0, "*");
        table.set_byte(1, "cbc");
        table.set_byte(2, "\u{1780}");
        table.set_byte(3, "\u{1780}\u{1782}");
        table.set_byte(4, "");
        table.insert_sequence(b"12".to_vec(), "_");
        table.insert_sequence(b"abcd".to_vec(), "");
        table
    }

    #[test]
    fn test_byte_table() {
        let table = sample_table();
        assert_eq!(process(&[0], &table), "*");
        assert_eq!(process(&[1, 0, 1], &table), "cbc*cbc");
        assert_eq!(process(&[2, 3], &table), "\u{1780}\u{1780}\u{1782}");
        assert_eq!(process(&[4, 4, 0], &table), "*");
        assert_eq!(process(&[255], &table), "\u{FF}");
    }

    #[test]
    fn test_condense_sequences() {
        let table = sample_table();
        assert_eq!(process(b"12", &table), "_");
        assert_eq!(process(b"1212", &table), "__");
        assert_eq!(process(b"12x12", &table), "_x_");
        assert_eq!(process(b"abcd", &table), "");
        assert_eq!(process(b"abc", &table), "abc");
        assert_eq!(process(b"", &table), "");
    }

    #[test]
    fn test_longest_sequence_first() {
        let mut table = LegacyTable::new();
        table.insert_sequence(b"0".to_vec(), "X");
        table.insert_sequence(b"09".to_vec(), "M");
        table.insert_sequence(b"123".to_vec(), "A");
        table.insert_sequence(b"1234".to_vec(), "Z");
        assert_eq!(process(b"1234", &table), "Z");
        assert_eq!(process(b"1230", &table), "AX");
        assert_eq!(process(b"09", &table), "M");
    }
}
