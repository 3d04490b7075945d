//! End-to-end conversion through KhmerConverter.

use khmer_converter::{Error, FontCatalog, KhmerConverter, TargetFont};
use rayon::prelude::*;
use std::path::Path;
use std::sync::Arc;

fn setup() -> KhmerConverter {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/data/test-fontdata.xml");
    let catalog = FontCatalog::load(&path).expect("Failed to load test catalog");
    KhmerConverter::new(Arc::new(catalog))
}

const WORDS: &[&str] = &[
    "កខគ",
    "ក្រដាសប្រដាល់កណ្ដាល",
    "បង្គោល ខាងលើ សៀវភៅ",
    "ស៊ីប៉ីអ៊ី",
    "ន្ស៊ី",
    "គេប្រឡែងគ្នា",
    "បញ្ញា",
    "បញ្ជី",
    "ចំពោះ",
    "ប្រឹក្សាធម្មនុញ្ញ",
    "ហៃប៊ី",
    "បូព៌ា",
    "បានស្នើ",
    "ប្រើ",
    "ប្ប៉័ង",
    "ស៊ើប",
    "ប៉ើង",
    "កុំជោ",
    "ស្ត្រ",
    "\u{201C}ឫ\u{201D}\n",
];

#[test]
fn test_encode_simple() {
    let converter = setup();
    assert_eq!(converter.encode_to_legacy("កខគ", "abc").unwrap(), b"kxK");
    assert_eq!(
        converter.encode_to_legacy("ប្រដាល់", "abc").unwrap(),
        vec![237, b'B', b'd', 192, b'l', 210]
    );
    assert_eq!(
        converter.encode_to_legacy("គេ", "abc").unwrap(),
        vec![200, b'K']
    );
}

#[test]
fn test_decode_simple() {
    let converter = setup();
    assert_eq!(converter.decode_from_legacy(b"kxK", "abc").unwrap(), "កខគ");
    assert_eq!(
        converter
            .decode_from_legacy(&[237, b'B', b'd', 192, b'l', 210], "abc")
            .unwrap(),
        "ប្រដាល់"
    );
    // shifter typed after the vowel
    assert_eq!(
        converter.decode_from_legacy(&[b'B', 192, 212], "abc").unwrap(),
        "ប៉ា"
    );
}

#[test]
fn test_round_trip() {
    let converter = setup();
    let mut failures = Vec::new();

    for &word in WORDS {
        let legacy = converter.encode_to_legacy(word, "abc").unwrap();
        let back = converter.decode_from_legacy(&legacy, "abc").unwrap();
        if back != word {
            failures.push(format!("{:?} -> {:?} -> {:?}", word, legacy, back));
        }
    }

    if !failures.is_empty() {
        panic!("{} round trips failed:\n{}", failures.len(), failures.join("\n"));
    }
}

#[test]
fn test_round_trip_keeps_zwsp() {
    let converter = setup();
    let text = "ក្រដាស\u{200B}ប្រដាល់";

    let legacy = converter.encode_to_legacy(text, "abc").unwrap();
    assert!(legacy.contains(&b'c'));
    assert_eq!(converter.decode_from_legacy(&legacy, "abc").unwrap(), text);

    // abc-zwsp writes the word break as a plain space
    let legacy = converter.encode_to_legacy(text, "abc-zwsp").unwrap();
    assert!(legacy.contains(&b' '));
}

#[test]
fn test_unknown_characters_dropped_on_encode() {
    let converter = setup();
    assert_eq!(
        converter.encode_to_legacy("ក\u{1980}é", "abc").unwrap(),
        b"k"
    );
}

#[test]
fn test_unknown_font() {
    let converter = setup();
    assert!(matches!(
        converter.decode_from_legacy(b"k", "nope"),
        Err(Error::FontNotFound { .. })
    ));
    assert!(matches!(
        converter.encode_to_legacy("ក", "hidden"),
        Err(Error::FontNotFound { .. })
    ));
}

#[test]
fn test_target_font() {
    let converter = setup();
    assert_eq!(
        converter.target_font("ABC-TEXT-06", Some(14)).unwrap(),
        TargetFont {
            font_type: "abc".to_string(),
            display_name: "ABC-TEXT-05".to_string(),
            size: Some(14),
        }
    );
    let target = converter.target_font("abc-3-01", None).unwrap();
    assert_eq!(target.font_type, "abc-3");
    assert_eq!(target.display_name, "abc-3");
    assert_eq!(target.size, None);
}

#[test]
fn test_parallel_lines_match_sequential() {
    let converter = setup();
    let lines: Vec<String> = (0..200)
        .map(|i| WORDS[i % WORDS.len()].to_string())
        .collect();

    let sequential: Vec<Vec<u8>> = lines
        .iter()
        .map(|line| converter.encode_to_legacy(line, "abc-zwsp").unwrap())
        .collect();

    let fresh = setup();
    let parallel: Vec<Vec<u8>> = lines
        .par_iter()
        .map(|line| fresh.encode_to_legacy(line, "abc-zwsp").unwrap())
        .collect();
    assert_eq!(parallel, sequential);

    let decoded: Vec<String> = parallel
        .par_iter()
        .map(|bytes| fresh.decode_from_legacy(bytes, "abc-zwsp").unwrap())
        .collect();
    for (line, back) in lines.iter().zip(&decoded) {
        assert_eq!(back, line);
    }
}
