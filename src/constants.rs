/// First code point of the Khmer block.
pub const KHMER_START: char = '\u{1780}';

/// Number of code points covered by the Khmer slot table of a codec.
pub const KHMER_TABLE_SIZE: usize = 0x7F;
/// Number of single-byte slots in a legacy code page.
pub const LEGACY_TABLE_SIZE: usize = 0x100;
/// Sequence keys (bytes or characters) must be shorter than this.
pub const MAX_KEY_LENGTH: usize = 10;

// Character classes. A code point may carry several of these bits.
pub const BASE: u16 = 1;
pub const VOWEL: u16 = 2;
pub const SHIFTER: u16 = 4; // muusikatoan or triisap
pub const COENG: u16 = 8;
pub const SIGN: u16 = 16;
pub const LEFT: u16 = 32; // vowel drawn on the left side of the base
pub const WITHE: u16 = 64; // vowel combines with SRA E
pub const WITHU: u16 = 128; // vowel combines with SRA U
pub const POSRAA: u16 = 256; // may stand under PO + SRA AA
pub const MUUS: u16 = 512; // consonant takes muusikatoan
pub const TRII: u16 = 1024; // consonant takes triisap
pub const ROBAT: u16 = 2048;

// Characters the cluster rules look at
pub const NYO: char = '\u{1789}';
pub const PO: char = '\u{1796}';
pub const RO: char = '\u{179A}';
pub const SRA_AA: char = '\u{17B6}';
pub const SRA_II: char = '\u{17B8}';
pub const SRA_U: char = '\u{17BB}';
pub const SRA_OE: char = '\u{17BE}';
pub const SRA_YA: char = '\u{17BF}';
pub const SRA_IE: char = '\u{17C0}';
pub const SRA_E: char = '\u{17C1}';
pub const SRA_OO: char = '\u{17C4}';
pub const SRA_AU: char = '\u{17C5}';
pub const MUUSIKATOAN: char = '\u{17C9}';
pub const TRIISAP: char = '\u{17CA}';
pub const SAMYOK_SANNYA: char = '\u{17D0}';
pub const COENG_SIGN: char = '\u{17D2}';
pub const ZWSP: char = '\u{200B}';

/// Classes of U+1780..=U+17D3, indexed by `codepoint - 0x1780`.
const KHMER_CLASSES: [u16; 0x54] = [
    BASE,              // ក 1780
    BASE,              // ខ
    BASE,              // គ
    BASE,              // ឃ
    BASE,              // ង
    BASE,              // ច
    BASE,              // ឆ
    BASE,              // ជ
    BASE,              // ឈ
    BASE | MUUS,       // ញ
    BASE,              // ដ
    BASE,              // ឋ
    BASE,              // ឌ
    BASE,              // ឍ
    BASE,              // ណ
    BASE | POSRAA,     // ត
    BASE,              // ថ 1790
    BASE,              // ទ
    BASE,              // ធ
    BASE | POSRAA,     // ន
    BASE | MUUS,       // ប
    BASE,              // ផ
    BASE,              // ព
    BASE | POSRAA,     // ភ
    BASE,              // ម
    BASE | POSRAA,     // យ
    BASE | POSRAA,     // រ
    BASE | POSRAA,     // ល
    BASE | POSRAA,     // វ
    BASE,              // ឝ
    BASE,              // ឞ
    BASE | TRII,       // ស
    BASE,              // ហ 17A0
    BASE,              // ឡ
    BASE | TRII,       // អ
    BASE,              // ឣ
    BASE,              // ឤ
    BASE,              // ឥ
    BASE,              // ឦ
    BASE,              // ឧ
    BASE,              // ឨ
    BASE,              // ឩ
    BASE,              // ឪ
    BASE,              // ឫ
    BASE,              // ឬ
    BASE,              // ឭ
    BASE,              // ឮ
    BASE,              // ឯ
    BASE,              // ឰ 17B0
    BASE,              // ឱ
    BASE,              // ឲ
    BASE,              // ឳ
    0,                 // 17B4 inherent vowel, invisible
    0,                 // 17B5
    VOWEL | WITHE | WITHU, // ា
    VOWEL | WITHU,     // ិ
    VOWEL | WITHE | WITHU, // ី
    VOWEL | WITHU,     // ឹ
    VOWEL | WITHU,     // ឺ
    VOWEL,             // ុ
    VOWEL,             // ូ
    VOWEL,             // ួ
    VOWEL | WITHU,     // ើ
    VOWEL | WITHE,     // ឿ
    VOWEL | WITHE,     // ៀ 17C0
    VOWEL | LEFT,      // េ
    VOWEL | LEFT,      // ែ
    VOWEL | LEFT,      // ៃ
    VOWEL,             // ោ
    VOWEL | WITHE,     // ៅ
    SIGN | WITHU,      // ំ
    SIGN,              // ះ
    SIGN,              // ៈ
    SHIFTER,           // ៉
    SHIFTER,           // ៊
    SIGN,              // ់
    ROBAT,             // ៌
    SIGN,              // ៍
    SIGN,              // ៎
    SIGN,              // ៏
    SIGN | WITHU,      // ័ 17D0
    SIGN,              // ៑
    COENG,             // ្
    SIGN,              // ៓
];

/// Returns the class bits of `c`, or 0 for anything outside the classified
/// part of the Khmer block.
#[inline]
pub fn khmer_type(c: char) -> u16 {
    let code = c as u32;
    if code < KHMER_START as u32 {
        return 0;
    }
    KHMER_CLASSES
        .get((code - KHMER_START as u32) as usize)
        .copied()
        .unwrap_or(0)
}

#[inline]
pub fn has_class(c: char, class: u16) -> bool {
    khmer_type(c) & class != 0
}

/// Slot of `c` in a codec's Khmer table, if it has one.
#[inline]
pub fn khmer_slot(c: char) -> Option<usize> {
    let code = c as u32;
    if code < KHMER_START as u32 {
        return None;
    }
    let slot = (code - KHMER_START as u32) as usize;
    (slot < KHMER_TABLE_SIZE).then_some(slot)
}

/// The vowel SRA E turns into when followed by `c`, if the pair combines.
pub fn sra_e_combination(c: char) -> Option<char> {
    match c {
        SRA_II => Some(SRA_OE),
        SRA_YA => Some(SRA_YA),
        SRA_IE => Some(SRA_IE),
        SRA_AA => Some(SRA_OO),
        SRA_AU => Some(SRA_AU),
        _ => None,
    }
}

/// Splits a vowel into the part typed before the base and the part typed after
/// it, the way legacy fonts draw it.
pub fn split_vowel(vowel: char) -> (Option<char>, Option<char>) {
    match vowel {
        SRA_OE => (Some(SRA_E), Some(SRA_II)),
        SRA_OO => (Some(SRA_E), Some(SRA_AA)),
        SRA_YA | SRA_IE | SRA_AU => (Some(SRA_E), Some(vowel)),
        v if has_class(v, LEFT) => (Some(v), None),
        v => (None, Some(v)),
    }
}

/// Shifter the cluster rules pick for a consonant that takes one.
#[inline]
pub fn shifter_for(consonant: char) -> Option<char> {
    let kind = khmer_type(consonant);
    if kind & TRII != 0 {
        Some(TRIISAP)
    } else if kind & MUUS != 0 {
        Some(MUUSIKATOAN)
    } else {
        None
    }
}
