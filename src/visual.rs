//! Canonical Unicode order -> visual (legacy typing) order.
//!
//! This is the inverse of [`crate::normalizer::reorder`] on the clusters that
//! normalizer produces: left vowels move in front of the base, coeng RO moves
//! in front of the base, a shifter that SRA U can stand for is written as
//! SRA U, and NYO over a subscript is typed as PO + SRA AA when a right
//! vowel follows.

use crate::constants::*;

const SRA_I: char = '\u{17B7}';
const SRA_Y: char = '\u{17B9}';
const SRA_YY: char = '\u{17BA}';

struct VisualCluster {
    base: char,
    robat: Option<char>,
    shifter: Option<char>,
    /// Consonants under the base, in canonical order.
    coengs: Vec<char>,
    vowel: Option<char>,
    sign: Option<char>,
    /// Marks that have no slot left, written after the cluster.
    extras: Vec<char>,
}

impl VisualCluster {
    /// Reads the cluster whose base is `chars[start]`. Returns it with the
    /// index of the first character after it.
    fn parse(chars: &[char], start: usize) -> (Self, usize) {
        let mut cluster = VisualCluster {
            base: chars[start],
            robat: None,
            shifter: None,
            coengs: Vec::new(),
            vowel: None,
            sign: None,
            extras: Vec::new(),
        };

        let mut i = start + 1;
        while let Some(&c) = chars.get(i) {
            let kind = khmer_type(c);
            if kind == 0 || kind & BASE != 0 {
                break;
            }
            i += 1;

            if kind & COENG != 0 {
                match chars.get(i) {
                    Some(&next) if has_class(next, BASE) => {
                        cluster.coengs.push(next);
                        i += 1;
                    }
                    _ => cluster.extras.push(c),
                }
                continue;
            }

            let slot = if kind & ROBAT != 0 {
                &mut cluster.robat
            } else if kind & SHIFTER != 0 {
                &mut cluster.shifter
            } else if kind & VOWEL != 0 {
                &mut cluster.vowel
            } else {
                &mut cluster.sign
            };
            if slot.is_none() {
                *slot = Some(c);
            } else {
                cluster.extras.push(c);
            }
        }

        (cluster, i)
    }

    /// Subscripts in typing order. Coeng RO goes first when the normalizer
    /// can still fit every subscript of the cluster.
    fn typed_coengs(&self) -> (bool, Vec<char>) {
        match self.coengs.iter().position(|&c| c == RO) {
            Some(index) if self.coengs.len() <= 2 => {
                let mut ordered = Vec::with_capacity(self.coengs.len());
                ordered.push(RO);
                ordered.extend(
                    self.coengs
                        .iter()
                        .enumerate()
                        .filter(|&(i, _)| i != index)
                        .map(|(_, &c)| c),
                );
                (true, ordered)
            }
            _ => (false, self.coengs.clone()),
        }
    }

    /// NYO over a single subscript that can not sit under PO + SRA AA is typed
    /// as PO, subscript, SRA AA, but only ahead of a right vowel.
    fn splits_nyo(&self, left: Option<char>, right: Option<char>) -> bool {
        if self.base != NYO || self.shifter.is_some() || left.is_some() || right.is_none() {
            return false;
        }
        let mut others = self.coengs.iter().filter(|&&c| c != RO);
        match (others.next(), others.next()) {
            (Some(&c), None) => !has_class(c, POSRAA),
            _ => false,
        }
    }

    /// Whether the shifter can be typed as SRA U and still come back unchanged.
    fn shifter_as_sra_u(&self, right: Option<char>, first_coeng: Option<char>) -> bool {
        let predicted = match (right, self.vowel, self.sign) {
            (Some(SRA_I | SRA_II | SRA_Y | SRA_YY), _, _) => {
                if has_class(self.base, TRII) {
                    TRIISAP
                } else {
                    MUUSIKATOAN
                }
            }
            (_, None, Some(SAMYOK_SANNYA)) => MUUSIKATOAN,
            _ => return false,
        };
        let predicted = first_coeng.and_then(shifter_for).unwrap_or(predicted);
        self.shifter == Some(predicted)
    }

    fn write_to(&self, output: &mut String) {
        let (left, right) = self.vowel.map(split_vowel).unwrap_or((None, None));
        let (ro_first, typed) = self.typed_coengs();
        let split_nyo = self.splits_nyo(left, right);

        output.extend(left);
        let rest = if ro_first {
            output.push(COENG_SIGN);
            output.push(RO);
            &typed[1..]
        } else {
            &typed[..]
        };
        output.push(if split_nyo { PO } else { self.base });
        output.extend(self.robat);
        for &consonant in rest {
            output.push(COENG_SIGN);
            output.push(consonant);
        }
        if split_nyo {
            output.push(SRA_AA);
        }
        output.extend(right);
        if let Some(shifter) = self.shifter {
            if self.shifter_as_sra_u(right, typed.first().copied()) {
                output.push(SRA_U);
            } else {
                output.push(shifter);
            }
        }
        output.extend(self.sign);
        output.extend(self.extras.iter());
    }
}

/// Reorders canonical Khmer text into the order legacy fonts expect.
/// Characters outside a cluster are copied through unchanged.
pub fn legacy_reorder(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut output = String::with_capacity(text.len() + text.len() / 4);
    let mut i = 0;

    while i < chars.len() {
        if has_class(chars[i], BASE) {
            let (cluster, next) = VisualCluster::parse(&chars, i);
            cluster.write_to(&mut output);
            i = next;
        } else {
            output.push(chars[i]);
            i += 1;
        }
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_left_vowel_and_coeng_ro() {
        assert_eq!(legacy_reorder("គេ"), "េគ");
        assert_eq!(legacy_reorder("ប្រើ"), "េ្របី");
        assert_eq!(legacy_reorder("ស្ត្រ"), "្រស្ត");
    }

    #[test]
    fn test_shifter_forms() {
        assert_eq!(legacy_reorder("ប៉ា"), "បា៉");
        assert_eq!(legacy_reorder("ស៊ី"), "សីុ");
        assert_eq!(legacy_reorder("ប៊ី"), "បី៊");
        assert_eq!(legacy_reorder("ប្ប៉័ង"), "ប្បុ័ង");
    }

    #[test]
    fn test_nyo_split() {
        assert_eq!(legacy_reorder("បញ្ញា"), "បព្ញាា");
        assert_eq!(legacy_reorder("បញ្ជី"), "បព្ជាី");
        assert_eq!(legacy_reorder("កញ្ជ្រោង"), "កេ្រញ្ជាង");
    }

    #[test]
    fn test_nyo_without_vowel_is_kept() {
        assert_eq!(legacy_reorder("ញ្ញ"), "ញ្ញ");
        assert_eq!(legacy_reorder("កញ្ជសៀវ"), "កញ្ជេសៀវ");
        assert_eq!(legacy_reorder("ញ្ខអៀ"), "ញ្ខេអៀ");
    }

    #[test]
    fn test_passthrough() {
        assert_eq!(legacy_reorder("abc 123"), "abc 123");
        assert_eq!(legacy_reorder("\u{17D2}"), "\u{17D2}");
        assert_eq!(legacy_reorder("ា"), "ា");
    }
}
