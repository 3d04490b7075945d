//! Visual order -> canonical Unicode order.
//!
//! Legacy fonts are typed in the order glyphs appear on screen: a left vowel
//! before its consonant, coeng RO before the consonant it sits under, SRA U
//! typed separately from the vowel it fuses with. [`reorder`] regroups such
//! text into clusters of the form
//!
//! ```text
//! base [robat | shifter] [coeng]* [shifter] [vowel] [sign]
//! ```

use crate::constants::*;

/// A subscript unit: the coeng marker and whatever follows it.
#[derive(Debug, Clone, Copy)]
struct Coeng {
    marker: char,
    consonant: Option<char>,
}

enum Flow {
    /// Consumed this many characters, keep filling the cluster.
    Take(usize),
    /// Cluster is complete, the current character starts the next one.
    Stop,
}

#[derive(Default)]
struct Cluster {
    base: Option<char>,
    robat: Option<char>,
    shifter1: Option<char>,
    shifter2: Option<char>,
    coeng1: Option<Coeng>,
    coeng2: Option<Coeng>,
    vowel: Option<char>,
    po_sra_aa: bool,
    sign: Option<char>,
    deferred: Vec<char>,
}

/// Shifter picked from the base consonant when SRA U fuses with a vowel.
fn base_shifter(base: Option<char>) -> char {
    match base {
        Some(b) if has_class(b, TRII) => TRIISAP,
        _ => MUUSIKATOAN,
    }
}

fn fill(slot: &mut Option<char>, c: char) -> Flow {
    if slot.is_some() {
        return Flow::Stop;
    }
    *slot = Some(c);
    Flow::Take(1)
}

impl Cluster {
    fn is_empty(&self) -> bool {
        self.base.is_none()
            && self.robat.is_none()
            && self.shifter1.is_none()
            && self.coeng1.is_none()
            && self.vowel.is_none()
            && self.sign.is_none()
            && self.deferred.is_empty()
    }

    fn feed(&mut self, c: char, kind: u16, next: Option<char>) -> Flow {
        if kind & BASE != 0 {
            fill(&mut self.base, c)
        } else if kind & ROBAT != 0 {
            fill(&mut self.robat, c)
        } else if kind & SHIFTER != 0 {
            fill(&mut self.shifter1, c)
        } else if kind & SIGN != 0 {
            fill(&mut self.sign, c)
        } else if kind & COENG != 0 {
            self.feed_coeng(c, next)
        } else {
            self.feed_vowel(c, kind)
        }
    }

    fn feed_coeng(&mut self, marker: char, next: Option<char>) -> Flow {
        // Coeng RO after a base is typed before the next base.
        if next == Some(RO) && self.base.is_some() {
            return Flow::Stop;
        }
        let unit = Coeng {
            marker,
            consonant: next,
        };
        let taken = if next.is_some() { 2 } else { 1 };

        if self.coeng1.is_none() {
            self.coeng1 = Some(unit);
            Flow::Take(taken)
        } else if self.coeng1.and_then(|u| u.consonant) == Some(RO) && self.coeng2.is_none() {
            self.coeng2 = Some(unit);
            Flow::Take(taken)
        } else {
            Flow::Stop
        }
    }

    fn feed_vowel(&mut self, c: char, kind: u16) -> Flow {
        let vowel = match self.vowel {
            None => {
                if kind & LEFT != 0 && self.base.is_some() {
                    return Flow::Stop;
                }
                self.vowel = Some(c);
                return Flow::Take(1);
            }
            Some(v) => v,
        };

        // A left vowel after PO + SRA AA belongs to the next base.
        let left = kind & LEFT != 0;
        if self.base == Some(PO)
            && !self.po_sra_aa
            && (c == SRA_AA || (vowel == SRA_AA && !left))
        {
            self.po_sra_aa = true;
            if vowel == SRA_AA {
                self.vowel = Some(c);
            }
            return Flow::Take(1);
        }

        if vowel == SRA_E && kind & WITHE != 0 {
            self.vowel = sra_e_combination(c).or(Some(vowel));
        } else if (vowel == SRA_U && kind & WITHU != 0) || (has_class(vowel, WITHU) && c == SRA_U) {
            if !has_class(vowel, WITHU) {
                self.vowel = Some(c);
            }
            self.shifter1 = Some(base_shifter(self.base));
        } else if vowel == SRA_E && c == SRA_U {
            self.shifter1 = Some(base_shifter(self.base));
        } else {
            return Flow::Stop;
        }
        Flow::Take(1)
    }

    fn finish(mut self, output: &mut String) {
        if self.vowel == Some(SRA_U) && self.sign == Some(SAMYOK_SANNYA) {
            self.vowel = None;
            self.shifter1 = Some(MUUSIKATOAN);
        }

        if self.shifter1.is_some() {
            if let Some(shifter) = self.coeng1.and_then(|u| u.consonant).and_then(shifter_for) {
                self.shifter2 = Some(shifter);
                self.shifter1 = None;
            }
        }

        // PO + SRA AA over a coeng that can not sit under it reads as NYO.
        if let Some(consonant) = self.coeng2.or(self.coeng1).and_then(|u| u.consonant) {
            let fits_under = has_class(consonant, POSRAA);
            if !fits_under
                && ((self.po_sra_aa && self.vowel.is_some())
                    || (self.base == Some(PO) && self.vowel == Some(SRA_AA)))
            {
                self.base = Some(NYO);
                if self.vowel == Some(SRA_AA) && !self.po_sra_aa {
                    self.vowel = None;
                }
            }
        }

        if self.po_sra_aa && self.vowel == Some(SRA_E) {
            self.vowel = Some(SRA_OO);
        }

        output.extend(self.base);
        output.extend(self.robat);
        output.extend(self.shifter1);
        for unit in [self.coeng2, self.coeng1].into_iter().flatten() {
            output.push(unit.marker);
            output.extend(unit.consonant);
        }
        output.extend(self.shifter2);
        output.extend(self.vowel);
        output.extend(self.sign);
        output.extend(self.deferred);
    }
}

/// Reorders visual-order Khmer text into canonical order.
///
/// Characters outside the Khmer classes end the current cluster and are copied
/// through. A zero width space inside a cluster does not end it: it is moved
/// behind the cluster. Malformed sequences are clustered as well as possible,
/// nothing is dropped.
pub fn reorder(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut output = String::with_capacity(text.len());
    let mut i = 0;

    while i < chars.len() {
        let mut cluster = Cluster::default();
        let mut terminator = None;

        while i < chars.len() {
            let c = chars[i];
            let kind = khmer_type(c);
            if kind == 0 {
                i += 1;
                if c == ZWSP && !cluster.is_empty() {
                    cluster.deferred.push(c);
                    continue;
                }
                terminator = Some(c);
                break;
            }
            match cluster.feed(c, kind, chars.get(i + 1).copied()) {
                Flow::Take(n) => i += n,
                Flow::Stop => break,
            }
        }

        cluster.finish(&mut output);
        output.extend(terminator);
    }

    output
}
