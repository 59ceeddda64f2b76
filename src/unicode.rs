// WHY: single place for codepoint classification and folding
// The acronym engine and the tokenizer must agree on what a letter is

use unicode_general_category::{get_general_category, GeneralCategory};
use unicode_normalization::char::decompose_compatible;

/// Longest folded form kept for matching. The ligatures U+FB03 and U+FB04
/// expand to three letters; anything wider is useless for matching.
pub const MAX_FOLDED_LEN: usize = 3;

/// Coarse classification of a codepoint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CharClass {
    /// Letter; `upper` is set for uppercase letters (Lu)
    Letter { upper: bool },
    /// Decimal, letter, or other number (Nd, Nl, No)
    Digit,
    /// Control characters, space separators, line separators (Cc, Zs, Zl)
    Whitespace,
    /// Everything else
    Other,
}

/// Classify a codepoint by its general category
pub fn char_class(c: char) -> CharClass {
    match get_general_category(c) {
        GeneralCategory::UppercaseLetter => CharClass::Letter { upper: true },
        GeneralCategory::LowercaseLetter
        | GeneralCategory::TitlecaseLetter
        | GeneralCategory::ModifierLetter
        | GeneralCategory::OtherLetter => CharClass::Letter { upper: false },
        GeneralCategory::DecimalNumber
        | GeneralCategory::LetterNumber
        | GeneralCategory::OtherNumber => CharClass::Digit,
        GeneralCategory::Control
        | GeneralCategory::SpaceSeparator
        | GeneralCategory::LineSeparator => CharClass::Whitespace,
        _ => CharClass::Other,
    }
}

#[inline]
pub fn is_letter(c: char) -> bool {
    matches!(char_class(c), CharClass::Letter { .. })
}

#[inline]
pub fn is_upper(c: char) -> bool {
    matches!(char_class(c), CharClass::Letter { upper: true })
}

#[inline]
pub fn is_alnum(c: char) -> bool {
    matches!(char_class(c), CharClass::Letter { .. } | CharClass::Digit)
}

#[inline]
pub fn is_whitespace(c: char) -> bool {
    char_class(c) == CharClass::Whitespace
}

/// Double and angled quotation marks, dropped from display strings
#[inline]
pub fn is_double_quote(c: char) -> bool {
    matches!(c, '"' | '\u{201D}' | '\u{201C}' | '\u{201E}' | '\u{00AB}' | '\u{00BB}')
}

#[inline]
fn is_mark(c: char) -> bool {
    matches!(
        get_general_category(c),
        GeneralCategory::NonspacingMark
            | GeneralCategory::SpacingMark
            | GeneralCategory::EnclosingMark
    )
}

#[derive(Default)]
struct Folded {
    chars: [char; MAX_FOLDED_LEN],
    len: usize,
    overflow: bool,
}

impl Folded {
    fn push(&mut self, c: char) {
        if self.len < MAX_FOLDED_LEN {
            self.chars[self.len] = c;
            self.len += 1;
        } else {
            self.overflow = true;
        }
    }

    fn as_slice(&self) -> &[char] {
        &self.chars[..self.len]
    }
}

/// Fold a letter for matching and append the result to `out`.
///
/// Compatibility decomposition, lowercasing, and mark stripping are applied;
/// results wider than [`MAX_FOLDED_LEN`] are dropped entirely.
/// The ligatures œ and æ are folded to their first letter instead of being
/// decomposed: "IOR" must match "Institut pour les œuvres de religion".
pub fn fold_letter(c: char, out: &mut Vec<char>) {
    match c {
        '\u{0153}' | '\u{0152}' => out.push('o'),
        '\u{00E6}' | '\u{00C6}' => out.push('a'),
        _ => {
            let mut folded = Folded::default();

            decompose_compatible(c, |d| {
                if is_mark(d) {
                    return;
                }
                for lower in d.to_lowercase() {
                    // casefold maps the sharp s to "ss"
                    if lower == '\u{00DF}' {
                        folded.push('s');
                        folded.push('s');
                    } else if !is_mark(lower) {
                        folded.push(lower);
                    }
                }
            });

            if !folded.overflow {
                out.extend_from_slice(folded.as_slice());
            }
        }
    }
}
