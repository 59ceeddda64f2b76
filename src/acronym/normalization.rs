// WHY: matching and display need two different normal forms
// Matching wants bare folded letters; display keeps the author's casing and diacritics

use crate::tokenizer::{Sentence, Span};
use crate::unicode::{fold_letter, is_double_quote, is_letter, is_whitespace};

/// Separates the acronym letters from the expansion words in the match buffer
pub const ACRONYM_END: char = '\t';
/// Terminates every normalized expansion word
pub const WORD_END: char = ' ';

/// Where a normalized expansion word starts in the match buffer, and which
/// source token it was cut from. One token may yield several words
/// ("D-glyceraldehyde" is a single token for some tokenizers).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WordAssoc {
    pub offset: usize,
    pub token: usize,
}

/// Scratch encoding of `<acronym letters> TAB (<word> SPACE)*`
#[derive(Debug, Default)]
pub struct MatchBuffer {
    text: Vec<char>,
    acronym_len: usize,
    words: Vec<WordAssoc>,
}

impl MatchBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild the buffer for one acronym token and one expansion span.
    ///
    /// Only letters are kept. Digits are dropped on both sides so that
    /// "NaH2PO4" can match "Natriumdihydrogenphosphat".
    pub fn encode(&mut self, sentence: &Sentence<'_>, acronym: usize, expansion: Span) {
        self.text.clear();
        self.words.clear();

        let tokens = sentence.tokens();
        for c in tokens[acronym].text.chars() {
            if is_letter(c) {
                fold_letter(c, &mut self.text);
            }
        }
        self.acronym_len = self.text.len();
        self.text.push(ACRONYM_END);

        for t in expansion.start..expansion.end {
            let mut in_word = false;
            for c in tokens[t].text.chars() {
                if is_letter(c) {
                    let before = self.text.len();
                    fold_letter(c, &mut self.text);
                    // a word starts at its first letter that folds to something
                    if !in_word && self.text.len() > before {
                        in_word = true;
                        self.words.push(WordAssoc { offset: before, token: t });
                    }
                } else if in_word {
                    self.text.push(WORD_END);
                    in_word = false;
                }
            }
            if in_word {
                self.text.push(WORD_END);
            }
        }
    }

    /// Folded acronym letters, without the separator
    pub fn acronym(&self) -> &[char] {
        &self.text[..self.acronym_len]
    }

    pub fn word_count(&self) -> usize {
        self.words.len()
    }

    /// Source token index of a normalized word
    pub fn word_token(&self, word: usize) -> usize {
        self.words[word].token
    }

    /// Codepoint `pos` of normalized word `word`; [`WORD_END`] past its last letter
    #[inline]
    pub fn char_at(&self, word: usize, pos: usize) -> char {
        self.text[self.words[word].offset + pos]
    }
}

/// Display form of an expansion: quotes dropped, whitespace runs collapsed to
/// one space, everything else verbatim
pub fn normalize_expansion(text: &str) -> String {
    let mut buffer = String::with_capacity(text.len());
    normalize_expansion_into(text, &mut buffer);
    buffer
}

/// Same as [`normalize_expansion`], reusing the supplied buffer
pub fn normalize_expansion_into(text: &str, buffer: &mut String) {
    buffer.clear();
    buffer.reserve(text.len());

    let mut pending_space = false;
    for c in text.chars() {
        if is_double_quote(c) {
            continue;
        }
        if is_whitespace(c) {
            pending_space = true;
            continue;
        }
        if pending_space && !buffer.is_empty() {
            buffer.push(' ');
        }
        pending_space = false;
        buffer.push(c);
    }
}

/// Display form of an acronym: periods dropped ("U.S.A." becomes "USA")
pub fn normalize_acronym(text: &str) -> String {
    let mut buffer = String::with_capacity(text.len());
    normalize_acronym_into(text, &mut buffer);
    buffer
}

pub fn normalize_acronym_into(text: &str, buffer: &mut String) {
    buffer.clear();
    buffer.extend(text.chars().filter(|&c| c != '.'));
}
