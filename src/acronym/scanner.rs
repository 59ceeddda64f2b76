// WHY: definitions are anchored on brackets
// The scanner walks a sentence bracket by bracket and resumes after the previous hit

use tracing::{debug, trace};

use super::checks::{cap_span, ltrim_symbols, post_check, pre_check, rtrim_symbols, truncate_expansion};
use super::matcher::{match_forward, match_reverse};
use super::{AcronymDefinition, Extractor};
use crate::tokenizer::{Sentence, Span, Token};

/// Left boundary and scan position to continue from, given the previous result
fn resume_point(cursor: &AcronymDefinition) -> (usize, usize) {
    if cursor.acronym_start > cursor.expansion_end {
        // "expansion (ACR)"
        let next = cursor.acronym_end + 1;
        (next, next)
    } else if cursor.expansion_end != 0 {
        // "ACR (expansion)"
        (cursor.expansion_end, cursor.expansion_end)
    } else {
        (0, 1)
    }
}

/// Index of the bracket closing the one opened just before `from`, or the
/// sentence length if it is never closed
fn find_closing_bracket(tokens: &[Token<'_>], from: usize, open: &str, close: &str) -> usize {
    let mut depth = 1usize;
    for (i, token) in tokens.iter().enumerate().skip(from) {
        if token.text == open {
            depth += 1;
        } else if token.text == close {
            depth -= 1;
            if depth == 0 {
                return i;
            }
        }
    }
    tokens.len()
}

impl Extractor {
    /// Find the next definition in `sentence` after the one held in `cursor`.
    ///
    /// Start from `AcronymDefinition::default()` and pass the same record on
    /// every call. On success the record is overwritten with the new definition,
    /// its display strings are available through [`Extractor::last_match`], and
    /// `true` is returned. `false` means the sentence is exhausted.
    pub fn search(&mut self, sentence: &Sentence<'_>, cursor: &mut AcronymDefinition) -> bool {
        let tokens = sentence.tokens();
        let (mut left, mut i) = resume_point(cursor);

        while i + 1 < tokens.len() {
            let brackets = match tokens[i].text {
                // a clause separator bounds the expansion on the left
                ";" | ":" => {
                    left = i + 1;
                    None
                }
                "(" => Some(("(", ")")),
                "[" => Some(("[", "]")),
                "{" => Some(("{", "}")),
                _ => None,
            };

            if let Some((open, close)) = brackets {
                let close_at = find_closing_bracket(tokens, i + 1, open, close);
                let before = Span::new(left.min(i), i);
                let inside = Span::new(i + 1, close_at);

                if let Some(found) = self.find_acronym(sentence, before, inside) {
                    *cursor = found;
                    self.fill_display(sentence, &found);
                    debug!(
                        acronym = %self.acronym_buf,
                        expansion = %self.expansion_buf,
                        "Found acronym definition"
                    );
                    return true;
                }
            }
            i += 1;
        }

        false
    }

    /// Try both forms around one bracket pair
    fn find_acronym(&mut self, sentence: &Sentence<'_>, before: Span, inside: Span) -> Option<AcronymDefinition> {
        let before = rtrim_symbols(sentence, before);
        let inside = ltrim_symbols(sentence, rtrim_symbols(sentence, inside));
        if before.is_empty() || inside.is_empty() {
            return None;
        }

        if inside.len() == 1 {
            if let Some(found) = self.try_reverse(sentence, before, inside.start) {
                return Some(found);
            }
        }
        self.try_forward(sentence, before, inside)
    }

    /// "expansion (ACR)"
    fn try_reverse(&mut self, sentence: &Sentence<'_>, expansion: Span, acronym: usize) -> Option<AcronymDefinition> {
        let expansion = cap_span(expansion, self.config.max_expansion_tokens);
        if !pre_check(&sentence.tokens()[acronym]) {
            return None;
        }

        self.buffer.encode(sentence, acronym, expansion);
        let Some(first_word) = match_reverse(&self.buffer) else {
            trace!(acronym = sentence.tokens()[acronym].text, "No reverse alignment");
            return None;
        };
        let expansion = Span::new(self.buffer.word_token(first_word), expansion.end);

        if !post_check(sentence, acronym, expansion, &self.config) {
            return None;
        }
        Some(AcronymDefinition::new(Span::new(acronym, acronym + 1), expansion))
    }

    /// "ACR (expansion)": the acronym is the last token before the bracket
    fn try_forward(&mut self, sentence: &Sentence<'_>, before: Span, inside: Span) -> Option<AcronymDefinition> {
        let acronym = before.end - 1;
        let mut expansion = cap_span(inside, self.config.max_expansion_tokens);
        if !pre_check(&sentence.tokens()[acronym]) {
            return None;
        }

        self.buffer.encode(sentence, acronym, expansion);
        let Some(end_word) = match_forward(&self.buffer) else {
            trace!(acronym = sentence.tokens()[acronym].text, "No forward alignment");
            return None;
        };
        let last_word = self.buffer.word_token(end_word - 1);
        if last_word < expansion.end {
            truncate_expansion(sentence, &mut expansion, last_word);
        }

        if !post_check(sentence, acronym, expansion, &self.config) {
            return None;
        }
        Some(AcronymDefinition::new(Span::new(acronym, acronym + 1), expansion))
    }
}
