// WHY: letter alignment alone accepts too much
// These gates reject candidates that do not look like acronyms or definitions

use tracing::trace;

use crate::config::ExtractorConfig;
use crate::tokenizer::{Sentence, Span, Token};
use crate::unicode::{is_alnum, is_upper};

/// Shortest acronym, in codepoints
pub const MIN_ACRONYM_CHARS: usize = 2;
/// Longest acronym, in codepoints
pub const MAX_ACRONYM_CHARS: usize = 10;

/// Does the token look like an acronym?
///
/// Between 2 and 10 codepoints, starting with a letter or digit, with at least
/// one uppercase letter when two codepoints long and at least two otherwise.
pub fn pre_check(token: &Token<'_>) -> bool {
    let len = token.text.chars().count();
    if !(MIN_ACRONYM_CHARS..=MAX_ACRONYM_CHARS).contains(&len) {
        return false;
    }
    if !token.text.chars().next().is_some_and(is_alnum) {
        return false;
    }
    let needed = if len == 2 { 1 } else { 2 };
    token.text.chars().filter(|&c| is_upper(c)).take(needed).count() == needed
}

/// Plausibility of a matched (acronym, expansion) pair
pub fn post_check(
    sentence: &Sentence<'_>,
    acronym: usize,
    expansion: Span,
    config: &ExtractorConfig,
) -> bool {
    let tokens = sentence.tokens();
    let acronym_text = tokens[acronym].text;
    let expansion_chars = sentence.span_text(expansion).chars().count();

    if config.length_checks && expansion_chars > config.max_expansion_chars {
        trace!(acronym = acronym_text, expansion_chars, "Rejected: expansion too long");
        return false;
    }

    if !parentheses_balanced(sentence.span_text(expansion)) {
        trace!(acronym = acronym_text, "Rejected: unbalanced parentheses in expansion");
        return false;
    }

    if config.length_checks {
        let ratio = acronym_text.chars().count() as f64 / expansion_chars as f64;
        if ratio <= config.min_ratio || ratio >= config.max_ratio {
            trace!(acronym = acronym_text, ratio, "Rejected: length ratio out of range");
            return false;
        }
    }

    if tokens[expansion.start..expansion.end].iter().any(|t| t.text == acronym_text) {
        trace!(acronym = acronym_text, "Rejected: expansion contains the acronym");
        return false;
    }

    true
}

/// Brackets are counted in the literal text, so a token such as "Leninist)"
/// from a foreign tokenizer still counts
fn parentheses_balanced(text: &str) -> bool {
    let mut depth: usize = 0;
    for c in text.chars() {
        match c {
            '(' => depth += 1,
            ')' => match depth.checked_sub(1) {
                Some(d) => depth = d,
                None => return false,
            },
            _ => {}
        }
    }
    depth == 0
}

/// Drop symbol tokens from the end of a span
pub fn rtrim_symbols(sentence: &Sentence<'_>, mut span: Span) -> Span {
    let tokens = sentence.tokens();
    while span.end > span.start && tokens[span.end - 1].is_symbol() {
        span.end -= 1;
    }
    span
}

/// Drop symbol tokens from the start of a span
pub fn ltrim_symbols(sentence: &Sentence<'_>, mut span: Span) -> Span {
    let tokens = sentence.tokens();
    while span.start < span.end && tokens[span.start].is_symbol() {
        span.start += 1;
    }
    span
}

/// Keep at most the last `max` tokens of a span
pub fn cap_span(span: Span, max: usize) -> Span {
    if span.len() > max {
        Span::new(span.end - max, span.end)
    } else {
        span
    }
}

/// Cut a forward-form expansion at the first symbol at or after `last_word`,
/// the token holding the last matched letter. Commas are stepped over when the
/// matched part already contains one ("Gulf, Mobile and Ohio Railroad").
pub fn truncate_expansion(sentence: &Sentence<'_>, expansion: &mut Span, last_word: usize) {
    let tokens = sentence.tokens();
    let has_comma = tokens[expansion.start..last_word].iter().any(|t| t.text == ",");

    for i in last_word..expansion.end {
        let token = &tokens[i];
        if !token.is_symbol() || (has_comma && token.text == ",") {
            continue;
        }
        expansion.end = i;
        return;
    }
}
