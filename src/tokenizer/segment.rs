// WHY: sentence boundaries bound the acronym search
// A definition never spans two sentences, so the text is cut before tokenization

use std::ops::Range;

use anyhow::Result;
use regex_automata::meta::Regex;
use tracing::{debug, trace};

use super::{AbbreviationChecker, Language};

/// Terminal punctuation, optional closing quotes or brackets, whitespace, then an
/// uppercase letter optionally preceded by an opening quote.
/// An opening bracket does not start a sentence: "U.S.A. (United States of America)".
const BOUNDARY_PATTERN: &str = r#"[.!?…]+["'”’»)\]]*\s+["'“‘«]?\p{Lu}"#;

/// Regex-driven sentence splitter with abbreviation suppression
pub struct SentenceSplitter {
    boundary: Regex,
    abbreviations: AbbreviationChecker,
}

impl SentenceSplitter {
    pub fn new(lang: Language) -> Result<Self> {
        let boundary = Regex::new(BOUNDARY_PATTERN)?;
        debug!(%lang, "Compiled sentence boundary pattern: {}", BOUNDARY_PATTERN);
        Ok(Self {
            boundary,
            abbreviations: AbbreviationChecker::for_language(lang),
        })
    }

    /// Byte ranges of the sentences in `text`, trimmed of surrounding whitespace
    pub fn split(&self, text: &str) -> Vec<Range<usize>> {
        let mut ranges = Vec::new();
        let mut start = skip_whitespace(text, 0);

        for m in self.boundary.find_iter(text) {
            if m.start() < start {
                continue;
            }
            let Some(gap) = text[m.start()..m.end()].find(char::is_whitespace) else {
                continue;
            };
            let end = m.start() + gap;

            if self.abbreviations.ends_with_abbreviation(&text[start..end]) {
                trace!("Boundary at byte {} suppressed by abbreviation", end);
                continue;
            }

            ranges.push(start..end);
            start = skip_whitespace(text, end);
        }

        let end = text.trim_end().len();
        if start < end {
            ranges.push(start..end);
        }
        ranges
    }
}

fn skip_whitespace(text: &str, from: usize) -> usize {
    text[from..]
        .char_indices()
        .find(|(_, c)| !c.is_whitespace())
        .map(|(i, _)| from + i)
        .unwrap_or(text.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn split<'a>(text: &'a str) -> Vec<&'a str> {
        split_as(Language::En, text)
    }

    fn split_as<'a>(lang: Language, text: &'a str) -> Vec<&'a str> {
        let splitter = SentenceSplitter::new(lang).unwrap();
        splitter.split(text).into_iter().map(|r| &text[r]).collect()
    }

    #[test]
    fn test_basic_split() {
        assert_eq!(
            split("Hello world. This is a test! How are you?"),
            ["Hello world.", "This is a test!", "How are you?"]
        );
    }

    #[test]
    fn test_titles_do_not_split() {
        assert_eq!(
            split("Dr. Smith joined the WHO. He left in May."),
            ["Dr. Smith joined the WHO.", "He left in May."]
        );
    }

    #[test]
    fn test_french_titles_do_not_split() {
        let text = "Mme. Dupont dirige la Société Générale (SG). Elle part.";
        assert_eq!(
            split_as(Language::Fr, text),
            ["Mme. Dupont dirige la Société Générale (SG).", "Elle part."]
        );
        // unknown to the English table
        assert_eq!(split(text).len(), 3);
    }

    #[test]
    fn test_italian_titles_do_not_split() {
        assert_eq!(
            split_as(Language::It, "Il Dott. Rossi guida l'Istituto Superiore di Sanità (ISS). Poi basta."),
            ["Il Dott. Rossi guida l'Istituto Superiore di Sanità (ISS).", "Poi basta."]
        );
    }

    #[test]
    fn test_initialism_followed_by_bracket() {
        let text = "U.S.A. (United States of America) is long. Next one.";
        assert_eq!(
            split(text),
            ["U.S.A. (United States of America) is long.", "Next one."]
        );
    }

    #[test]
    fn test_quotes_and_lowercase_continuation() {
        assert_eq!(
            split("He said \"stop.\" Then he left. it continues."),
            ["He said \"stop.\"", "Then he left. it continues."]
        );
    }

    #[test]
    fn test_whitespace_only() {
        assert!(split("   \n ").is_empty());
        assert_eq!(split("  One sentence  "), ["One sentence"]);
    }
}
