// WHY: token front end for the acronym engine
// Splits text into sentences, then sentences into word/punctuation tokens that borrow the source

use anyhow::{ensure, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;
use unicode_segmentation::UnicodeSegmentation;

use crate::unicode::{is_alnum, is_letter, CharClass, char_class};

pub mod abbreviations;
pub mod segment;

pub use abbreviations::{AbbreviationChecker, Language};
pub use segment::SentenceSplitter;

/// Coarse lexical type of a token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TokenKind {
    /// Contains at least one letter
    Word,
    /// Single punctuation or symbol character: brackets, colons, quotes, ...
    Symbol,
    /// Digits, possibly with internal separators
    Number,
    /// Anything else (emoji sequences, mixed symbol runs)
    Other,
}

impl TokenKind {
    /// Classify a token's text
    pub fn classify(text: &str) -> Self {
        let mut chars = text.chars();
        let Some(first) = chars.next() else {
            return TokenKind::Other;
        };

        if chars.as_str().is_empty() && !is_alnum(first) && char_class(first) != CharClass::Whitespace {
            return TokenKind::Symbol;
        }
        if text.chars().any(is_letter) {
            return TokenKind::Word;
        }
        if char_class(first) == CharClass::Digit
            && text.chars().all(|c| char_class(c) == CharClass::Digit || matches!(c, '.' | ','))
        {
            return TokenKind::Number;
        }
        TokenKind::Other
    }
}

/// A token borrowed from the enclosing text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    /// Raw text of the token
    pub text: &'a str,
    /// Byte offset of the token from the start of the enclosing text
    pub offset: usize,
    pub kind: TokenKind,
}

impl<'a> Token<'a> {
    pub fn new(text: &'a str, offset: usize, kind: TokenKind) -> Self {
        Self { text, offset, kind }
    }

    /// Byte length
    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Byte offset one past the end of the token
    pub fn end(&self) -> usize {
        self.offset + self.text.len()
    }

    pub fn is_symbol(&self) -> bool {
        self.kind == TokenKind::Symbol
    }
}

/// Half-open range `[start, end)` of token indices within one sentence
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        debug_assert!(start <= end);
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// One sentence: the enclosing text and the tokens found in it
#[derive(Debug, Clone)]
pub struct Sentence<'a> {
    source: &'a str,
    tokens: Vec<Token<'a>>,
}

impl<'a> Sentence<'a> {
    /// Build a sentence from caller-supplied tokens.
    ///
    /// Every token must occur verbatim at its byte offset in `source`, and
    /// tokens must be ordered without overlap.
    pub fn new(source: &'a str, tokens: Vec<Token<'a>>) -> Result<Self> {
        let mut prev_end = 0;
        for (i, token) in tokens.iter().enumerate() {
            ensure!(
                source.get(token.offset..token.end()) == Some(token.text),
                "token {} ({:?}) does not occur at byte offset {} of the source text",
                i,
                token.text,
                token.offset
            );
            ensure!(
                token.offset >= prev_end,
                "token {} ({:?}) overlaps the previous token",
                i,
                token.text
            );
            prev_end = token.end();
        }
        Ok(Self { source, tokens })
    }

    /// Tokens produced by [`Tokenizer`] are consistent with their source by construction
    pub(crate) fn from_tokenizer(source: &'a str, tokens: Vec<Token<'a>>) -> Self {
        Self { source, tokens }
    }

    /// Enclosing text the token offsets refer to
    pub fn source(&self) -> &'a str {
        self.source
    }

    pub fn tokens(&self) -> &[Token<'a>] {
        &self.tokens
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Raw source text covered by a span, from the start of its first token
    /// to the end of its last one (interior whitespace included)
    pub fn span_text(&self, span: Span) -> &'a str {
        if span.is_empty() {
            return "";
        }
        let start = self.tokens[span.start].offset;
        let end = self.tokens[span.end - 1].end();
        &self.source[start..end]
    }
}

/// Tokenizer settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TokenizerConfig {
    /// Sentences longer than this many tokens are cut into chunks
    pub max_sentence_tokens: usize,
    /// Selects the abbreviation table used by the sentence splitter
    pub lang: Language,
}

impl Default for TokenizerConfig {
    fn default() -> Self {
        Self {
            max_sentence_tokens: 1000,
            lang: Language::En,
        }
    }
}

/// Sentence splitter plus UAX #29 word segmentation
pub struct Tokenizer {
    config: TokenizerConfig,
    splitter: SentenceSplitter,
}

impl Tokenizer {
    pub fn new(config: TokenizerConfig) -> Result<Self> {
        ensure!(
            config.max_sentence_tokens > 0,
            "max_sentence_tokens must be positive"
        );
        let splitter = SentenceSplitter::new(config.lang)?;
        debug!(?config, "Tokenizer ready");
        Ok(Self { config, splitter })
    }

    pub fn with_default_config() -> Result<Self> {
        Self::new(TokenizerConfig::default())
    }

    pub fn config(&self) -> &TokenizerConfig {
        &self.config
    }

    /// Tokenize the whole text as a single stream, without sentence splitting
    pub fn tokenize<'a>(&self, text: &'a str) -> Vec<Token<'a>> {
        let mut tokens = Vec::new();
        tokenize_range(text, 0, text.len(), &mut tokens);
        tokens
    }

    /// Split text into sentences and tokenize each one
    pub fn sentences<'a>(&self, text: &'a str) -> Vec<Sentence<'a>> {
        let mut sentences = Vec::new();
        let mut tokens = Vec::new();

        for range in self.splitter.split(text) {
            tokens.clear();
            tokenize_range(text, range.start, range.end, &mut tokens);
            for chunk in tokens.chunks(self.config.max_sentence_tokens) {
                sentences.push(Sentence::from_tokenizer(text, chunk.to_vec()));
            }
        }

        debug!("Tokenized {} bytes into {} sentences", text.len(), sentences.len());
        sentences
    }
}

fn tokenize_range<'a>(text: &'a str, start: usize, end: usize, out: &mut Vec<Token<'a>>) {
    for (idx, word) in text[start..end].split_word_bound_indices() {
        if word.chars().all(char::is_whitespace) {
            continue;
        }
        out.push(Token::new(word, start + idx, TokenKind::classify(word)));
    }
}
