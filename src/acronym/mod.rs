// WHY: public face of the acronym engine
// One Extractor per worker; it owns every scratch buffer so repeated calls do not allocate

use anyhow::{ensure, Result};
use serde::Serialize;
use tracing::debug;

use crate::config::ExtractorConfig;
use crate::tokenizer::Sentence;

pub mod checks;
pub mod matcher;
pub mod normalization;
mod scanner;

pub use crate::tokenizer::Span;
use normalization::{normalize_acronym_into, normalize_expansion_into, MatchBuffer};

/// Location of one acronym definition, as token indices into its sentence.
///
/// Also serves as the cursor for [`Extractor::search`]: the all-zero default
/// means "start of sentence".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub struct AcronymDefinition {
    pub acronym_start: usize,
    pub acronym_end: usize,
    pub expansion_start: usize,
    pub expansion_end: usize,
}

impl AcronymDefinition {
    pub fn new(acronym: Span, expansion: Span) -> Self {
        Self {
            acronym_start: acronym.start,
            acronym_end: acronym.end,
            expansion_start: expansion.start,
            expansion_end: expansion.end,
        }
    }

    pub fn acronym(&self) -> Span {
        Span::new(self.acronym_start, self.acronym_end)
    }

    pub fn expansion(&self) -> Span {
        Span::new(self.expansion_start, self.expansion_end)
    }

    /// "ACR (expansion)" as opposed to "expansion (ACR)"
    pub fn is_forward(&self) -> bool {
        self.acronym_start < self.expansion_start
    }
}

/// Normalized display strings borrowed from the extractor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DisplayPair<'a> {
    pub acronym: &'a str,
    pub expansion: &'a str,
}

/// An owned definition with its display strings
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Acronym {
    pub acronym: String,
    pub expansion: String,
    #[serde(flatten)]
    pub location: AcronymDefinition,
}

/// Acronym definition extractor
pub struct Extractor {
    config: ExtractorConfig,
    buffer: MatchBuffer,
    acronym_buf: String,
    expansion_buf: String,
}

impl Extractor {
    pub fn new(config: ExtractorConfig) -> Result<Self> {
        config.validate()?;
        debug!(?config, "Acronym extractor ready");
        Ok(Self {
            config,
            buffer: MatchBuffer::new(),
            acronym_buf: String::new(),
            expansion_buf: String::new(),
        })
    }

    pub fn with_default_config() -> Result<Self> {
        Self::new(ExtractorConfig::default())
    }

    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    /// Display strings of the last successful [`Extractor::search`] or
    /// [`Extractor::extract`]; empty before the first one
    pub fn last_match(&self) -> DisplayPair<'_> {
        DisplayPair {
            acronym: &self.acronym_buf,
            expansion: &self.expansion_buf,
        }
    }

    /// All definitions in a sentence, in order
    pub fn process(&mut self, sentence: &Sentence<'_>) -> Vec<AcronymDefinition> {
        let mut found = Vec::new();
        let mut cursor = AcronymDefinition::default();
        while self.search(sentence, &mut cursor) {
            found.push(cursor);
        }
        found
    }

    /// Display strings for a definition previously found in `sentence`
    pub fn extract(&mut self, sentence: &Sentence<'_>, definition: &AcronymDefinition) -> Result<DisplayPair<'_>> {
        let len = sentence.len();
        ensure!(
            definition.acronym_start < definition.acronym_end && definition.acronym_end <= len,
            "acronym span {}..{} is invalid for a sentence of {} tokens",
            definition.acronym_start,
            definition.acronym_end,
            len
        );
        ensure!(
            definition.expansion_start < definition.expansion_end && definition.expansion_end <= len,
            "expansion span {}..{} is invalid for a sentence of {} tokens",
            definition.expansion_start,
            definition.expansion_end,
            len
        );

        self.fill_display(sentence, definition);
        Ok(self.last_match())
    }

    /// Iterate over the definitions of a sentence as owned values
    pub fn definitions<'e, 's, 'a>(&'e mut self, sentence: &'s Sentence<'a>) -> Definitions<'e, 's, 'a> {
        Definitions {
            extractor: self,
            sentence,
            cursor: AcronymDefinition::default(),
        }
    }

    pub fn find_all(&mut self, sentence: &Sentence<'_>) -> Vec<Acronym> {
        self.definitions(sentence).collect()
    }

    fn fill_display(&mut self, sentence: &Sentence<'_>, definition: &AcronymDefinition) {
        let tokens = sentence.tokens();
        // the acronym is always a single token
        normalize_acronym_into(tokens[definition.acronym_start].text, &mut self.acronym_buf);
        normalize_expansion_into(sentence.span_text(definition.expansion()), &mut self.expansion_buf);
    }
}

/// Iterator returned by [`Extractor::definitions`]
pub struct Definitions<'e, 's, 'a> {
    extractor: &'e mut Extractor,
    sentence: &'s Sentence<'a>,
    cursor: AcronymDefinition,
}

impl Iterator for Definitions<'_, '_, '_> {
    type Item = Acronym;

    fn next(&mut self) -> Option<Acronym> {
        if !self.extractor.search(self.sentence, &mut self.cursor) {
            return None;
        }
        let found = self.extractor.last_match();
        Some(Acronym {
            acronym: found.acronym.to_string(),
            expansion: found.expansion.to_string(),
            location: self.cursor,
        })
    }
}
