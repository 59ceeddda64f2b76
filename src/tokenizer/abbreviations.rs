// WHY: abbreviation periods are not sentence ends
// A false split would cut "Dr. Smith" or "U.K. Ministry of Defence (MOD)" apart

use std::collections::HashSet;
use std::fmt;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Language whose abbreviation table drives sentence splitting
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Fr,
    It,
}

impl Language {
    pub const ALL: [Language; 3] = [Language::En, Language::Fr, Language::It];

    pub fn name(self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Fr => "fr",
            Language::It => "it",
        }
    }

    pub fn abbreviations(self) -> &'static [&'static str] {
        match self {
            Language::En => ENGLISH,
            Language::Fr => FRENCH,
            Language::It => ITALIAN,
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Abbreviations that commonly precede a capitalized word without ending the sentence
pub const ENGLISH: &[&str] = &[
    "Dr.", "Mr.", "Mrs.", "Ms.", "Prof.", "Sr.", "Jr.", "St.", "Mt.",
    "Gen.", "Gov.", "Sen.", "Rep.", "Rev.", "Capt.", "Col.", "Lt.", "Sgt.",
    "Inc.", "Ltd.", "Co.", "Corp.", "Dept.", "Univ.", "Assn.",
    "Fig.", "No.", "Vol.", "Ch.", "Sec.", "pp.", "ca.", "cf.", "vs.", "etc.", "al.",
    "Jan.", "Feb.", "Mar.", "Apr.", "Jun.", "Jul.", "Aug.", "Sep.", "Sept.", "Oct.", "Nov.", "Dec.",
];

pub const FRENCH: &[&str] = &[
    "MM.", "Mme.", "Mmes.", "Mlle.", "Mlles.", "Me.", "Mgr.", "Dr.", "Pr.", "St.", "Ste.",
    "Cie.", "Éts.", "av.", "apr.", "J.-C.", "etc.", "cf.", "p.", "pp.", "vol.", "chap.", "fig.",
    "env.", "éd.", "art.", "boul.", "bd.",
    "janv.", "févr.", "avr.", "juil.", "sept.", "oct.", "nov.", "déc.",
];

pub const ITALIAN: &[&str] = &[
    "Sig.", "Sigg.", "Dott.", "Prof.", "Ing.",
    "Avv.", "Arch.", "Geom.", "Rag.", "On.", "Mons.", "Gent.", "Egr.", "Spett.",
    "ecc.", "pag.", "pagg.", "pp.", "cap.", "vol.", "fig.", "art.", "cfr.", "n.",
    "gen.", "feb.", "mar.", "apr.", "mag.", "giu.", "lug.", "ago.", "sett.", "ott.", "nov.", "dic.",
];

/// Abbreviation lookup for sentence splitting
pub struct AbbreviationChecker {
    abbreviations: HashSet<&'static str>,
}

impl AbbreviationChecker {
    pub fn new() -> Self {
        Self::for_language(Language::En)
    }

    pub fn for_language(lang: Language) -> Self {
        Self {
            abbreviations: lang.abbreviations().iter().copied().collect(),
        }
    }

/// Check if a word is a known abbreviation
    pub fn is_abbreviation(&self, word: &str) -> bool {
        self.abbreviations.contains(word) || is_initialism(word)
    }

    /// Check if text ends with an abbreviation, ignoring surrounding quotes and brackets
    pub fn ends_with_abbreviation(&self, text: &str) -> bool {
        let Some(last_word) = text.split_whitespace().last() else {
            return false;
        };
        let clean_word = last_word.trim_matches(|c: char| {
            matches!(c, '"' | '\'' | '(' | '[' | '\u{201C}' | '\u{201D}' | '\u{2018}' | '\u{2019}' | '«' | '»')
        });
        self.is_abbreviation(clean_word)
    }
}

impl Default for AbbreviationChecker {
    fn default() -> Self {
        Self::new()
    }
}

/// Letters each followed by a period: "J.", "U.S.A.", "e.g."
fn is_initialism(word: &str) -> bool {
    let mut count = 0;
    for (i, c) in word.chars().enumerate() {
        let ok = if i % 2 == 0 { c.is_alphabetic() } else { c == '.' };
        if !ok {
            return false;
        }
        count += 1;
    }
    count >= 2 && count % 2 == 0
}
