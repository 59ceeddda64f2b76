// WHY: plausibility thresholds were tuned on corpora, not derived
// They live in configuration so they can be retuned without touching the engine

use std::path::Path;

use anyhow::{ensure, Context, Result};
use serde::{Deserialize, Serialize};

/// Settings for the acronym extractor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractorConfig {
    /// Token cap applied to the candidate expansion before matching.
    /// Longer candidates keep only their last tokens (reverse form) or are cut
    /// the same way on the bracket side (forward form).
    pub max_expansion_tokens: usize,
    /// Longest accepted expansion, in codepoints of raw source text
    pub max_expansion_chars: usize,
    /// Exclusive lower bound of `acronym length / expansion length`
    pub min_ratio: f64,
    /// Exclusive upper bound of `acronym length / expansion length`
    pub max_ratio: f64,
    /// Enables the expansion length cap and the ratio window
    pub length_checks: bool,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            max_expansion_tokens: 100,
            max_expansion_chars: 100,
            // Determined on German text, which has the longest expansions
            min_ratio: 0.037,
            max_ratio: 1.0,
            length_checks: true,
        }
    }
}

impl ExtractorConfig {
    /// Reject settings under which nothing could ever match
    pub fn validate(&self) -> Result<()> {
        ensure!(self.max_expansion_tokens > 0, "max_expansion_tokens must be positive");
        if self.length_checks {
            ensure!(self.max_expansion_chars > 0, "max_expansion_chars must be positive");
            ensure!(
                self.min_ratio >= 0.0 && self.min_ratio < self.max_ratio,
                "ratio window ({}, {}) is empty",
                self.min_ratio,
                self.max_ratio
            );
        }
        Ok(())
    }

    /// Load a JSON configuration file; missing fields take their defaults
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("cannot read config file {}", path.display()))?;
        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("invalid config file {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }
}
