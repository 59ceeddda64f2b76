pub mod acronym;
pub mod config;
pub mod processing;
pub mod reader;
pub mod tokenizer;
pub mod unicode;

// Re-export main types for convenient access
pub use acronym::{Acronym, AcronymDefinition, Definitions, DisplayPair, Extractor, Span};
pub use config::ExtractorConfig;
pub use tokenizer::{Language, Sentence, Token, TokenKind, Tokenizer, TokenizerConfig};

// Re-export processing helpers for the CLI and benchmarks
pub use processing::{process_text, FileStats, RunStats, TextReport};
pub use reader::{AsyncTextReader, InputSource, ReadStats, ReaderConfig};
