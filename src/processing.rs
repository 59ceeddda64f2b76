// WHY: per-input processing and run statistics shared by the CLI, tests, and benches

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tokio::io::{AsyncWriteExt, BufWriter};

use crate::acronym::{Acronym, Extractor};
use crate::reader::ReadStats;
use crate::tokenizer::Tokenizer;

/// What one input yielded
#[derive(Debug, Clone, Default)]
pub struct TextReport {
    pub acronyms: Vec<Acronym>,
    pub sentences: u64,
    pub chars: u64,
}

/// Tokenize a text and collect every definition in it, sentence by sentence
pub fn process_text(tokenizer: &Tokenizer, extractor: &mut Extractor, text: &str) -> TextReport {
    let sentences = tokenizer.sentences(text);
    let mut acronyms = Vec::new();
    for sentence in &sentences {
        acronyms.extend(extractor.definitions(sentence));
    }

    TextReport {
        acronyms,
        sentences: sentences.len() as u64,
        chars: text.chars().count() as u64,
    }
}

/// Per-input processing statistics
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct FileStats {
    /// Input path, or "-" for standard input
    pub path: String,
    /// Bytes read before decoding, or before the read failed
    pub bytes_read: u64,
    /// Time spent reading in milliseconds
    pub read_time_ms: u64,
    /// Number of characters processed
    pub chars_processed: u64,
    /// Number of sentences after splitting and chunking
    pub sentences: u64,
    /// Number of definitions extracted
    pub acronyms_found: u64,
    /// Read plus processing time in milliseconds
    pub processing_time_ms: u64,
    /// Processing status (success, failed)
    pub status: String,
    /// Error message if processing failed
    pub error: Option<String>,
}

impl FileStats {
    pub fn success(path: String, report: &TextReport, processing_time_ms: u64) -> Self {
        Self {
            path,
            bytes_read: 0,
            read_time_ms: 0,
            chars_processed: report.chars,
            sentences: report.sentences,
            acronyms_found: report.acronyms.len() as u64,
            processing_time_ms,
            status: "success".to_string(),
            error: None,
        }
    }

    pub fn failed(path: String, error: String, processing_time_ms: u64) -> Self {
        Self {
            path,
            bytes_read: 0,
            read_time_ms: 0,
            chars_processed: 0,
            sentences: 0,
            acronyms_found: 0,
            processing_time_ms,
            status: "failed".to_string(),
            error: Some(error),
        }
    }

    /// Attach the reader's figures for this input
    pub fn with_read(mut self, read: &ReadStats) -> Self {
        self.bytes_read = read.bytes_read;
        self.read_time_ms = read.duration_ms;
        self
    }

    pub fn is_failed(&self) -> bool {
        self.error.is_some()
    }
}

/// Aggregate statistics of one CLI run
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct RunStats {
    /// Seconds since the Unix epoch at which the run started
    pub run_start: u64,
    pub total_processing_time_ms: u64,
    pub total_chars_processed: u64,
    pub total_sentences: u64,
    pub total_acronyms: u64,
    pub files_processed: u64,
    pub files_failed: u64,
    pub file_stats: Vec<FileStats>,
}

impl RunStats {
    pub fn new(run_start: u64) -> Self {
        Self {
            run_start,
            ..Default::default()
        }
    }

    /// Fold one input's statistics into the totals
    pub fn record(&mut self, stats: FileStats) {
        if stats.is_failed() {
            self.files_failed += 1;
        } else {
            self.files_processed += 1;
            self.total_chars_processed += stats.chars_processed;
            self.total_sentences += stats.sentences;
            self.total_acronyms += stats.acronyms_found;
        }
        self.file_stats.push(stats);
    }

    /// Write pretty-printed JSON to `path`
    pub async fn write_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_vec_pretty(self)?;
        let file = tokio::fs::File::create(path)
            .await
            .with_context(|| format!("cannot create stats file {}", path.display()))?;
        let mut writer = BufWriter::new(file);
        writer.write_all(&json).await?;
        writer.write_all(b"\n").await?;
        writer.flush().await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_process_text_counts() {
        let tokenizer = Tokenizer::with_default_config().unwrap();
        let mut extractor = Extractor::with_default_config().unwrap();
        let text = "The World Health Organization (WHO) met. Nothing here. WHO (World Health Organization) again.";

        let report = process_text(&tokenizer, &mut extractor, text);
        assert_eq!(report.sentences, 3);
        assert_eq!(report.chars, text.chars().count() as u64);
        assert_eq!(report.acronyms.len(), 2);
        assert!(report.acronyms.iter().all(|a| a.acronym == "WHO"));
    }

    #[test]
    fn test_record_totals() {
        let report = TextReport {
            acronyms: Vec::new(),
            sentences: 4,
            chars: 120,
        };
        let mut run = RunStats::new(0);
        run.record(FileStats::success("a.txt".to_string(), &report, 3));
        run.record(FileStats::success("b.txt".to_string(), &report, 5));
        run.record(FileStats::failed("c.txt".to_string(), "boom".to_string(), 1));

        assert_eq!(run.files_processed, 2);
        assert_eq!(run.files_failed, 1);
        assert_eq!(run.total_chars_processed, 240);
        assert_eq!(run.total_sentences, 8);
        assert_eq!(run.file_stats.len(), 3);
        assert_eq!(run.file_stats[2].status, "failed");
    }

    #[test]
    fn test_read_figures_are_kept() {
        let read = ReadStats {
            bytes_read: 2048,
            duration_ms: 7,
            read_error: None,
        };
        let stats = FileStats::success("a.txt".to_string(), &TextReport::default(), 9).with_read(&read);
        assert_eq!(stats.bytes_read, 2048);
        assert_eq!(stats.read_time_ms, 7);
        assert_eq!(stats.processing_time_ms, 9);

        let failed = FileStats::failed("b.txt".to_string(), "too large".to_string(), 1);
        assert_eq!(failed.bytes_read, 0);
        assert!(failed.is_failed());
    }

    #[tokio::test]
    async fn test_write_json() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("stats.json");

        let mut run = RunStats::new(1_700_000_000);
        run.record(FileStats::failed("-".to_string(), "bad input".to_string(), 0));
        run.write_json(&path).await.unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let value: serde_json::Value = serde_json::from_str(&content).unwrap();
        assert_eq!(value["run_start"], 1_700_000_000u64);
        assert_eq!(value["file_stats"][0]["error"], "bad input");
        assert!(value["file_stats"][0]["chars_processed"].is_u64());
        assert!(value["file_stats"][0]["bytes_read"].is_u64());
    }
}
