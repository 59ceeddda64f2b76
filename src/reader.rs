use anyhow::{anyhow, Result};
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tokio::fs::File;
use tokio::io::{AsyncRead, AsyncReadExt, BufReader};
use tracing::{debug, info, warn};

/// Configuration for input reading behavior
#[derive(Debug, Clone)]
pub struct ReaderConfig {
    /// Whether to fail fast on first error or report it and continue
    pub fail_fast: bool,
    /// Buffer size for async reading (default: 8KB)
    pub buffer_size: usize,
    /// Inputs larger than this many bytes are rejected (default: 50 MiB)
    pub max_file_size: u64,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            fail_fast: false,
            buffer_size: 8192,
            max_file_size: 50 * 1024 * 1024,
        }
    }
}

/// Where text comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputSource {
    File(PathBuf),
    Stdin,
}

impl fmt::Display for InputSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputSource::File(path) => write!(f, "{}", path.display()),
            InputSource::Stdin => f.write_str("-"),
        }
    }
}

/// Statistics for one read
#[derive(Debug, Clone, Default)]
pub struct ReadStats {
    pub bytes_read: u64,
    pub duration_ms: u64,
    pub read_error: Option<String>,
}

/// Async reader that loads whole inputs as UTF-8 text
pub struct AsyncTextReader {
    config: ReaderConfig,
}

impl AsyncTextReader {
    pub fn new(config: ReaderConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ReaderConfig {
        &self.config
    }

    /// Read an input completely.
    ///
    /// Without `fail_fast` a failed read yields empty text and the error in
    /// [`ReadStats::read_error`]; with it the error is returned.
    pub async fn read_text(&self, source: &InputSource) -> Result<(String, ReadStats)> {
        match source {
            InputSource::File(path) => self.read_file(path).await,
            InputSource::Stdin => {
                let start_time = Instant::now();
                debug!("Starting async read of standard input");
                let reader = BufReader::with_capacity(self.config.buffer_size, tokio::io::stdin());
                self.read_stream(source, reader, start_time).await
            }
        }
    }

    /// Read a file completely, see [`AsyncTextReader::read_text`]
    pub async fn read_file(&self, path: &Path) -> Result<(String, ReadStats)> {
        let source = InputSource::File(path.to_path_buf());
        let start_time = Instant::now();
        debug!("Starting async read of file: {}", path.display());

        let file = match File::open(path).await {
            Ok(file) => file,
            Err(e) => {
                let error_msg = format!("Failed to open file {}: {}", path.display(), e);
                return self.failure(&source, start_time, 0, error_msg);
            }
        };

        // reject oversized regular files before reading any of them
        if let Ok(metadata) = file.metadata().await {
            if metadata.len() > self.config.max_file_size {
                let error_msg = format!(
                    "{}: input file too large (limit is {} bytes)",
                    path.display(),
                    self.config.max_file_size
                );
                return self.failure(&source, start_time, 0, error_msg);
            }
        }

        let reader = BufReader::with_capacity(self.config.buffer_size, file);
        self.read_stream(&source, reader, start_time).await
    }

    async fn read_stream<R>(
        &self,
        source: &InputSource,
        reader: R,
        start_time: Instant,
    ) -> Result<(String, ReadStats)>
    where
        R: AsyncRead + Unpin,
    {
        let limit = self.config.max_file_size;
        let mut bytes = Vec::new();

        // one byte past the limit tells an oversized stream from one that fits exactly
        if let Err(e) = reader.take(limit.saturating_add(1)).read_to_end(&mut bytes).await {
            let error_msg = format!("Failed to read {}: {}", source, e);
            return self.failure(source, start_time, bytes.len() as u64, error_msg);
        }
        let byte_count = bytes.len() as u64;

        if byte_count > limit {
            let error_msg = format!("{}: input file too large (limit is {} bytes)", source, limit);
            return self.failure(source, start_time, byte_count, error_msg);
        }

        let text = match String::from_utf8(bytes) {
            Ok(text) => text,
            Err(e) => {
                let error_msg = format!(
                    "UTF-8 decoding error in {} at byte {}",
                    source,
                    e.utf8_error().valid_up_to()
                );
                return self.failure(source, start_time, byte_count, error_msg);
            }
        };

        let stats = ReadStats {
            bytes_read: byte_count,
            duration_ms: start_time.elapsed().as_millis() as u64,
            read_error: None,
        };

        info!(
            "Successfully read {}: {} bytes in {}ms",
            source, byte_count, stats.duration_ms
        );
        Ok((text, stats))
    }

    fn failure(
        &self,
        source: &InputSource,
        start_time: Instant,
        bytes_read: u64,
        error_msg: String,
    ) -> Result<(String, ReadStats)> {
        warn!("{}", error_msg);

        if self.config.fail_fast {
            return Err(anyhow!(error_msg));
        }

        let stats = ReadStats {
            bytes_read,
            duration_ms: start_time.elapsed().as_millis() as u64,
            read_error: Some(error_msg),
        };
        Ok((String::new(), stats))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use tokio::fs;

    async fn create_test_file(dir: &Path, name: &str, content: &[u8]) -> Result<PathBuf> {
        let file_path = dir.join(name);
        fs::write(&file_path, content).await?;
        Ok(file_path)
    }

    #[tokio::test]
    async fn test_read_valid_file() {
        let temp_dir = TempDir::new().unwrap();
        let reader = AsyncTextReader::new(ReaderConfig::default());

        let content = "World Health Organization (WHO).\nSecond line.";
        let file_path = create_test_file(temp_dir.path(), "test.txt", content.as_bytes()).await.unwrap();

        let (text, stats) = reader.read_file(&file_path).await.unwrap();

        assert_eq!(text, content);
        assert_eq!(stats.bytes_read, content.len() as u64);
        assert!(stats.read_error.is_none());
    }

    #[tokio::test]
    async fn test_read_nonexistent_file() {
        let temp_dir = TempDir::new().unwrap();
        let reader = AsyncTextReader::new(ReaderConfig { fail_fast: false, ..Default::default() });

        let source = InputSource::File(temp_dir.path().join("nonexistent.txt"));
        let (text, stats) = reader.read_text(&source).await.unwrap();

        assert!(text.is_empty());
        assert!(stats.read_error.is_some());
    }

    #[tokio::test]
    async fn test_read_nonexistent_file_fail_fast() {
        let temp_dir = TempDir::new().unwrap();
        let reader = AsyncTextReader::new(ReaderConfig { fail_fast: true, ..Default::default() });

        let result = reader.read_file(&temp_dir.path().join("nonexistent.txt")).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_invalid_utf8_reported() {
        let temp_dir = TempDir::new().unwrap();
        let reader = AsyncTextReader::new(ReaderConfig::default());

        let file_path = create_test_file(temp_dir.path(), "latin1.txt", b"caf\xe9 (CF)").await.unwrap();
        let (text, stats) = reader.read_file(&file_path).await.unwrap();

        assert!(text.is_empty());
        let error = stats.read_error.unwrap();
        assert!(error.contains("UTF-8"), "unexpected error: {error}");
        assert!(error.contains("at byte 3"), "unexpected error: {error}");
    }

    #[tokio::test]
    async fn test_size_limit() {
        let temp_dir = TempDir::new().unwrap();
        let reader = AsyncTextReader::new(ReaderConfig { max_file_size: 16, ..Default::default() });

        let exact = create_test_file(temp_dir.path(), "exact.txt", &[b'a'; 16]).await.unwrap();
        let (text, stats) = reader.read_file(&exact).await.unwrap();
        assert_eq!(text.len(), 16);
        assert!(stats.read_error.is_none());

        let large = create_test_file(temp_dir.path(), "large.txt", &[b'a'; 17]).await.unwrap();
        let (text, stats) = reader.read_file(&large).await.unwrap();
        assert!(text.is_empty());
        assert!(stats.read_error.unwrap().contains("input file too large (limit is 16 bytes)"));
    }

    #[tokio::test]
    async fn test_custom_buffer_size() {
        let temp_dir = TempDir::new().unwrap();
        let reader = AsyncTextReader::new(ReaderConfig { buffer_size: 1024, ..Default::default() });

        // file larger than the buffer, with multibyte characters straddling buffer edges
        let content = "é".repeat(2048);
        let file_path = create_test_file(temp_dir.path(), "large.txt", content.as_bytes()).await.unwrap();

        let (text, stats) = reader.read_file(&file_path).await.unwrap();
        assert_eq!(text, content);
        assert_eq!(stats.bytes_read, 4096);
    }

    #[test]
    fn test_source_display() {
        assert_eq!(InputSource::Stdin.to_string(), "-");
        assert_eq!(InputSource::File(PathBuf::from("a/b.txt")).to_string(), "a/b.txt");
    }
}
