use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use futures::stream::{self, StreamExt};
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Instant, SystemTime, UNIX_EPOCH};
use tracing::{info, warn, Level};

use acrodef::{
    process_text, Acronym, AsyncTextReader, Extractor, ExtractorConfig, FileStats, InputSource,
    Language, ReaderConfig, RunStats, Tokenizer, TokenizerConfig,
};

#[derive(Parser, Debug)]
#[command(name = "acrodef")]
#[command(about = "Extract acronym definitions such as \"World Health Organization (WHO)\" from text")]
#[command(version)]
struct Args {
    /// Input files; standard input is read when none are given
    files: Vec<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Tsv)]
    format: OutputFormat,

    /// JSON file with extractor settings; missing fields take their defaults
    #[arg(long)]
    config: Option<PathBuf>,

    /// Inputs larger than this many bytes are reported as errors
    #[arg(long, default_value_t = 50 * 1024 * 1024)]
    max_file_size: u64,

    /// Sentences longer than this many tokens are cut into chunks
    #[arg(long, default_value_t = 1000)]
    max_sentence_tokens: usize,

    /// Language of the input, selects the sentence splitter's abbreviations
    #[arg(short, long, value_enum, default_value_t = Language::En)]
    lang: Language,

    /// List the supported languages and exit
    #[arg(short = 'L', long)]
    list: bool,

    /// Abort on first error
    #[arg(long)]
    fail_fast: bool,

    /// Suppress console progress bars
    #[arg(long)]
    no_progress: bool,

    /// Stats output file path
    #[arg(long)]
    stats_out: Option<PathBuf>,

    /// Raise the log level (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// acronym<TAB>expansion
    Tsv,
    /// One JSON object per definition
    Json,
}

/// One JSON output line
#[derive(Serialize)]
struct OutputRecord<'a> {
    source: &'a str,
    #[serde(flatten)]
    acronym: &'a Acronym,
}

/// What a worker hands back for one input
struct SourceOutcome {
    acronyms: Vec<Acronym>,
    stats: FileStats,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let level = match args.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    // stdout carries results, so logs go to stderr
    tracing_subscriber::fmt()
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_max_level(level)
        .json()
        .init();

    info!(?args, "Parsed CLI arguments");

    if args.list {
        let mut out = std::io::stdout().lock();
        for lang in Language::ALL {
            writeln!(out, "{}", lang)?;
        }
        return Ok(());
    }

    let extractor_config = match &args.config {
        Some(path) => ExtractorConfig::from_json_file(path)?,
        None => ExtractorConfig::default(),
    };
    let tokenizer_config = TokenizerConfig {
        max_sentence_tokens: args.max_sentence_tokens,
        lang: args.lang,
    };
    // surface configuration errors once, before any worker starts
    extractor_config.validate()?;
    Tokenizer::new(tokenizer_config.clone())?;

    let sources: Vec<InputSource> = if args.files.is_empty() {
        vec![InputSource::Stdin]
    } else {
        args.files.iter().cloned().map(InputSource::File).collect()
    };

    let reader = Arc::new(AsyncTextReader::new(ReaderConfig {
        fail_fast: args.fail_fast,
        max_file_size: args.max_file_size,
        ..Default::default()
    }));

    let progress = if args.no_progress {
        ProgressBar::hidden()
    } else {
        let bar = ProgressBar::new(sources.len() as u64);
        bar.set_style(
            ProgressStyle::with_template("{spinner} [{elapsed_precise}] {bar:40} {pos}/{len} {msg}")
                .context("invalid progress bar template")?,
        );
        bar
    };

    let run_start = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    let mut run_stats = RunStats::new(run_start);
    let start_time = Instant::now();

    info!("Processing {} inputs", sources.len());

    // WHY: buffered keeps results in input order while up to num_cpus inputs are in flight
    let mut outcomes = stream::iter(sources.into_iter().map(|source| {
        let reader = Arc::clone(&reader);
        let tokenizer_config = tokenizer_config.clone();
        let extractor_config = extractor_config.clone();
        async move { process_source(&reader, source, tokenizer_config, extractor_config).await }
    }))
    .buffered(num_cpus::get());

    let stdout = std::io::stdout();
    let mut out = BufWriter::new(stdout.lock());

    while let Some(outcome) = outcomes.next().await {
        let outcome = match outcome {
            Ok(outcome) => outcome,
            Err(e) => {
                progress.abandon();
                out.flush()?;
                return Err(e);
            }
        };

        progress.set_message(outcome.stats.path.clone());
        progress.inc(1);

        progress.suspend(|| write_definitions(&mut out, args.format, &outcome.stats.path, &outcome.acronyms))?;
        run_stats.record(outcome.stats);
    }

    out.flush()?;
    progress.finish_and_clear();

    run_stats.total_processing_time_ms = start_time.elapsed().as_millis() as u64;
    info!(
        "Processing completed: {} inputs succeeded, {} failed, {} definitions",
        run_stats.files_processed, run_stats.files_failed, run_stats.total_acronyms
    );

    if let Some(ref path) = args.stats_out {
        run_stats.write_json(path).await?;
        info!("Wrote run statistics to {}", path.display());
    }

    Ok(())
}

/// Read one input and extract its definitions on a blocking worker.
///
/// Errors are returned only under `--fail-fast`; otherwise they end up in the stats.
async fn process_source(
    reader: &AsyncTextReader,
    source: InputSource,
    tokenizer_config: TokenizerConfig,
    extractor_config: ExtractorConfig,
) -> Result<SourceOutcome> {
    let start_time = Instant::now();
    let name = source.to_string();
    let fail_fast = reader.config().fail_fast;

    // the reader has already logged any failure
    let (text, read_stats) = reader.read_text(&source).await?;
    if let Some(ref error) = read_stats.read_error {
        let elapsed_ms = start_time.elapsed().as_millis() as u64;
        return Ok(SourceOutcome {
            acronyms: Vec::new(),
            stats: FileStats::failed(name, error.clone(), elapsed_ms).with_read(&read_stats),
        });
    }

    // WHY: each worker owns its tokenizer and extractor; neither is shared across threads
    let worker = tokio::task::spawn_blocking(move || -> Result<_> {
        let tokenizer = Tokenizer::new(tokenizer_config)?;
        let mut extractor = Extractor::new(extractor_config)?;
        Ok(process_text(&tokenizer, &mut extractor, &text))
    })
    .await
    .context("extraction worker panicked")
    .and_then(|result| result);

    let elapsed_ms = start_time.elapsed().as_millis() as u64;
    match worker {
        Ok(report) => {
            let stats = FileStats::success(name, &report, elapsed_ms).with_read(&read_stats);
            Ok(SourceOutcome {
                acronyms: report.acronyms,
                stats,
            })
        }
        Err(e) if !fail_fast => {
            warn!("Failed to process {}: {:#}", name, e);
            Ok(SourceOutcome {
                acronyms: Vec::new(),
                stats: FileStats::failed(name, format!("{e:#}"), elapsed_ms).with_read(&read_stats),
            })
        }
        Err(e) => Err(e.context(format!("failed to process {name}"))),
    }
}

fn write_definitions<W: Write>(
    out: &mut W,
    format: OutputFormat,
    source: &str,
    acronyms: &[Acronym],
) -> Result<()> {
    for acronym in acronyms {
        match format {
            OutputFormat::Tsv => writeln!(out, "{}\t{}", acronym.acronym, acronym.expansion)?,
            OutputFormat::Json => {
                serde_json::to_writer(&mut *out, &OutputRecord { source, acronym })?;
                writeln!(out)?;
            }
        }
    }
    Ok(())
}
