//! Utility functions for the CLI.

use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use oxibwt_core::{ChunkSink, DEFAULT_BLOCK_SIZE, DelimiterStrategy, PipelineConfig};
use oxibwt_pipeline::{HEADER_LEN, PipelineStats};

/// Pipeline flags shared by every transforming subcommand.
#[derive(Debug, Clone, Args)]
pub struct PipelineArgs {
    /// Block size in bytes (must match between forward and inverse)
    #[arg(short, long, default_value_t = DEFAULT_BLOCK_SIZE)]
    pub block_size: usize,

    /// Number of worker threads (default: available cores, at least 4)
    #[arg(short = 'j', long)]
    pub workers: Option<usize>,

    /// Show progress bar
    #[arg(short = 'P', long)]
    pub progress: bool,
}

impl PipelineArgs {
    /// Build the pipeline configuration these flags describe.
    pub fn config(&self) -> PipelineConfig {
        let config = PipelineConfig::new(self.block_size);
        match self.workers {
            Some(workers) => config.with_workers(workers),
            None => config,
        }
    }
}

/// Delimiter choice for subcommands that run the forward transform. The
/// inverse reads its delimiter from the stream header instead.
#[derive(Debug, Clone, Args)]
pub struct DelimiterArgs {
    /// Use a fixed delimiter byte instead of scanning (decimal or 0x hex)
    #[arg(short, long, value_parser = parse_byte)]
    pub delimiter: Option<u8>,
}

impl DelimiterArgs {
    /// Apply the delimiter choice to `config`.
    pub fn apply(&self, config: PipelineConfig) -> PipelineConfig {
        match self.delimiter {
            Some(delimiter) => config.with_delimiter(DelimiterStrategy::Fixed(delimiter)),
            None => config,
        }
    }
}

/// Parse a byte given as decimal (`126`) or hex (`0x7e`).
pub fn parse_byte(s: &str) -> Result<u8, String> {
    let parsed = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => u8::from_str_radix(hex, 16),
        None => s.parse::<u8>(),
    };
    parsed.map_err(|_| format!("'{}' is not a byte value (0-255 or 0x00-0xff)", s))
}

/// Initialize logging. `RUST_LOG` takes precedence over `verbose`.
pub fn init_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "warn" };
    let _ = env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(default_filter),
    )
    .format_timestamp(None)
    .try_init();
}

/// Create a progress bar with standard styling.
pub fn create_progress_bar(len: u64, enable: bool) -> ProgressBar {
    if !enable {
        return ProgressBar::hidden();
    }

    let pb = ProgressBar::new(len);
    let style = ProgressStyle::default_bar()
        .template("[{elapsed_precise}] [{bar:40.cyan/blue}] {bytes}/{total_bytes} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▓▒░ ");
    pb.set_style(style);
    pb
}

/// Sink adapter advancing a progress bar by every chunk written.
pub struct ProgressSink<K> {
    inner: K,
    bar: ProgressBar,
}

impl<K: ChunkSink> ProgressSink<K> {
    pub fn new(inner: K, bar: ProgressBar) -> Self {
        Self { inner, bar }
    }
}

impl<K: ChunkSink> ChunkSink for ProgressSink<K> {
    fn write_chunk(&mut self, chunk: &[u8]) -> oxibwt_core::Result<()> {
        self.inner.write_chunk(chunk)?;
        self.bar.inc(chunk.len() as u64);
        Ok(())
    }

    fn close(&mut self) -> oxibwt_core::Result<()> {
        self.inner.close()?;
        self.bar.finish_and_clear();
        Ok(())
    }
}

/// Size of the forward output for an input of `len` bytes.
pub fn forward_output_len(len: u64, block_size: usize) -> u64 {
    HEADER_LEN as u64 + len + len.div_ceil(block_size as u64)
}

/// Size of the inverse output for a stream of `len` bytes.
pub fn inverse_output_len(len: u64, block_size: usize) -> u64 {
    let payload = len.saturating_sub(HEADER_LEN as u64);
    payload - payload.div_ceil(block_size as u64 + 1)
}

/// Print a one-line summary of a pipeline run.
pub fn print_stats(action: &str, stats: &PipelineStats) {
    let delimiter = stats
        .delimiter
        .map(|d| format!("{:#04x}", d))
        .unwrap_or_else(|| "-".to_string());
    println!(
        "{}: {} blocks, {} -> {} bytes, delimiter {}, {} workers",
        action, stats.blocks, stats.bytes_in, stats.bytes_out, delimiter, stats.workers
    );
}
