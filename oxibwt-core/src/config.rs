//! Pipeline configuration.

use crate::error::{OxiBwtError, Result};
use std::num::NonZeroUsize;

/// Default block size in bytes.
pub const DEFAULT_BLOCK_SIZE: usize = 128;

/// Minimum number of worker threads used by default.
pub const MIN_DEFAULT_WORKERS: usize = 4;

/// Read size used when scanning an input for an unused delimiter.
pub const SCAN_CHUNK_SIZE: usize = 8192;

/// How the block terminator byte is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DelimiterStrategy {
    /// Scan the whole input for the lowest byte value that never occurs.
    #[default]
    Scan,
    /// Use a caller-provided byte. The caller guarantees it does not occur
    /// in the input.
    Fixed(u8),
}

/// Configuration consumed by the block pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineConfig {
    /// Size of each untransformed block in bytes.
    pub block_size: usize,
    /// Number of transform worker threads.
    pub worker_count: usize,
    /// Maximum number of transformed blocks held out of order.
    pub reorder_capacity: usize,
    /// Delimiter selection strategy.
    pub delimiter: DelimiterStrategy,
}

impl PipelineConfig {
    /// Create a configuration with the given block size and default workers.
    pub fn new(block_size: usize) -> Self {
        Self {
            block_size,
            ..Self::default()
        }
    }

    /// Set the block size.
    pub fn with_block_size(mut self, block_size: usize) -> Self {
        self.block_size = block_size;
        self
    }

    /// Set the worker count. The reorder capacity follows it.
    pub fn with_workers(mut self, worker_count: usize) -> Self {
        self.worker_count = worker_count;
        self.reorder_capacity = worker_count.saturating_mul(2);
        self
    }

    /// Set the reorder buffer capacity explicitly.
    pub fn with_reorder_capacity(mut self, capacity: usize) -> Self {
        self.reorder_capacity = capacity;
        self
    }

    /// Set the delimiter strategy.
    pub fn with_delimiter(mut self, delimiter: DelimiterStrategy) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Size of a transformed chunk: one block plus its terminator.
    pub fn transformed_block_size(&self) -> usize {
        self.block_size + 1
    }

    /// Check every value is usable.
    pub fn validate(&self) -> Result<()> {
        if self.block_size == 0 {
            return Err(OxiBwtError::invalid_config("block size must be greater than 0"));
        }
        if self.block_size == usize::MAX {
            return Err(OxiBwtError::invalid_config(
                "block size leaves no room for the delimiter",
            ));
        }
        if self.worker_count == 0 {
            return Err(OxiBwtError::invalid_config(
                "worker count must be greater than 0",
            ));
        }
        if self.reorder_capacity == 0 {
            return Err(OxiBwtError::invalid_config(
                "reorder capacity must be greater than 0",
            ));
        }
        Ok(())
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        let worker_count = default_worker_count();
        Self {
            block_size: DEFAULT_BLOCK_SIZE,
            worker_count,
            reorder_capacity: worker_count * 2,
            delimiter: DelimiterStrategy::Scan,
        }
    }
}

/// Hardware parallelism, never less than [`MIN_DEFAULT_WORKERS`].
pub fn default_worker_count() -> usize {
    std::thread::available_parallelism()
        .map(NonZeroUsize::get)
        .unwrap_or(MIN_DEFAULT_WORKERS)
        .max(MIN_DEFAULT_WORKERS)
}
