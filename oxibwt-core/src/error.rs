//! Error types for OxiBWT operations.
//!
//! The taxonomy separates input-dependent precondition failures (no usable
//! delimiter) from I/O failures on the wrapped streams, and both from
//! corruption detected while inverting a transformed stream.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// The main error type for OxiBWT operations.
#[derive(Debug, Error)]
pub enum OxiBwtError {
    /// I/O error from underlying reader/writer.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// A file could not be opened or created.
    #[error("Could not open {}: {source}", path.display())]
    Open {
        /// Path that failed to open.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// Every byte value occurs in the input, so no block terminator exists.
    #[error("No usable delimiter: all 256 byte values occur in the input")]
    NoUsableDelimiter,

    /// A transformed block is malformed.
    #[error("Corrupted block {block}: {message}")]
    CorruptedBlock {
        /// Index of the offending block.
        block: u64,
        /// Description of the corruption.
        message: String,
    },

    /// Transformed stream is missing its 1-byte delimiter header.
    #[error("Missing stream header: expected 1 delimiter byte")]
    MissingHeader,

    /// Invalid configuration value.
    #[error("Invalid configuration: {message}")]
    InvalidConfig {
        /// Description of the configuration error.
        message: String,
    },

    /// A pipeline thread panicked.
    #[error("Pipeline {role} thread panicked")]
    WorkerPanicked {
        /// Which stage the thread belonged to.
        role: &'static str,
    },
}

/// Result type alias for OxiBWT operations.
pub type Result<T> = std::result::Result<T, OxiBwtError>;

impl OxiBwtError {
    /// Create an open error for `path`.
    pub fn open(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Open {
            path: path.into(),
            source,
        }
    }

    /// Create a corrupted block error.
    pub fn corrupted(block: u64, message: impl Into<String>) -> Self {
        Self::CorruptedBlock {
            block,
            message: message.into(),
        }
    }

    /// Create an invalid configuration error.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    /// Create a worker panic error.
    pub fn worker_panicked(role: &'static str) -> Self {
        Self::WorkerPanicked { role }
    }

    /// Whether this error stems from the underlying streams rather than the data.
    pub fn is_io(&self) -> bool {
        matches!(self, Self::Io(_) | Self::Open { .. })
    }
}
