//! # OxiBWT Core
//!
//! Core components shared by the OxiBWT crates:
//!
//! - [`error`]: Error types
//! - [`config`]: Pipeline configuration and delimiter strategy
//! - [`traits`]: Chunked I/O traits consumed by the pipeline
//! - [`io`]: `std::io` adapters for those traits
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │ CLI                                                     │
//! │     oxibwt forward / inverse / verify / info            │
//! ├─────────────────────────────────────────────────────────┤
//! │ Pipeline                                                │
//! │     BlockingQueue, ReorderBuffer, orchestrator          │
//! ├─────────────────────────────────────────────────────────┤
//! │ Transform                                               │
//! │     Suffix array, forward/inverse BWT, delimiter scan   │
//! ├─────────────────────────────────────────────────────────┤
//! │ Core (this crate)                                       │
//! │     Errors, configuration, chunked I/O                  │
//! └─────────────────────────────────────────────────────────┘
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod error;
pub mod io;
pub mod traits;

// Re-exports for convenience
pub use config::{DEFAULT_BLOCK_SIZE, DelimiterStrategy, PipelineConfig, SCAN_CHUNK_SIZE};
pub use error::{OxiBwtError, Result};
pub use io::{ChunkReader, ChunkWriter};
pub use traits::{ChunkSink, ChunkSource};
