//! Order-preserving multi-threaded block pipeline for OxiBWT.
//!
//! The pipeline splits an input into fixed-size blocks, transforms them on a
//! pool of worker threads, and writes the results strictly in input order.
//!
//! - [`BlockingQueue`]: unbounded FIFO between the reader and the workers
//! - [`ReorderBuffer`]: bounded window restoring index order for the writer
//! - [`Pipeline`]: wires reader, workers, and writer together
//!
//! ## Example
//!
//! ```rust
//! use oxibwt_core::PipelineConfig;
//! use oxibwt_pipeline::{Pipeline, inverse_bytes};
//!
//! let config = PipelineConfig::new(4).with_workers(2);
//! let pipeline = Pipeline::new(config).unwrap();
//!
//! let (stream, stats) = pipeline.forward_to_vec(b"hello, pipeline").unwrap();
//! assert_eq!(stats.blocks, 4);
//! assert_eq!(inverse_bytes(&stream, &config).unwrap(), b"hello, pipeline");
//! ```
//!
//! ## Features
//!
//! - `parallel`: adds [`inverse_bytes_parallel`], a rayon-based in-memory
//!   inverse.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![forbid(unsafe_code)]

mod block;
mod orchestrator;
pub mod queue;
pub mod reorder;
mod stream;

pub use block::Block;
pub use orchestrator::{Pipeline, PipelineStats};
pub use queue::BlockingQueue;
pub use reorder::{PutError, ReorderBuffer};
#[cfg(feature = "parallel")]
pub use stream::inverse_bytes_parallel;
pub use stream::{HEADER_LEN, StreamInfo, forward_bytes, inverse_bytes, split_header};
