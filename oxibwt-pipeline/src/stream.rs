//! Whole-stream helpers and the transformed stream layout.
//!
//! A transformed stream is a 1-byte delimiter header followed by one
//! transformed block per input block. Every block except possibly the last
//! is `block_size + 1` bytes long, so the block size is not recorded and
//! must be supplied again when inverting.

use oxibwt_core::config::PipelineConfig;
use oxibwt_core::error::{OxiBwtError, Result};
use oxibwt_transform::{SuffixArrayBuilder, forward_with, inverse};
use serde::Serialize;

/// Length of the stream header.
pub const HEADER_LEN: usize = 1;

/// Split a transformed stream into its delimiter and payload.
pub fn split_header(stream: &[u8]) -> Result<(u8, &[u8])> {
    match stream.split_first() {
        Some((&delimiter, payload)) => Ok((delimiter, payload)),
        None => Err(OxiBwtError::MissingHeader),
    }
}

/// Forward-transform `data` on the calling thread.
///
/// Produces exactly the bytes the threaded pipeline writes for the same
/// configuration.
pub fn forward_bytes(data: &[u8], config: &PipelineConfig) -> Result<Vec<u8>> {
    config.validate()?;
    let delimiter = oxibwt_transform::resolve_delimiter(config.delimiter, data)?;
    let blocks = data.len().div_ceil(config.block_size);

    let mut out = Vec::with_capacity(HEADER_LEN + data.len() + blocks);
    out.push(delimiter);
    let mut builder = SuffixArrayBuilder::new();
    for block in data.chunks(config.block_size) {
        out.extend_from_slice(&forward_with(&mut builder, block, delimiter));
    }
    Ok(out)
}

/// Invert a transformed stream on the calling thread.
pub fn inverse_bytes(stream: &[u8], config: &PipelineConfig) -> Result<Vec<u8>> {
    config.validate()?;
    let (delimiter, payload) = split_header(stream)?;

    let mut out = Vec::with_capacity(payload.len());
    for (index, block) in payload.chunks(config.transformed_block_size()).enumerate() {
        let original = inverse(block, delimiter).map_err(|e| e.into_block_error(index as u64))?;
        out.extend_from_slice(&original);
    }
    Ok(out)
}

/// Invert a transformed stream with rayon, one task per block.
///
/// The first failing block in stream order is reported.
#[cfg(feature = "parallel")]
pub fn inverse_bytes_parallel(stream: &[u8], config: &PipelineConfig) -> Result<Vec<u8>> {
    use rayon::prelude::*;

    config.validate()?;
    let (delimiter, payload) = split_header(stream)?;

    let blocks: Vec<Vec<u8>> = payload
        .par_chunks(config.transformed_block_size())
        .enumerate()
        .map(|(index, block)| {
            inverse(block, delimiter).map_err(|e| e.into_block_error(index as u64))
        })
        .collect::<Result<_>>()?;

    Ok(blocks.concat())
}

/// Layout of a transformed stream, derived from its header and length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StreamInfo {
    /// Block terminator recorded in the header.
    pub delimiter: u8,
    /// Block size the stream is assumed to use.
    pub block_size: usize,
    /// Number of transformed blocks.
    pub blocks: u64,
    /// Total stream length including the header.
    pub stream_len: u64,
    /// Length of the data the stream inverts to.
    pub original_len: u64,
}

impl StreamInfo {
    /// Describe a stream of `stream_len` bytes whose header is `delimiter`.
    pub fn new(delimiter: u8, stream_len: u64, block_size: usize) -> Result<Self> {
        if stream_len < HEADER_LEN as u64 {
            return Err(OxiBwtError::MissingHeader);
        }
        if block_size == 0 {
            return Err(OxiBwtError::invalid_config("block size must be greater than 0"));
        }
        let payload = stream_len - HEADER_LEN as u64;
        let blocks = payload.div_ceil(block_size as u64 + 1);
        Ok(Self {
            delimiter,
            block_size,
            blocks,
            stream_len,
            original_len: payload - blocks,
        })
    }

    /// Describe an in-memory stream.
    pub fn from_stream(stream: &[u8], block_size: usize) -> Result<Self> {
        let (delimiter, _) = split_header(stream)?;
        Self::new(delimiter, stream.len() as u64, block_size)
    }
}
