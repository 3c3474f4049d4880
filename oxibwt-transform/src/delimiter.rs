//! Block terminator selection.
//!
//! A delimiter is chosen once per input, never per block. With
//! [`DelimiterStrategy::Scan`] the whole input is streamed once and the
//! lowest byte value that never occurs is used.

use oxibwt_core::config::{DelimiterStrategy, SCAN_CHUNK_SIZE};
use oxibwt_core::error::{OxiBwtError, Result};
use std::io::{ErrorKind, Read};

/// Records which byte values occur in an input.
#[derive(Debug, Clone)]
pub struct DelimiterSelector {
    seen: [bool; 256],
    distinct: usize,
}

impl DelimiterSelector {
    /// Create a selector that has seen nothing.
    pub fn new() -> Self {
        Self {
            seen: [false; 256],
            distinct: 0,
        }
    }

    /// Record every byte in `chunk`.
    pub fn update(&mut self, chunk: &[u8]) {
        if self.distinct == 256 {
            return;
        }
        for &byte in chunk {
            let slot = &mut self.seen[byte as usize];
            if !*slot {
                *slot = true;
                self.distinct += 1;
            }
        }
    }

    /// Number of distinct byte values seen so far.
    pub fn distinct(&self) -> usize {
        self.distinct
    }

    /// Whether `byte` has been seen.
    pub fn contains(&self, byte: u8) -> bool {
        self.seen[byte as usize]
    }

    /// Lowest byte value not seen, if any.
    pub fn select(&self) -> Option<u8> {
        (0..=u8::MAX).find(|&b| !self.seen[b as usize])
    }

    /// Stream `reader` to its end and select a delimiter.
    pub fn scan<R: Read>(mut reader: R) -> Result<u8> {
        let mut selector = Self::new();
        let mut buf = vec![0u8; SCAN_CHUNK_SIZE];
        let mut total = 0u64;
        loop {
            let n = match reader.read(&mut buf) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            };
            total += n as u64;
            selector.update(&buf[..n]);
        }

        let delimiter = selector.select().ok_or(OxiBwtError::NoUsableDelimiter)?;
        log::debug!(
            "scanned {} bytes, {} distinct values, delimiter {:#04x}",
            total,
            selector.distinct(),
            delimiter
        );
        Ok(delimiter)
    }

    /// Select a delimiter for an in-memory input.
    pub fn scan_bytes(data: &[u8]) -> Result<u8> {
        let mut selector = Self::new();
        selector.update(data);
        selector.select().ok_or(OxiBwtError::NoUsableDelimiter)
    }
}

impl Default for DelimiterSelector {
    fn default() -> Self {
        Self::new()
    }
}

/// Resolve `strategy` against `reader`.
///
/// A fixed delimiter is returned without reading anything.
pub fn resolve<R: Read>(strategy: DelimiterStrategy, reader: R) -> Result<u8> {
    match strategy {
        DelimiterStrategy::Fixed(delimiter) => Ok(delimiter),
        DelimiterStrategy::Scan => DelimiterSelector::scan(reader),
    }
}
