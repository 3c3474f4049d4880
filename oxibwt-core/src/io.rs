//! [`ChunkSource`]/[`ChunkSink`] adapters over `std::io`.
//!
//! # Example
//!
//! ```rust
//! use oxibwt_core::io::{ChunkReader, ChunkWriter};
//! use oxibwt_core::traits::{ChunkSink, ChunkSource};
//!
//! let mut reader = ChunkReader::new(&b"abcdefg"[..], 3);
//! let mut writer = ChunkWriter::new(Vec::new());
//! while reader.has_more() {
//!     let chunk = reader.read_chunk().unwrap();
//!     if chunk.is_empty() {
//!         break;
//!     }
//!     writer.write_chunk(&chunk).unwrap();
//! }
//! assert_eq!(writer.into_inner().unwrap(), b"abcdefg");
//! ```

use crate::error::{OxiBwtError, Result};
use crate::traits::{ChunkSink, ChunkSource};
use std::fs::File;
use std::io::{self, BufWriter, ErrorKind, Read, Write};
use std::path::Path;

/// Reads fixed-size chunks from any [`Read`].
#[derive(Debug)]
pub struct ChunkReader<R> {
    inner: R,
    chunk_size: usize,
    eof: bool,
    bytes_read: u64,
}

impl<R: Read> ChunkReader<R> {
    /// Create a reader yielding chunks of `chunk_size` bytes.
    ///
    /// # Panics
    ///
    /// Panics if `chunk_size` is zero.
    pub fn new(inner: R, chunk_size: usize) -> Self {
        assert!(chunk_size > 0, "Chunk size must be greater than 0");
        Self {
            inner,
            chunk_size,
            eof: false,
            bytes_read: 0,
        }
    }

    /// Total bytes consumed so far.
    pub fn bytes_read(&self) -> u64 {
        self.bytes_read
    }

    /// Unwrap the underlying reader.
    pub fn into_inner(self) -> R {
        self.inner
    }

    /// Fill `buf` as far as possible, stopping only at end of input.
    fn fill(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let mut filled = 0;
        while filled < buf.len() {
            match self.inner.read(&mut buf[filled..]) {
                Ok(0) => {
                    self.eof = true;
                    break;
                }
                Ok(n) => filled += n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }
        self.bytes_read += filled as u64;
        Ok(filled)
    }
}

impl<R: Read> ChunkSource for ChunkReader<R> {
    fn has_more(&self) -> bool {
        !self.eof
    }

    fn read_chunk(&mut self) -> Result<Vec<u8>> {
        if self.eof {
            return Ok(Vec::new());
        }
        let mut chunk = vec![0u8; self.chunk_size];
        let filled = self.fill(&mut chunk)?;
        chunk.truncate(filled);
        Ok(chunk)
    }

    fn read_header(&mut self, len: usize) -> Result<Vec<u8>> {
        if self.eof {
            return Ok(Vec::new());
        }
        let mut header = vec![0u8; len];
        let filled = self.fill(&mut header)?;
        header.truncate(filled);
        Ok(header)
    }
}

/// Writes chunks to any [`Write`].
#[derive(Debug)]
pub struct ChunkWriter<W: Write> {
    inner: W,
    bytes_written: u64,
    closed: bool,
}

impl<W: Write> ChunkWriter<W> {
    /// Create a new chunk writer.
    pub fn new(inner: W) -> Self {
        Self {
            inner,
            bytes_written: 0,
            closed: false,
        }
    }

    /// Total bytes written so far.
    pub fn bytes_written(&self) -> u64 {
        self.bytes_written
    }

    /// Flush and unwrap the underlying writer.
    pub fn into_inner(mut self) -> Result<W> {
        self.inner.flush()?;
        Ok(self.inner)
    }
}

impl<W: Write> ChunkSink for ChunkWriter<W> {
    fn write_chunk(&mut self, chunk: &[u8]) -> Result<()> {
        if self.closed {
            return Err(io::Error::new(ErrorKind::BrokenPipe, "chunk writer is closed").into());
        }
        self.inner.write_all(chunk)?;
        self.bytes_written += chunk.len() as u64;
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        if !self.closed {
            self.inner.flush()?;
            self.closed = true;
        }
        Ok(())
    }
}

/// Open `input` for chunked reading and create `output` for writing.
pub fn open(
    input: &Path,
    output: &Path,
    chunk_size: usize,
) -> Result<(ChunkReader<File>, ChunkWriter<BufWriter<File>>)> {
    let reader = File::open(input).map_err(|e| OxiBwtError::open(input, e))?;
    let writer = File::create(output).map_err(|e| OxiBwtError::open(output, e))?;
    log::debug!(
        "opened {} -> {} with {} byte chunks",
        input.display(),
        output.display(),
        chunk_size
    );
    Ok((
        ChunkReader::new(reader, chunk_size),
        ChunkWriter::new(BufWriter::new(writer)),
    ))
}
