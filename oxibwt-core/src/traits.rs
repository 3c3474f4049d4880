//! Chunked I/O traits consumed by the block pipeline.
//!
//! The pipeline never touches files directly. It pulls fixed-size chunks
//! from a [`ChunkSource`] and pushes transformed chunks into a
//! [`ChunkSink`].

use crate::error::Result;

/// A producer of fixed-size byte chunks.
pub trait ChunkSource {
    /// Whether another call to [`read_chunk`](Self::read_chunk) may yield data.
    fn has_more(&self) -> bool;

    /// Read the next chunk.
    ///
    /// Every chunk is full-sized except possibly the last one. An empty
    /// vector means the source is exhausted.
    fn read_chunk(&mut self) -> Result<Vec<u8>>;

    /// Read up to `len` bytes ahead of chunked reading.
    ///
    /// Used for stream headers. Returns fewer bytes only at end of input.
    fn read_header(&mut self, len: usize) -> Result<Vec<u8>>;
}

/// A consumer of byte chunks.
pub trait ChunkSink {
    /// Append a chunk to the output.
    fn write_chunk(&mut self, chunk: &[u8]) -> Result<()>;

    /// Flush and release the output.
    fn close(&mut self) -> Result<()>;
}

impl<S: ChunkSource + ?Sized> ChunkSource for &mut S {
    fn has_more(&self) -> bool {
        (**self).has_more()
    }

    fn read_chunk(&mut self) -> Result<Vec<u8>> {
        (**self).read_chunk()
    }

    fn read_header(&mut self, len: usize) -> Result<Vec<u8>> {
        (**self).read_header(len)
    }
}

impl<S: ChunkSink + ?Sized> ChunkSink for &mut S {
    fn write_chunk(&mut self, chunk: &[u8]) -> Result<()> {
        (**self).write_chunk(chunk)
    }

    fn close(&mut self) -> Result<()> {
        (**self).close()
    }
}
