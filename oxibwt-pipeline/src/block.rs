//! Indexed blocks flowing through the pipeline.

/// A slice of the input tagged with its position in the stream.
///
/// The index is assigned once by the reader and never recomputed. Ownership
/// moves from queue to worker to reorder buffer to writer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    /// Zero-based position of this block in the stream.
    pub index: u64,
    /// Block payload.
    pub data: Vec<u8>,
}

impl Block {
    /// Create a new block.
    pub fn new(index: u64, data: Vec<u8>) -> Self {
        Self { index, data }
    }

    /// Payload length in bytes.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the payload is empty.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}
