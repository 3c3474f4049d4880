//! Transform-specific error types.

use oxibwt_core::OxiBwtError;
use thiserror::Error;

/// Errors detected while inverting a transformed block.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransformError {
    /// A transformed block always holds at least its terminator.
    #[error("transformed block is empty")]
    EmptyBlock,

    /// The terminator must occur exactly once.
    #[error("delimiter {delimiter:#04x} occurs {found} times, expected exactly once")]
    DelimiterCount {
        /// Delimiter searched for.
        delimiter: u8,
        /// Number of occurrences found.
        found: usize,
    },

    /// The LF walk returned to the terminator before visiting every row.
    #[error("LF cycle visits {visited} of {expected} bytes")]
    ShortCycle {
        /// Bytes recovered before the walk closed.
        visited: usize,
        /// Bytes the block should hold.
        expected: usize,
    },
}

/// Result type for transform operations.
pub type Result<T> = std::result::Result<T, TransformError>;

impl TransformError {
    /// Attach the index of the offending block.
    pub fn into_block_error(self, block: u64) -> OxiBwtError {
        OxiBwtError::corrupted(block, self.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_into_block_error() {
        let err = TransformError::DelimiterCount {
            delimiter: b'~',
            found: 0,
        }
        .into_block_error(7);
        let msg = err.to_string();
        assert!(msg.contains("block 7"));
        assert!(msg.contains("0x7e"));
    }
}
