//! Burrows-Wheeler Transform for OxiBWT.
//!
//! This crate provides the pure, allocation-local algorithms of OxiBWT:
//!
//! 1. Suffix array construction by prefix doubling with counting sorts
//! 2. Forward BWT over a delimiter-terminated block
//! 3. Inverse BWT through an occurrence-table LF walk
//! 4. Delimiter selection for a whole input
//!
//! ## Example
//!
//! ```rust
//! use oxibwt_transform::{forward, inverse};
//!
//! let transformed = forward(b"banana", b'~');
//! assert_eq!(transformed, b"bnn~aaa");
//! assert_eq!(inverse(&transformed, b'~').unwrap(), b"banana");
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![forbid(unsafe_code)]

/// Forward and inverse Burrows-Wheeler Transform.
pub mod bwt;
pub mod delimiter;
mod error;
pub mod suffix_array;

pub use bwt::{forward, forward_with, inverse};
pub use delimiter::{DelimiterSelector, resolve as resolve_delimiter};
pub use error::{Result, TransformError};
pub use suffix_array::{SuffixArrayBuilder, suffix_array};
