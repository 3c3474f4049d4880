//! Delimiter-terminated Burrows-Wheeler Transform.
//!
//! The forward transform appends a unique delimiter to the block, sorts its
//! suffixes with [`SuffixArrayBuilder`], and emits the byte preceding each
//! sorted suffix. Because the delimiter is unique no origin pointer is
//! needed: the inverse locates the delimiter and walks the LF mapping
//! backwards through the original block.

use crate::error::{Result, TransformError};
use crate::suffix_array::SuffixArrayBuilder;

/// Perform the forward transform of `block` terminated by `delimiter`.
///
/// The output is one byte longer than `block`. `delimiter` must not occur
/// in `block`, otherwise the result cannot be inverted.
pub fn forward(block: &[u8], delimiter: u8) -> Vec<u8> {
    forward_with(&mut SuffixArrayBuilder::new(), block, delimiter)
}

/// Forward transform reusing the scratch space of `builder`.
pub fn forward_with(builder: &mut SuffixArrayBuilder, block: &[u8], delimiter: u8) -> Vec<u8> {
    let mut s = Vec::with_capacity(block.len() + 1);
    s.extend_from_slice(block);
    s.push(delimiter);
    let n = s.len();

    let sa = builder.build(&s);
    sa.iter()
        .map(|&i| if i == 0 { s[n - 1] } else { s[i - 1] })
        .collect()
}

/// Occurrence tables for the LF mapping.
struct OccurrenceTables {
    /// `occ[i]`: occurrences of `transformed[i]` strictly before `i`.
    occ: Vec<usize>,
    /// `first[c]`: number of bytes in the block smaller than `c`.
    first: [usize; 256],
}

impl OccurrenceTables {
    fn build(transformed: &[u8]) -> Self {
        let mut totals = [0usize; 256];
        let mut occ = Vec::with_capacity(transformed.len());
        for &byte in transformed {
            occ.push(totals[byte as usize]);
            totals[byte as usize] += 1;
        }

        let mut first = [0usize; 256];
        let mut sum = 0;
        for (slot, &count) in first.iter_mut().zip(totals.iter()) {
            *slot = sum;
            sum += count;
        }

        Self { occ, first }
    }

    #[inline]
    fn lf(&self, transformed: &[u8], row: usize) -> usize {
        self.first[transformed[row] as usize] + self.occ[row]
    }
}

/// Invert a block produced by [`forward`] with the same `delimiter`.
///
/// Returns an error when the block is empty, when `delimiter` does not
/// occur exactly once, or when the LF walk cannot recover every byte.
pub fn inverse(transformed: &[u8], delimiter: u8) -> Result<Vec<u8>> {
    if transformed.is_empty() {
        return Err(TransformError::EmptyBlock);
    }

    let mut positions = transformed
        .iter()
        .enumerate()
        .filter(|&(_, &b)| b == delimiter)
        .map(|(i, _)| i);
    let start = match (positions.next(), positions.next()) {
        (Some(pos), None) => pos,
        (None, _) => {
            return Err(TransformError::DelimiterCount {
                delimiter,
                found: 0,
            });
        }
        (Some(_), Some(_)) => {
            return Err(TransformError::DelimiterCount {
                delimiter,
                found: 2 + positions.count(),
            });
        }
    };

    let expected = transformed.len() - 1;
    let tables = OccurrenceTables::build(transformed);

    // Each LF step moves one byte backwards through the block.
    let mut reversed = Vec::with_capacity(expected);
    let mut row = start;
    loop {
        row = tables.lf(transformed, row);
        let byte = transformed[row];
        if byte == delimiter || reversed.len() == expected {
            break;
        }
        reversed.push(byte);
    }

    if reversed.len() != expected || transformed[row] != delimiter {
        return Err(TransformError::ShortCycle {
            visited: reversed.len(),
            expected,
        });
    }

    reversed.reverse();
    Ok(reversed)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Sort every rotation of `block + delimiter` and take the last column.
    fn naive_forward(block: &[u8], delimiter: u8) -> Vec<u8> {
        let mut s = block.to_vec();
        s.push(delimiter);
        let n = s.len();
        let mut rotations: Vec<Vec<u8>> = (0..n)
            .map(|i| s[i..].iter().chain(&s[..i]).copied().collect())
            .collect();
        rotations.sort();
        rotations.iter().map(|r| r[n - 1]).collect()
    }

    #[test]
    fn test_banana() {
        assert_eq!(forward(b"banana", b'~'), b"bnn~aaa");
        assert_eq!(inverse(b"bnn~aaa", b'~').unwrap(), b"banana");
    }

    #[test]
    fn test_empty_block() {
        assert_eq!(forward(b"", b'~'), b"~");
        assert_eq!(inverse(b"~", b'~').unwrap(), b"");
    }

    #[test]
    fn test_single_byte() {
        let transformed = forward(b"a", b'$');
        assert_eq!(transformed.len(), 2);
        assert_eq!(inverse(&transformed, b'$').unwrap(), b"a");
    }

    #[test]
    fn test_roundtrip() {
        let test_cases = [
            b"hello".as_slice(),
            b"mississippi",
            b"aaaa",
            b"a!b@c#",
            b"test",
            b"the quick brown fox jumps over the lazy dog",
            b"line1\nline2\nline3",
        ];

        for data in test_cases {
            let transformed = forward(data, b'~');
            assert_eq!(transformed.len(), data.len() + 1);
            let recovered = inverse(&transformed, b'~').unwrap();
            assert_eq!(recovered, data, "Failed for: {:?}", data);
        }
    }

    #[test]
    fn test_low_and_high_delimiters() {
        let data: Vec<u8> = (1..=254).chain((1..=254).rev()).collect();
        for delimiter in [0u8, 255] {
            let transformed = forward(&data, delimiter);
            assert_eq!(inverse(&transformed, delimiter).unwrap(), data);
        }
    }

    #[test]
    fn test_matches_rotation_sort() {
        // With a unique delimiter, sorting suffixes equals sorting rotations.
        let cases: [&[u8]; 5] = [b"banana", b"abracadabra", b"aaaaab", b"zzz", b"cabbage"];
        for data in cases {
            for delimiter in [b'~', b'$', 0u8] {
                assert_eq!(
                    forward(data, delimiter),
                    naive_forward(data, delimiter),
                    "data {:?} delimiter {}",
                    data,
                    delimiter
                );
            }
        }
    }

    #[test]
    fn test_forward_with_reuses_builder() {
        let mut builder = SuffixArrayBuilder::new();
        let first = forward_with(&mut builder, b"abcabcabc", b'#');
        let second = forward_with(&mut builder, b"xyz", b'#');
        assert_eq!(first, forward(b"abcabcabc", b'#'));
        assert_eq!(second, forward(b"xyz", b'#'));
    }

    #[test]
    fn test_inverse_rejects_missing_delimiter() {
        assert_eq!(
            inverse(b"bnnaaaa", b'~'),
            Err(TransformError::DelimiterCount {
                delimiter: b'~',
                found: 0
            })
        );
    }

    #[test]
    fn test_inverse_rejects_duplicate_delimiter() {
        assert_eq!(
            inverse(b"b~n~a~a", b'~'),
            Err(TransformError::DelimiterCount {
                delimiter: b'~',
                found: 3
            })
        );
    }

    #[test]
    fn test_inverse_rejects_empty() {
        assert_eq!(inverse(b"", b'~'), Err(TransformError::EmptyBlock));
    }

    #[test]
    fn test_inverse_detects_short_cycle() {
        // The LF permutation of "a~b" pairs the delimiter row with 'b' and
        // never reaches 'a'.
        let result = inverse(b"a~b", b'~');
        assert!(matches!(result, Err(TransformError::ShortCycle { .. })));
    }
}
