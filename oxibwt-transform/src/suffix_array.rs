//! Suffix array construction by prefix doubling.
//!
//! Each doubling step sorts suffixes by the pair `(rank[i], rank[i + k])`
//! with two stable counting-sort passes (LSD radix order), so a step costs
//! O(n) and the whole build O(n log n). A suffix that runs past the end of
//! the buffer sorts before every suffix sharing its prefix.

/// Reusable suffix array builder.
///
/// Holds scratch buffers so repeated builds on similarly sized inputs do
/// not reallocate.
#[derive(Debug, Default, Clone)]
pub struct SuffixArrayBuilder {
    rank: Vec<usize>,
    next_rank: Vec<usize>,
    scratch: Vec<usize>,
    counts: Vec<usize>,
}

impl SuffixArrayBuilder {
    /// Create a builder with empty scratch space.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the suffix array of `data`.
    ///
    /// Returns a permutation `sa` of `0..data.len()` such that
    /// `data[sa[i]..]` is strictly increasing in `i`.
    pub fn build(&mut self, data: &[u8]) -> Vec<usize> {
        let n = data.len();
        match n {
            0 => return Vec::new(),
            1 => return vec![0],
            _ => {}
        }

        let mut sa: Vec<usize> = (0..n).collect();
        self.rank.clear();
        self.rank.extend(data.iter().map(|&b| b as usize));
        self.next_rank.clear();
        self.next_rank.resize(n, 0);
        self.scratch.clear();
        self.scratch.resize(n, 0);

        let mut max_rank = data.iter().copied().max().unwrap_or(0) as usize;
        let mut k = 1;

        while k < n {
            let rank = &self.rank;
            // Suffixes ending before i + k get the sentinel key 0.
            let second = |i: usize| if i + k < n { rank[i + k] + 1 } else { 0 };

            // Pass 1: order every position by its second key.
            counting_sort(&mut self.counts, 0..n, max_rank + 2, second, &mut self.scratch);
            // Pass 2: stable re-order by the first key.
            counting_sort(
                &mut self.counts,
                self.scratch.iter().copied(),
                max_rank + 1,
                |i| rank[i],
                &mut sa,
            );

            let next_rank = &mut self.next_rank;
            let mut current = 0;
            next_rank[sa[0]] = 0;
            for w in 1..n {
                let (prev, cur) = (sa[w - 1], sa[w]);
                if rank[prev] != rank[cur] || second(prev) != second(cur) {
                    current += 1;
                }
                next_rank[cur] = current;
            }

            std::mem::swap(&mut self.rank, &mut self.next_rank);
            max_rank = current;
            if max_rank == n - 1 {
                break;
            }
            k *= 2;
        }

        sa
    }
}

/// Stable counting sort of `items` by `key`, whose values lie in `0..range`.
fn counting_sort<I, K>(
    counts: &mut Vec<usize>,
    items: I,
    range: usize,
    key: K,
    out: &mut [usize],
) where
    I: Iterator<Item = usize> + Clone,
    K: Fn(usize) -> usize,
{
    counts.clear();
    counts.resize(range, 0);
    for i in items.clone() {
        counts[key(i)] += 1;
    }

    let mut total = 0;
    for count in counts.iter_mut() {
        let c = *count;
        *count = total;
        total += c;
    }

    for i in items {
        let slot = &mut counts[key(i)];
        out[*slot] = i;
        *slot += 1;
    }
}

/// Build the suffix array of `data` with a fresh builder.
pub fn suffix_array(data: &[u8]) -> Vec<usize> {
    SuffixArrayBuilder::new().build(data)
}
