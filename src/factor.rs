//! Greedy LZ factorization over a suffix array.
//!
//! At every position the parser takes the longest substring that also starts
//! somewhere earlier, and among earlier starts of that length the leftmost.
//! Sources may overlap the span being produced, so a run of one byte becomes a
//! literal followed by a single reference.
//!
//! The longest earlier match comes from the nearest ranks on either side whose
//! SA entry is a smaller position. Range minima over the LCP array then bound
//! the block of ranks sharing that length, and a range minimum over SA picks
//! the leftmost start within it.

use std::fmt;

use segment_tree::ops::Min;
use segment_tree::SegmentPoint;
use tracing::debug;

use crate::error::{Error, Result};
use crate::lcp;
use crate::sais::sais;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Factor {
    /// One byte with no earlier occurrence.
    Literal(u8),
    /// Copy `length` bytes starting at absolute position `offset`.
    Reference { offset: usize, length: usize },
}

impl Factor {
    /// Number of input bytes this factor covers.
    pub fn len(&self) -> usize {
        match *self {
            Factor::Literal(_) => 1,
            Factor::Reference { length, .. } => length,
        }
    }

    pub fn is_reference(&self) -> bool {
        matches!(self, Factor::Reference { .. })
    }
}

impl fmt::Display for Factor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Factor::Literal(b) => write!(f, "('{}', 0)", b.escape_ascii()),
            Factor::Reference { offset, length } => write!(f, "({}, {})", offset, length),
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum Mode {
    /// Literals and references, covering the whole input.
    #[default]
    Full,
    /// Reference factors only, in parse order.
    ReferencesOnly,
}

/// Match-finding index over one input, reusable across modes.
pub struct Factorizer<'a> {
    text: &'a [u8],
    rank: Vec<usize>,
    // nearest rank below / above whose suffix starts at a smaller position
    prev_smaller: Vec<Option<usize>>,
    next_smaller: Vec<Option<usize>>,
    lcp: SegmentPoint<usize, Min>,
    starts: SegmentPoint<usize, Min>,
}

impl<'a> Factorizer<'a> {
    pub fn new(text: &'a [u8]) -> Result<Self> {
        let sa = sais(text)?;
        let rank = lcp::inverse(&sa);
        let lcps = lcp::lcp(text, &sa, &rank);
        let (prev_smaller, next_smaller) = smaller_neighbours(&sa);
        Ok(Factorizer {
            text,
            rank,
            prev_smaller,
            next_smaller,
            lcp: SegmentPoint::build(lcps, Min),
            starts: SegmentPoint::build(sa, Min),
        })
    }

    // common prefix length of the suffixes at ranks a < b
    fn lcp_between(&self, a: usize, b: usize) -> usize {
        self.lcp.query(a + 1, b + 1)
    }

    /// Longest match for `pos` against earlier positions, leftmost on ties.
    pub fn longest_match(&self, pos: usize) -> Option<(usize, usize)> {
        let r = self.rank[pos];
        let below = self.prev_smaller[r].map_or(0, |a| self.lcp_between(a, r));
        let above = self.next_smaller[r].map_or(0, |b| self.lcp_between(r, b));
        let length = below.max(above);
        if length == 0 {
            return None;
        }

        // smallest rank lo with lcp(lo..=r) >= length
        let (mut a, mut b) = (0, r);
        while a < b {
            let m = (a + b) / 2;
            if self.lcp_between(m, r) >= length {
                b = m;
            } else {
                a = m + 1;
            }
        }
        let lo = a;

        // largest rank hi with lcp(r..=hi) >= length
        let (mut a, mut b) = (r, self.rank.len() - 1);
        while a < b {
            let m = (a + b + 1) / 2;
            if self.lcp_between(r, m) >= length {
                a = m;
            } else {
                b = m - 1;
            }
        }
        let hi = a;

        let offset = self.starts.query(lo, hi + 1);
        debug_assert!(offset < pos);
        Some((offset, length))
    }

    pub fn factors(&self, mode: Mode) -> Vec<Factor> {
        let mut out = Vec::new();
        let mut refs = 0usize;
        let mut pos = 0;
        while pos < self.text.len() {
            match self.longest_match(pos) {
                Some((offset, length)) => {
                    out.push(Factor::Reference { offset, length });
                    refs += 1;
                    pos += length;
                }
                None => {
                    if mode == Mode::Full {
                        out.push(Factor::Literal(self.text[pos]));
                    }
                    pos += 1;
                }
            }
        }
        debug!(
            len = self.text.len(),
            factors = out.len(),
            references = refs,
            ?mode,
            "factorized"
        );
        out
    }
}

fn smaller_neighbours(sa: &[usize]) -> (Vec<Option<usize>>, Vec<Option<usize>>) {
    let n = sa.len();
    let mut prev = vec![None; n];
    let mut next = vec![None; n];
    let mut stack: Vec<usize> = Vec::new();
    for r in 0..n {
        while stack.last().is_some_and(|&t| sa[t] > sa[r]) {
            stack.pop();
        }
        prev[r] = stack.last().copied();
        stack.push(r);
    }
    stack.clear();
    for r in (0..n).rev() {
        while stack.last().is_some_and(|&t| sa[t] > sa[r]) {
            stack.pop();
        }
        next[r] = stack.last().copied();
        stack.push(r);
    }
    (prev, next)
}

/// Factorize `text`. Fails with [`Error::InvalidInput`] when it is empty.
pub fn factorize(text: &[u8], mode: Mode) -> Result<Vec<Factor>> {
    Ok(Factorizer::new(text)?.factors(mode))
}

/// Expand a full factor sequence back into bytes.
pub fn reconstruct(factors: &[Factor]) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    for factor in factors {
        match *factor {
            Factor::Literal(b) => buf.push(b),
            Factor::Reference { offset, length } => {
                let position = buf.len();
                if length == 0 || offset >= position {
                    return Err(Error::InvalidReference {
                        position,
                        offset,
                        length,
                    });
                }
                // byte at a time: the source may run into the bytes being written
                for i in offset..offset + length {
                    buf.push(buf[i]);
                }
            }
        }
    }
    Ok(buf)
}
