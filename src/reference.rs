//! Slow, obviously-correct versions of the two core operations, used to
//! cross-check the fast paths.

use crate::error::{Error, Result};
use crate::factor::{Factor, Mode};
use crate::lcp::common_prefix;

/// Suffix array by comparison sort.
pub fn naive_suffix_array(text: &[u8]) -> Result<Vec<usize>> {
    if text.is_empty() {
        return Err(Error::InvalidInput);
    }
    let mut sa: Vec<usize> = (0..text.len()).collect();
    sa.sort_by(|&a, &b| text[a..].cmp(&text[b..]));
    Ok(sa)
}

/// Leftmost-longest greedy parse by scanning every earlier start.
pub fn naive_factorize(text: &[u8], mode: Mode) -> Result<Vec<Factor>> {
    if text.is_empty() {
        return Err(Error::InvalidInput);
    }
    let mut out = vec![];
    let mut pos = 0;
    while pos < text.len() {
        let mut best: Option<(usize, usize)> = None;
        for start in 0..pos {
            let len = common_prefix(&text[start..], &text[pos..]);
            // strictly longer only, so ties keep the earliest start
            if len > 0 && best.map_or(true, |(_, l)| len > l) {
                best = Some((start, len));
            }
        }
        match best {
            Some((offset, length)) => {
                out.push(Factor::Reference { offset, length });
                pos += length;
            }
            None => {
                if mode == Mode::Full {
                    out.push(Factor::Literal(text[pos]));
                }
                pos += 1;
            }
        }
    }
    Ok(out)
}
