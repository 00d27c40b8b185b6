//! Suffix array construction by induced sorting (SA-IS).
//!
//! Nong, Zhang, Chan (2009), "Linear Suffix Array Construction by Almost Pure
//! Induced-Sorting". Each level classifies positions as S or L type, sorts the
//! LMS substrings with one induced pass, and either reads the final LMS order
//! straight off (all names distinct) or reduces to the string of LMS names and
//! solves that first. The reduction is driven by an explicit stack of pending
//! levels, so a long run of a single byte cannot exhaust the call stack.

use tracing::trace;

use crate::error::{Error, Result};

const EMPTY: usize = usize::MAX;

// every byte is shifted up by one so 0 is free for the sentinel
const BYTE_ALPHABET: usize = 257;

/// A level whose final order is waiting on the order of its LMS suffixes.
struct Level {
    text: Vec<usize>,
    alphabet: usize,
    stype: Vec<bool>,
    lms: Vec<usize>,
}

/// Build the suffix array of `text`.
///
/// Returns `text.len()` positions, the sentinel excluded. Fails with
/// [`Error::InvalidInput`] on an empty slice.
pub fn sais(text: &[u8]) -> Result<Vec<usize>> {
    if text.is_empty() {
        return Err(Error::InvalidInput);
    }
    let mut s = Vec::with_capacity(text.len() + 1);
    s.extend(text.iter().map(|&b| b as usize + 1));
    s.push(0);
    let mut sa = solve(s, BYTE_ALPHABET);
    // the sentinel is the unique smallest suffix
    debug_assert_eq!(sa[0], text.len());
    sa.remove(0);
    Ok(sa)
}

// `text` must end in a unique 0 sentinel.
fn solve(mut text: Vec<usize>, mut alphabet: usize) -> Vec<usize> {
    let mut pending: Vec<Level> = Vec::new();
    let mut sa = loop {
        let n = text.len();
        if n == 1 {
            break vec![0];
        }
        let stype = classify(&text);
        let lms: Vec<usize> = (1..n).filter(|&i| is_lms(&stype, i)).collect();
        let counts = bucket_counts(&text, alphabet);
        let mut bkt = vec![0usize; alphabet];
        let mut sa = vec![EMPTY; n];

        // lms in text order only sorts the lms *substrings*
        induce(&text, &stype, &lms, &counts, &mut bkt, &mut sa);
        let sorted: Vec<usize> = sa.iter().copied().filter(|&p| is_lms(&stype, p)).collect();
        let (names, distinct) = name_substrings(&text, &stype, &sorted);
        trace!(
            depth = pending.len(),
            len = n,
            alphabet,
            lms = lms.len(),
            distinct,
            "sa-is level"
        );

        if distinct == lms.len() {
            induce(&text, &stype, &sorted, &counts, &mut bkt, &mut sa);
            break sa;
        }
        let reduced: Vec<usize> = lms.iter().map(|&p| names[p / 2]).collect();
        pending.push(Level {
            text: std::mem::replace(&mut text, reduced),
            alphabet,
            stype,
            lms,
        });
        alphabet = distinct;
    };

    while let Some(level) = pending.pop() {
        // sa holds the order of the reduced string, i.e. indices into level.lms
        let sorted: Vec<usize> = sa.iter().map(|&i| level.lms[i]).collect();
        let counts = bucket_counts(&level.text, level.alphabet);
        let mut bkt = vec![0usize; level.alphabet];
        sa = vec![EMPTY; level.text.len()];
        induce(&level.text, &level.stype, &sorted, &counts, &mut bkt, &mut sa);
    }
    sa
}

// true = S-type
fn classify(text: &[usize]) -> Vec<bool> {
    let n = text.len();
    let mut stype = vec![false; n];
    stype[n - 1] = true;
    for i in (0..n - 1).rev() {
        stype[i] = text[i] < text[i + 1] || (text[i] == text[i + 1] && stype[i + 1]);
    }
    stype
}

#[inline]
fn is_lms(stype: &[bool], i: usize) -> bool {
    i > 0 && stype[i] && !stype[i - 1]
}

fn bucket_counts(text: &[usize], alphabet: usize) -> Vec<usize> {
    let mut counts = vec![0usize; alphabet];
    for &c in text {
        counts[c] += 1;
    }
    counts
}

fn bucket_heads(counts: &[usize], bkt: &mut [usize]) {
    let mut sum = 0;
    for (b, &c) in bkt.iter_mut().zip(counts) {
        *b = sum;
        sum += c;
    }
}

fn bucket_tails(counts: &[usize], bkt: &mut [usize]) {
    let mut sum = 0;
    for (b, &c) in bkt.iter_mut().zip(counts) {
        sum += c;
        *b = sum;
    }
}

// Place `lms` at the bucket tails (the last element of `lms` ends up
// rightmost), then induce L-type suffixes left to right and S-type suffixes
// right to left.
fn induce(
    text: &[usize],
    stype: &[bool],
    lms: &[usize],
    counts: &[usize],
    bkt: &mut [usize],
    sa: &mut [usize],
) {
    sa.fill(EMPTY);

    bucket_tails(counts, bkt);
    for &p in lms.iter().rev() {
        let c = text[p];
        bkt[c] -= 1;
        sa[bkt[c]] = p;
    }

    bucket_heads(counts, bkt);
    for i in 0..sa.len() {
        let p = sa[i];
        if p != EMPTY && p > 0 && !stype[p - 1] {
            let c = text[p - 1];
            sa[bkt[c]] = p - 1;
            bkt[c] += 1;
        }
    }

    bucket_tails(counts, bkt);
    for i in (0..sa.len()).rev() {
        let p = sa[i];
        if p != EMPTY && p > 0 && stype[p - 1] {
            let c = text[p - 1];
            bkt[c] -= 1;
            sa[bkt[c]] = p - 1;
        }
    }
}

// Names are indexed by `pos / 2`: two LMS positions are never adjacent.
fn name_substrings(text: &[usize], stype: &[bool], sorted: &[usize]) -> (Vec<usize>, usize) {
    let mut names = vec![EMPTY; text.len() / 2 + 1];
    let mut name = 0;
    let mut prev: Option<usize> = None;
    for &p in sorted {
        if let Some(q) = prev {
            if !lms_substrings_equal(text, stype, q, p) {
                name += 1;
            }
        }
        names[p / 2] = name;
        prev = Some(p);
    }
    (names, name + 1)
}

fn lms_substrings_equal(text: &[usize], stype: &[bool], a: usize, b: usize) -> bool {
    let n = text.len();
    if a == n - 1 || b == n - 1 {
        return false;
    }
    let mut d = 0;
    loop {
        if text[a + d] != text[b + d] || stype[a + d] != stype[b + d] {
            return false;
        }
        let a_end = d > 0 && is_lms(stype, a + d);
        let b_end = d > 0 && is_lms(stype, b + d);
        if a_end || b_end {
            return a_end && b_end;
        }
        d += 1;
    }
}
