// build inverse suffix array given a regular suffix array
pub fn inverse(sa: &[usize]) -> Vec<usize> {
    let mut out = vec![0usize; sa.len()];
    for (rank, &pos) in sa.iter().enumerate() {
        out[pos] = rank;
    }
    out
}

pub(crate) fn common_prefix(a: &[u8], b: &[u8]) -> usize {
    a.iter().zip(b.iter()).take_while(|(ca, cb)| ca == cb).count()
}

// adapted from https://github.com/BurntSushi/suffix (lcp_lens_linear in
// src/table.rs), which is licensed under unlicense.
/// Longest-common-prefix array in linear time (Kasai et al. 2001).
///
/// `lcp[r]` is the length of the common prefix of the suffixes at ranks
/// `r - 1` and `r`. Rank 0 has no predecessor, so `lcp[0]` is 0.
pub fn lcp(text: &[u8], sa: &[usize], rank: &[usize]) -> Vec<usize> {
    let mut lcps = vec![0usize; text.len()];
    let mut len = 0usize;
    for (pos, &r) in rank.iter().enumerate() {
        if r == 0 {
            // the next suffix may share nothing with this one
            len = 0;
            continue;
        }
        let prev = sa[r - 1];
        len += common_prefix(&text[prev + len..], &text[pos + len..]);
        lcps[r] = len;
        len = len.saturating_sub(1);
    }
    lcps
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sais::sais;

    fn lcp_of(text: &[u8]) -> Vec<usize> {
        let sa = sais(text).unwrap();
        let rank = inverse(&sa);
        lcp(text, &sa, &rank)
    }

    #[test]
    fn test_inverse() {
        let sa = vec![3, 0, 4, 1, 5, 2];
        assert_eq!(inverse(&sa), vec![1, 3, 5, 0, 2, 4]);
    }

    #[test]
    fn test_lcp_banana() {
        assert_eq!(lcp_of(b"banana"), vec![0, 1, 3, 0, 0, 2]);
    }

    #[test]
    fn test_lcp_digits() {
        assert_eq!(lcp_of(b"abc12abc15"), vec![0, 1, 0, 0, 0, 4, 0, 3, 0, 2]);
    }

    #[test]
    fn test_lcp_matches_direct_comparison() {
        let text = b"doddoddoddod";
        let sa = sais(text).unwrap();
        let lcps = lcp_of(text);
        for r in 1..sa.len() {
            assert_eq!(lcps[r], common_prefix(&text[sa[r - 1]..], &text[sa[r]..]));
        }
    }
}
