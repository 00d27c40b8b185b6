use std::cmp::Ordering;
use std::ops::Range;

use crate::error::Result;
use crate::lcp;
use crate::sais::sais;

/// Suffix array over a borrowed byte string, with substring search.
#[derive(Debug, Clone)]
pub struct SuffixArray<'a> {
    text: &'a [u8],
    sa: Vec<usize>,
}

impl<'a> SuffixArray<'a> {
    pub fn new(text: &'a [u8]) -> Result<Self> {
        let sa = sais(text)?;
        Ok(SuffixArray { text, sa })
    }

    pub fn as_slice(&self) -> &[usize] {
        &self.sa
    }

    pub fn into_vec(self) -> Vec<usize> {
        self.sa
    }

    pub fn len(&self) -> usize {
        self.sa.len()
    }

    // never true: construction rejects empty input
    pub fn is_empty(&self) -> bool {
        self.sa.is_empty()
    }

    /// The suffix at rank `i`.
    pub fn suffix(&self, i: usize) -> &'a [u8] {
        &self.text[self.sa[i]..]
    }

    /// Inverse permutation: `rank()[pos]` is the rank of the suffix at `pos`.
    pub fn rank(&self) -> Vec<usize> {
        lcp::inverse(&self.sa)
    }

    pub fn lcp(&self) -> Vec<usize> {
        lcp::lcp(self.text, &self.sa, &self.rank())
    }

    // the suffix at `pos`, truncated to the pattern length, against the pattern
    fn cmp_prefix(&self, pos: usize, pattern: &[u8]) -> Ordering {
        let suffix = &self.text[pos..];
        let end = suffix.len().min(pattern.len());
        suffix[..end].cmp(pattern)
    }

    /// Ranks of every suffix that starts with `pattern`.
    pub fn search_range(&self, pattern: &[u8]) -> Range<usize> {
        if pattern.is_empty() {
            return 0..0;
        }
        let lo = self
            .sa
            .partition_point(|&p| self.cmp_prefix(p, pattern) == Ordering::Less);
        let hi = self
            .sa
            .partition_point(|&p| self.cmp_prefix(p, pattern) != Ordering::Greater);
        lo..hi
    }

    /// Leftmost position where `pattern` occurs.
    pub fn search(&self, pattern: &[u8]) -> Option<usize> {
        self.sa[self.search_range(pattern)].iter().copied().min()
    }

    /// Every position where `pattern` occurs, ascending.
    pub fn search_all(&self, pattern: &[u8]) -> Vec<usize> {
        let mut out = self.sa[self.search_range(pattern)].to_vec();
        out.sort_unstable();
        out
    }

    #[cfg(test)]
    fn range_is_exact(&self, pattern: &[u8], range: Range<usize>) -> bool {
        (0..self.len()).all(|i| range.contains(&i) == self.suffix(i).starts_with(pattern))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn test_suffixes_sorted() {
        let sa = SuffixArray::new(b"abcadab").unwrap();
        let expected: [&[u8]; 7] = [b"ab", b"abcadab", b"adab", b"b", b"bcadab", b"cadab", b"dab"];
        for (i, e) in expected.iter().enumerate() {
            assert_eq!(sa.suffix(i), *e);
        }
    }

    #[test]
    fn test_search_first() {
        let sa = SuffixArray::new(b"zabcada trip123").unwrap();
        assert_eq!(sa.search(b" "), Some(7));
        assert_eq!(sa.search(b"trip"), Some(8));
        assert_eq!(sa.search(b"z"), Some(0));
        assert_eq!(sa.search(b"za"), Some(0));
        assert_eq!(sa.search(b"3"), Some(14));
        assert_eq!(sa.search(b"123"), Some(12));
        assert_eq!(sa.search(b"a"), Some(1));
        assert_eq!(sa.search(b"y"), None);
        assert_eq!(sa.search(b"3x"), None);
        assert_eq!(sa.search(b""), None);
    }

    #[test]
    fn test_search_all() {
        let sa = SuffixArray::new(b"z123ABC123CBA256123").unwrap();
        assert_eq!(sa.search_all(b"ABC"), vec![4]);
        assert_eq!(sa.search_all(b"123"), vec![1, 7, 16]);
        assert_eq!(sa.search_all(b"z"), vec![0]);
        assert_eq!(sa.search_all(b"x"), Vec::<usize>::new());
    }

    #[test]
    fn test_search_range_exact() {
        let text = b"abracadabra abracadabra";
        let sa = SuffixArray::new(text).unwrap();
        for pattern in [&b"a"[..], b"abra", b"ra a", b"cad", b"abracadabra", b"zz", b"aa"] {
            let range = sa.search_range(pattern);
            assert!(sa.range_is_exact(pattern, range), "{:?}", pattern);
        }
    }

    #[test]
    fn test_lcp_through_index() {
        let sa = SuffixArray::new(b"banana").unwrap();
        assert_eq!(sa.lcp(), vec![0, 1, 3, 0, 0, 2]);
    }

    #[test]
    fn test_into_vec() {
        let sa = SuffixArray::new(b"abcabc").unwrap();
        assert_eq!(sa.len(), 6);
        assert_eq!(sa.as_slice().to_vec(), sa.clone().into_vec());
        assert_eq!(sa.into_vec(), vec![3, 0, 4, 1, 5, 2]);
    }

    #[test]
    fn test_empty_text() {
        assert_eq!(SuffixArray::new(b"").unwrap_err(), Error::InvalidInput);
    }
}
