//! Classic sliding-window LZ77 (Ziv & Lempel 1977).
//!
//! Unlike [`crate::factor`], matches are limited to the last `window`
//! positions, are addressed by distance rather than absolute offset, and every
//! step also carries the byte that follows the match.

use std::fmt;

use crate::error::{Error, Result};
use crate::lcp::common_prefix;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Triple {
    /// How far back the match starts; 0 when there is no match.
    pub distance: usize,
    pub length: usize,
    /// Byte after the match, `None` when the match runs to the end of input.
    pub next: Option<u8>,
}

impl fmt::Display for Triple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.next {
            Some(b) => write!(f, "({}, {}) {}", self.distance, self.length, b.escape_ascii()),
            None => write!(f, "({}, {})", self.distance, self.length),
        }
    }
}

pub fn encode(text: &[u8], window: usize) -> Result<Vec<Triple>> {
    if text.is_empty() {
        return Err(Error::InvalidInput);
    }
    if window == 0 {
        return Err(Error::InvalidWindow);
    }
    let mut out = vec![];
    let mut pos = 0;
    while pos < text.len() {
        let mut distance = 0;
        let mut length = 0;
        for start in pos.saturating_sub(window)..pos {
            let len = common_prefix(&text[start..], &text[pos..]);
            // later starts win ties: they are closer
            if len > 0 && len >= length {
                length = len;
                distance = pos - start;
            }
        }
        let next = text.get(pos + length).copied();
        out.push(Triple {
            distance,
            length,
            next,
        });
        pos += length + usize::from(next.is_some());
    }
    Ok(out)
}

pub fn decode(triples: &[Triple]) -> Result<Vec<u8>> {
    let mut buf: Vec<u8> = vec![];
    for t in triples {
        if t.length > 0 {
            let position = buf.len();
            if t.distance == 0 || t.distance > position {
                return Err(Error::InvalidDistance {
                    position,
                    distance: t.distance,
                });
            }
            let start = position - t.distance;
            for i in start..start + t.length {
                buf.push(buf[i]);
            }
        }
        if let Some(b) = t.next {
            buf.push(b);
        }
    }
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(distance: usize, length: usize, next: Option<u8>) -> Triple {
        Triple {
            distance,
            length,
            next,
        }
    }

    #[test]
    fn test_encode_and_decode() {
        let text = b"Hello,zHelios_yes";
        let triples = encode(text, 16).unwrap();
        assert_eq!(decode(&triples).unwrap(), text);
    }

    #[test]
    fn test_encode_small() {
        assert_eq!(
            encode(b"abab", 8).unwrap(),
            vec![t(0, 0, Some(b'a')), t(0, 0, Some(b'b')), t(2, 2, None)]
        );
        assert_eq!(
            encode(b"aaaab", 8).unwrap(),
            vec![t(0, 0, Some(b'a')), t(1, 3, Some(b'b'))]
        );
    }

    #[test]
    fn test_overlapping_copy() {
        assert_eq!(decode(&[t(0, 0, Some(b'a')), t(1, 3, Some(b'b'))]).unwrap(), b"aaaab");
        let text = b"xyxyxyxyxz";
        let triples = encode(text, 4).unwrap();
        assert_eq!(triples[2], t(2, 7, Some(b'z')));
        assert_eq!(decode(&triples).unwrap(), text);
    }

    #[test]
    fn test_window_limits_matches() {
        // the earlier "abc" is out of reach with a window of 3
        let text = b"abcxyzabc";
        let narrow = encode(text, 3).unwrap();
        assert!(narrow.iter().all(|t| t.distance <= 3));
        assert!(narrow.iter().all(|t| t.length == 0));
        let wide = encode(text, 16).unwrap();
        assert_eq!(wide.last(), Some(&t(6, 3, None)));
        assert_eq!(decode(&narrow).unwrap(), text);
        assert_eq!(decode(&wide).unwrap(), text);
    }

    #[test]
    fn test_invalid_arguments() {
        assert_eq!(encode(b"", 4), Err(Error::InvalidInput));
        assert_eq!(encode(b"abc", 0), Err(Error::InvalidWindow));
        assert_eq!(
            decode(&[t(1, 2, None)]),
            Err(Error::InvalidDistance {
                position: 0,
                distance: 1
            })
        );
    }
}
