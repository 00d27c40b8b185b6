//! Rabin–Karp rolling fingerprints over fixed-size byte blocks.
//!
//! A block `b[0..k]` hashes to `sum(b[i] * base^(k-1-i)) mod range` with base
//! 10. All arithmetic stays reduced modulo `range`, so rolling one byte gives
//! exactly the value [`RabinKarp::hash_block`] computes for the shifted block.

use std::collections::VecDeque;

use crate::error::{Error, Result};

pub const BASE: u64 = 10;

#[derive(Debug, Clone)]
pub struct RabinKarp {
    block_size: usize,
    range: u64,
    // BASE^(block_size - 1) mod range
    high: u64,
    prev_hash: u64,
    // None until hash_block_with_history seeds it
    history: Option<VecDeque<u8>>,
}

impl RabinKarp {
    /// Fails with [`Error::InvalidInput`] when either parameter is zero.
    pub fn new(block_size: usize, range: u64) -> Result<Self> {
        if block_size == 0 || range == 0 {
            return Err(Error::InvalidInput);
        }
        let high = (1..block_size).fold(1 % range, |acc, _| mul_mod(acc, BASE, range));
        Ok(RabinKarp {
            block_size,
            range,
            high,
            prev_hash: 0,
            history: None,
        })
    }

    fn check_block(&self, block: &[u8]) -> Result<()> {
        if block.len() != self.block_size {
            return Err(Error::BlockSize {
                expected: self.block_size,
                actual: block.len(),
            });
        }
        Ok(())
    }

    fn fingerprint(&self, block: &[u8]) -> u64 {
        block.iter().fold(0, |h, &b| {
            (mul_mod(h, BASE, self.range) + b as u64 % self.range) % self.range
        })
    }

    /// Hash one block without touching the rolling state.
    pub fn hash_block(&self, block: &[u8]) -> Result<u64> {
        self.check_block(block)?;
        Ok(self.fingerprint(block))
    }

    /// Hash one block and remember it so [`RabinKarp::incremental`] can roll on.
    pub fn hash_block_with_history(&mut self, block: &[u8]) -> Result<u64> {
        self.check_block(block)?;
        self.prev_hash = self.fingerprint(block);
        self.history = Some(block.iter().copied().collect());
        Ok(self.prev_hash)
    }

    /// Drop the oldest byte of the window, append `next`, return the new hash.
    pub fn incremental(&mut self, next: u8) -> Result<u64> {
        let window = self.history.as_mut().ok_or(Error::NoHistory)?;
        // the window always holds block_size >= 1 bytes
        let oldest = window.pop_front().ok_or(Error::NoHistory)?;
        window.push_back(next);
        let r = self.range;
        let without = (self.prev_hash + r - mul_mod(oldest as u64, self.high, r)) % r;
        self.prev_hash = (mul_mod(without, BASE, r) + next as u64 % r) % r;
        Ok(self.prev_hash)
    }

    /// Hash of every block-sized window of `text`, left to right.
    pub fn hashes(&mut self, text: &[u8]) -> Result<Vec<u64>> {
        if text.len() < self.block_size {
            return Err(Error::BlockSize {
                expected: self.block_size,
                actual: text.len(),
            });
        }
        let (first, rest) = text.split_at(self.block_size);
        let mut out = Vec::with_capacity(rest.len() + 1);
        out.push(self.hash_block_with_history(first)?);
        for &b in rest {
            out.push(self.incremental(b)?);
        }
        Ok(out)
    }
}

fn mul_mod(a: u64, b: u64, m: u64) -> u64 {
    ((a as u128 * b as u128) % m as u128) as u64
}

#[cfg(test)]
mod tests {
    use super::*;

    const BLOCK: usize = 16;
    const RANGE: u64 = 16381;

    fn generator() -> RabinKarp {
        RabinKarp::new(BLOCK, RANGE).unwrap()
    }

    #[test]
    fn test_hash_block_known_value() {
        let small = RabinKarp::new(3, 1000).unwrap();
        // '1' '2' '3' = 49, 50, 51 -> 4900 + 500 + 51
        assert_eq!(small.hash_block(b"123").unwrap(), 5451 % 1000);
    }

    #[test]
    fn test_wrong_block_size() {
        let mut g = generator();
        let err = Error::BlockSize {
            expected: BLOCK,
            actual: 3,
        };
        assert_eq!(g.hash_block(b"123"), Err(err.clone()));
        assert_eq!(g.hash_block_with_history(b"123"), Err(err));
        assert!(g.hash_block(b"").is_err());
        assert!(g.hash_block_with_history(b"").is_err());
    }

    #[test]
    fn test_incremental_without_history() {
        let mut g = generator();
        g.hash_block(b"1234567890123456").unwrap();
        assert_eq!(g.incremental(b'7'), Err(Error::NoHistory));
    }

    #[test]
    fn test_incremental_with_history() {
        let mut g = generator();
        g.hash_block_with_history(b"1234567890123456").unwrap();
        assert!(g.incremental(b'7').is_ok());
    }

    #[test]
    fn test_reproducible() {
        let mut a = generator();
        let mut b = generator();
        let block = b"1234567890123456";
        assert_eq!(a.hash_block(block).unwrap(), a.hash_block(block).unwrap());
        assert_eq!(a.hash_block(block).unwrap(), b.hash_block(block).unwrap());
        assert_eq!(
            a.hash_block_with_history(block).unwrap(),
            a.hash_block_with_history(block).unwrap()
        );
        assert_eq!(
            a.hash_block_with_history(block).unwrap(),
            b.hash_block_with_history(block).unwrap()
        );
    }

    #[test]
    fn test_block_with_and_without_history() {
        let mut g = generator();
        let block = b"0987654321654321";
        assert_eq!(g.hash_block(block).unwrap(), g.hash_block_with_history(block).unwrap());
    }

    #[test]
    fn test_incremental_matches_fresh_block() {
        let fresh = generator();
        let mut rolling = generator();
        rolling.hash_block_with_history(b"1234567890123456").unwrap();
        assert_eq!(
            rolling.incremental(b'7').unwrap(),
            fresh.hash_block(b"2345678901234567").unwrap()
        );
        assert_eq!(
            rolling.incremental(b'8').unwrap(),
            fresh.hash_block(b"3456789012345678").unwrap()
        );
    }

    #[test]
    fn test_hashes_over_text() {
        let text = b"the quick brown fox jumps over the lazy dog";
        let mut g = RabinKarp::new(4, 101).unwrap();
        let hashes = g.hashes(text).unwrap();
        assert_eq!(hashes.len(), text.len() - 3);
        for (i, h) in hashes.iter().enumerate() {
            assert_eq!(*h, g.hash_block(&text[i..i + 4]).unwrap());
        }
        // "the " starts at 0 and 31
        assert_eq!(hashes[0], hashes[31]);
    }

    #[test]
    fn test_invalid_parameters() {
        assert_eq!(RabinKarp::new(0, RANGE).unwrap_err(), Error::InvalidInput);
        assert_eq!(RabinKarp::new(BLOCK, 0).unwrap_err(), Error::InvalidInput);
        let mut g = generator();
        assert!(g.hashes(b"short").is_err());
    }
}
