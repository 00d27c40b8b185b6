//! LZ factorization of byte strings, backed by a linear-time suffix array.
//!
//! ```
//! use lzfactor::{factorize, suffix_array, Factor, Mode};
//!
//! assert_eq!(suffix_array(b"abcabc").unwrap(), vec![3, 0, 4, 1, 5, 2]);
//! assert_eq!(
//!     factorize(b"aaaa", Mode::Full).unwrap(),
//!     vec![Factor::Literal(b'a'), Factor::Reference { offset: 0, length: 3 }],
//! );
//! ```

pub mod error;
pub mod factor;
pub mod hash;
pub mod index;
pub mod lcp;
pub mod lz77;
pub mod reference;
pub mod sais;

pub use error::{Error, Result};
pub use factor::{reconstruct, Factor, Factorizer, Mode};
pub use hash::RabinKarp;
pub use index::SuffixArray;

/// Sorted suffix start positions of `bytes`, one per byte.
///
/// Fails with [`Error::InvalidInput`] when `bytes` is empty.
pub fn suffix_array(bytes: &[u8]) -> Result<Vec<usize>> {
    sais::sais(bytes)
}

/// Greedy leftmost-longest LZ factorization of `bytes`.
///
/// Fails with [`Error::InvalidInput`] when `bytes` is empty.
pub fn factorize(bytes: &[u8], mode: Mode) -> Result<Vec<Factor>> {
    factor::factorize(bytes, mode)
}
