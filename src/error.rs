use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("Empty byte stream provided")]
    InvalidInput,
    #[error("reference at position {position} copies {length} bytes from offset {offset}, which is not before it")]
    InvalidReference {
        position: usize,
        offset: usize,
        length: usize,
    },
    #[error("window size must be at least 1")]
    InvalidWindow,
    #[error("triple at position {position} reaches {distance} bytes back, past the start of the output")]
    InvalidDistance { position: usize, distance: usize },
    #[error("Byte sequence is {actual} long instead of {expected}")]
    BlockSize { expected: usize, actual: usize },
    #[error("No history defined, hash_block_with_history should be called first")]
    NoHistory,
}

pub type Result<T> = std::result::Result<T, Error>;
