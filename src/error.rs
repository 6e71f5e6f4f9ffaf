use thiserror::Error;

/// Contract violations detected before any hashing work is dispatched.
///
/// Fixed-size operations take arrays, so most size contracts are enforced by
/// the type system; the variants below cover the slice-based batch entry
/// points. A mismatching public key or root is not an error of this crate.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum Error {
    #[error("Invalid length: expected {0} bytes, found {1} bytes")]
    BadLength(usize, usize),
    #[error("Failed to convert into byte slice due to the bad length: {0}")]
    IntoBytesBadLength(String),
    #[error("Empty batch: at least one message is required")]
    EmptyBatch,
    #[error("Invalid launch configuration: grid size {grid_size}, block size {block_size}")]
    InvalidLaunch { grid_size: usize, block_size: usize },
    #[error("Invalid stream count: {0}")]
    InvalidStreamCount(usize),
}

impl From<std::array::TryFromSliceError> for Error {
    fn from(e: std::array::TryFromSliceError) -> Self {
        Error::IntoBytesBadLength(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
