//! Error types for `BPlusTree` operations.

use thiserror::Error;

/// Result type alias using [`enum@Error`].
pub type Result<T, E = Error> = core::result::Result<T, E>;

/// Errors returned by the fallible [`BPlusTree`](crate::BPlusTree) operations.
///
/// Every operation that returns an error has left the tree untouched.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum Error {
    #[error("index {index} is out of range for a tree of length {len}")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("range of {count} items starting at {index} exceeds the tree length {len}")]
    RangeOutOfBounds { index: usize, count: usize, len: usize },

    #[error("destination holds {available} slots but {needed} are required")]
    DestinationTooSmall { needed: usize, available: usize },

    #[error("order hint {hint} is too small; at least 2 is required")]
    InvalidOrder { hint: usize },

    #[error("unsupported operation: {0}")]
    Unsupported(&'static str),
}
