use std::io;
use thiserror::Error;

/// Errors produced while building, writing, or reading an SSTable.
///
/// A key that is simply absent is **not** an error: lookups return
/// `Ok(None)` for that case.
#[derive(Debug, Error)]
pub enum SstError {
    /// An underlying I/O error (open, read, write, rename).
    #[error("io error: {0}")]
    Io(#[from] io::Error),

    /// A bounded value read hit end-of-file before the index-implied length.
    #[error("truncated value at file offset {offset}: expected {expected} bytes, got {actual}")]
    Truncated {
        offset: u64,
        expected: u64,
        actual: u64,
    },

    /// The file's header, filter, or index is inconsistent.
    #[error("corrupt sstable: {0}")]
    Corrupt(String),

    /// A table needs at least one entry.
    #[error("refusing to build an empty SSTable")]
    EmptyTable,

    /// Keys and values must be parallel sequences.
    #[error("got {keys} keys but {values} values")]
    LengthMismatch { keys: usize, values: usize },

    /// Keys must be strictly ascending.
    #[error("keys not strictly ascending at position {position}: {prev} then {next}")]
    Unsorted { position: usize, prev: u64, next: u64 },

    /// A value would start past the range of a 32-bit offset.
    #[error("value for key {key} starts beyond the 32-bit offset range")]
    OffsetOverflow { key: u64 },

    /// A value handed to the writer does not match the length the index encodes.
    #[error("value for key {key} is {actual} bytes, index expects {expected}")]
    ValueMismatch { key: u64, expected: u64, actual: u64 },

    #[error(transparent)]
    Config(#[from] config::ConfigError),
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, SstError>;
