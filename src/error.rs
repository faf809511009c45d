//! Error types shared by every LangHD component.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors produced while building, encoding, or classifying hypervectors.
#[derive(Debug, Error)]
pub enum LangHdError {
    #[error("dimension must be positive, got {0}")]
    InvalidDimension(usize),

    #[error("n-gram width must be at least 1, got {0}")]
    InvalidNgram(usize),

    #[error("dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },

    /// A serialized vector did not decode to exactly `expected` binary values.
    #[error("malformed cached vector: expected {expected} bits of 0/1, got {got}")]
    MalformedCache { expected: usize, got: usize },

    #[error("cache entry {key} is corrupt: {reason}")]
    CacheCorrupt { key: String, reason: String },

    #[error("character code {0} has no basis vector")]
    UnknownSymbol(u8),

    #[error("cannot bundle an empty set of vectors")]
    EmptyBundle,

    #[error("no trained languages to classify against")]
    EmptyReferenceSet,

    #[error("I/O failure on {}: {source}", path.display())]
    IoFailure {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl LangHdError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        LangHdError::IoFailure {
            path: path.into(),
            source,
        }
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, LangHdError>;
