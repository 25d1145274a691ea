//! Error types for recipe persistence.

use serde_json::Error as SerdeError;
use thiserror::Error;

/// Errors emitted by recipe stores.
#[derive(Debug, Error)]
pub enum MemoryError {
    /// Underlying I/O failure while reading or writing collection files.
    #[error("i/o error: {source}")]
    Io {
        /// Source [`std::io::Error`].
        #[from]
        source: std::io::Error,
    },
    /// Serialization or deserialization error.
    #[error("serialization error: {source}")]
    Serialization {
        /// Source [`serde_json::Error`].
        #[from]
        source: SerdeError,
    },
    /// A batch lookup pointed past the end of the stored collection.
    #[error("no recipe at position {position} (collection holds {len})")]
    OutOfRange {
        /// Requested zero-based position.
        position: usize,
        /// Number of stored recipes.
        len: usize,
    },
}

/// Result type alias for memory operations.
pub type MemoryResult<T> = Result<T, MemoryError>;
