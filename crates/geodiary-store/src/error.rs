//! Error types for geodiary-store.

use std::path::PathBuf;

/// Result type for geodiary-store operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in geodiary-store.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Database error from SQLite.
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Failed to create database directory.
    #[error("Failed to create database directory {path}: {source}")]
    CreateDirectory {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Positional deletion with a stale or out-of-range index.
    ///
    /// This is a caller contract violation (indexes must come from a fresh
    /// snapshot); the queue is left unchanged.
    #[error("Index {index} out of range for queue of length {len}")]
    IndexOutOfRange { index: usize, len: usize },

    /// Persisted queue entry failed to encode or decode.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A decoded queue entry violates the stored-point invariant.
    #[error(transparent)]
    InvalidPoint(#[from] geodiary_types::ParseError),
}
