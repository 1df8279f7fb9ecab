//! Error types for mingit_core.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using mingit_core's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during store and codec operations.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error occurred during file operations.
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    /// Malformed object id string.
    #[error("Invalid object id: {reason}")]
    InvalidKey { reason: String },

    /// Object not found in the store.
    #[error("Object not found: {id}")]
    NotFound { id: String },

    /// Stored object bytes could not be decompressed or framed.
    #[error("Corrupt object: {reason}")]
    CorruptObject { reason: String },

    /// Tree entry is missing a delimiter.
    #[error("Malformed tree entry: {reason}")]
    MalformedEntry { reason: String },

    /// Tree entry digest has fewer than 20 bytes.
    #[error("Truncated tree entry: {have} of 20 digest bytes")]
    TruncatedEntry { have: usize },

    /// Store is invalid or not initialized.
    #[error("Invalid store at {path}: {reason}")]
    InvalidStore { path: PathBuf, reason: String },

    /// Object has a different type than the caller asked for.
    #[error("Invalid object type: expected {expected}, got {got}")]
    InvalidObjectType { expected: String, got: String },
}

impl Error {
    /// Create an InvalidKey error.
    pub fn invalid_key(reason: impl Into<String>) -> Self {
        Error::InvalidKey {
            reason: reason.into(),
        }
    }

    /// Create a NotFound error.
    pub fn not_found(id: impl Into<String>) -> Self {
        Error::NotFound { id: id.into() }
    }

    /// Create a CorruptObject error.
    pub fn corrupt_object(reason: impl Into<String>) -> Self {
        Error::CorruptObject {
            reason: reason.into(),
        }
    }

    /// Create a MalformedEntry error.
    pub fn malformed_entry(reason: impl Into<String>) -> Self {
        Error::MalformedEntry {
            reason: reason.into(),
        }
    }

    /// Create a TruncatedEntry error.
    pub fn truncated_entry(have: usize) -> Self {
        Error::TruncatedEntry { have }
    }

    /// Create an InvalidStore error.
    pub fn invalid_store(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Error::InvalidStore {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create an InvalidObjectType error.
    pub fn invalid_object_type(expected: impl Into<String>, got: impl Into<String>) -> Self {
        Error::InvalidObjectType {
            expected: expected.into(),
            got: got.into(),
        }
    }
}
