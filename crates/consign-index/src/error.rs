//! Error types for the index crate.

/// Errors that can occur during index operations.
#[derive(Debug, thiserror::Error)]
pub enum IndexError {
    /// The identifier is already listed in the index.
    #[error("identifier already indexed: {0}")]
    DuplicateIdentifier(String),

    /// Identifiers must be non-empty.
    #[error("empty identifier")]
    EmptyIdentifier,

    /// The stored index record does not parse.
    #[error("corrupt index at {key}: {reason}")]
    Decode { key: String, reason: String },

    /// The index could not be serialized.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Store operation failed.
    #[error("store error: {0}")]
    Store(#[from] consign_kv::StoreError),
}

/// Convenience alias for index results.
pub type IndexResult<T> = Result<T, IndexError>;
