//! Error types for the codec crate.

use thiserror::Error;

/// Errors raised while validating, encoding, or decoding entities.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    /// Input was rejected before anything was written.
    #[error("validation failed for {schema}: {reason}")]
    Validation { schema: String, reason: String },

    /// Stored bytes do not parse as an entity.
    #[error("decode error: {0}")]
    Decode(String),

    /// An entity could not be serialized.
    #[error("encode error: {0}")]
    Encode(String),

    /// A schema definition is inconsistent.
    #[error("invalid schema {schema}: {reason}")]
    InvalidSchema { schema: String, reason: String },
}

impl CodecError {
    pub(crate) fn validation(schema: &str, reason: impl Into<String>) -> Self {
        Self::Validation {
            schema: schema.to_string(),
            reason: reason.into(),
        }
    }
}

/// Convenience alias for codec results.
pub type CodecResult<T> = Result<T, CodecError>;
