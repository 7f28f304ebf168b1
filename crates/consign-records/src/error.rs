use thiserror::Error;

use consign_codec::CodecError;
use consign_index::IndexError;
use consign_kv::StoreError;

/// Errors surfaced by record operations.
#[derive(Debug, Error)]
pub enum RecordError {
    /// Input was rejected before any write.
    #[error("validation failed: {0}")]
    Validation(String),

    /// No entity is stored under the identifier.
    #[error("{schema} not found: {id}")]
    NotFound { schema: String, id: String },

    /// Stored bytes under `key` do not parse.
    #[error("cannot decode record at {key}: {reason}")]
    Decode { key: String, reason: String },

    /// The identifier is already indexed.
    #[error("duplicate identifier: {0}")]
    DuplicateIdentifier(String),

    /// The identifier field cannot be changed.
    #[error("field {field} is the identifier and cannot be updated")]
    ImmutableField { field: String },

    /// The underlying `get`/`put` failed.
    #[error("storage error: {0}")]
    Storage(#[from] StoreError),

    /// Configuration could not be loaded or is inconsistent.
    #[error("config error: {0}")]
    Config(String),

    /// A failure that no caller input can cause.
    #[error("internal error: {0}")]
    Internal(String),
}

impl RecordError {
    /// Returns `true` for the per-member failures that aggregation skips.
    pub fn is_member_failure(&self) -> bool {
        matches!(self, Self::NotFound { .. } | Self::Decode { .. })
    }

    /// A record under `key` that could not be read back.
    pub(crate) fn decode_at(key: &str, reason: impl Into<String>) -> Self {
        Self::Decode {
            key: key.to_string(),
            reason: reason.into(),
        }
    }
}

impl From<CodecError> for RecordError {
    fn from(err: CodecError) -> Self {
        match err {
            CodecError::Validation { .. } => Self::Validation(err.to_string()),
            // Decode failures are reported with their key via `decode_at`.
            CodecError::Decode(reason) => {
                Self::Internal(format!("unkeyed decode failure: {reason}"))
            }
            CodecError::Encode(reason) => Self::Internal(reason),
            CodecError::InvalidSchema { .. } => Self::Config(err.to_string()),
        }
    }
}

impl From<IndexError> for RecordError {
    fn from(err: IndexError) -> Self {
        match err {
            IndexError::DuplicateIdentifier(id) => Self::DuplicateIdentifier(id),
            IndexError::EmptyIdentifier => Self::Validation(err.to_string()),
            IndexError::Decode { key, reason } => Self::Decode { key, reason },
            IndexError::Serialization(reason) => Self::Internal(reason),
            IndexError::Store(e) => Self::Storage(e),
        }
    }
}

/// Convenience alias for record results.
pub type RecordResult<T> = Result<T, RecordError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_errors_map_to_taxonomy() {
        let dup: RecordError = IndexError::DuplicateIdentifier("P1".into()).into();
        assert!(matches!(dup, RecordError::DuplicateIdentifier(ref id) if id == "P1"));

        let store: RecordError = IndexError::Store(StoreError::Backend("down".into())).into();
        assert!(matches!(store, RecordError::Storage(_)));

        let corrupt: RecordError = IndexError::Decode {
            key: "User".into(),
            reason: "eof".into(),
        }
        .into();
        assert!(matches!(corrupt, RecordError::Decode { ref key, .. } if key == "User"));
    }

    #[test]
    fn codec_validation_maps_to_validation() {
        let err: RecordError = CodecError::Validation {
            schema: "user".into(),
            reason: "missing identifier field userName".into(),
        }
        .into();
        assert!(matches!(err, RecordError::Validation(ref msg) if msg.contains("userName")));
    }

    #[test]
    fn decode_errors_always_carry_a_key() {
        let keyed = RecordError::decode_at("P1", "eof");
        assert!(matches!(keyed, RecordError::Decode { ref key, .. } if key == "P1"));

        let unkeyed: RecordError = CodecError::Decode("eof".into()).into();
        assert!(matches!(unkeyed, RecordError::Internal(_)));
        assert!(!unkeyed.is_member_failure());
    }

    #[test]
    fn member_failures() {
        assert!(RecordError::NotFound {
            schema: "user".into(),
            id: "bob".into()
        }
        .is_member_failure());
        assert!(RecordError::Decode {
            key: "bob".into(),
            reason: "eof".into()
        }
        .is_member_failure());
        assert!(!RecordError::Storage(StoreError::EmptyKey).is_member_failure());
    }
}
