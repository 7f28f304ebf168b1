//! Field-tagged JSON encoding for entities.
//!
//! # Examples
//!
//! ```
//! use consign_codec::{decode, encode, Entity};
//!
//! let entity = Entity::new().with_field("packageID", "P1").with_field("to", "B");
//! let bytes = encode(&entity).unwrap();
//! assert_eq!(bytes, br#"{"packageID":"P1","to":"B"}"#);
//! assert_eq!(decode(&bytes).unwrap(), entity);
//! ```

use crate::entity::Entity;
use crate::error::{CodecError, CodecResult};

/// Encode one entity as a JSON object with fields in name order.
pub fn encode(entity: &Entity) -> CodecResult<Vec<u8>> {
    serde_json::to_vec(entity).map_err(|e| CodecError::Encode(e.to_string()))
}

/// Decode one entity.
///
/// Any JSON object whose values are all strings is accepted, including fields
/// no schema declares. Anything else fails with [`CodecError::Decode`].
pub fn decode(bytes: &[u8]) -> CodecResult<Entity> {
    serde_json::from_slice(bytes).map_err(|e| CodecError::Decode(e.to_string()))
}

/// Encode an ordered list of entities as a JSON array.
pub fn encode_list(entities: &[Entity]) -> CodecResult<Vec<u8>> {
    serde_json::to_vec(entities).map_err(|e| CodecError::Encode(e.to_string()))
}

/// Decode a JSON array produced by [`encode_list`].
pub fn decode_list(bytes: &[u8]) -> CodecResult<Vec<Entity>> {
    serde_json::from_slice(bytes).map_err(|e| CodecError::Decode(e.to_string()))
}
