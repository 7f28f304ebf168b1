//! Entity model and encoding for Consign records.
//!
//! An entity is a flat map of field names to string values. One field, named
//! by the entity's [`EntitySchema`], is the identifier: it is unique, never
//! changes after creation, and doubles as the entity's storage key.
//!
//! # Key Types
//!
//! - [`Entity`] -- field map, built structurally, never from concatenated text
//! - [`EntitySchema`] -- identifier, index key, and declared fields
//! - [`FieldSpec`] -- a declared field and whether it is required
//!
//! # Encoding
//!
//! [`encode`] produces a JSON object keyed by field name. The format is
//! field-tagged rather than positional, so [`decode`] accepts records written
//! with fields it does not know about and carries them through unchanged.

pub mod codec;
pub mod entity;
pub mod error;
pub mod schema;

pub use codec::{decode, decode_list, encode, encode_list};
pub use entity::Entity;
pub use error::{CodecError, CodecResult};
pub use schema::{EntitySchema, FieldSpec};
