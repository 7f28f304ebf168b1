//! Identifier index for Consign.
//!
//! Ledgers that only support point lookups cannot enumerate their keys. The
//! index is a single record under a reserved key holding the ordered list of
//! every entity identifier of one kind, so that "list all" becomes one read of
//! the index followed by one read per member.
//!
//! # Key Types
//!
//! - [`IndexManager`] -- load, append, and bootstrap the index record
//! - [`IndexError`] -- duplicate identifiers, corrupt index, store failures
//!
//! The index is append-only and holds each identifier at most once. An absent
//! index record reads as empty.

pub mod error;
pub mod manager;

pub use error::{IndexError, IndexResult};
pub use manager::IndexManager;
