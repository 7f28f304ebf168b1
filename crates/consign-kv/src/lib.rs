//! Key-value ledger boundary for Consign.
//!
//! The record layer never talks to a ledger directly. It consumes exactly two
//! primitives, a point lookup and an upsert, expressed by the [`KvStore`]
//! trait. Everything above this crate (codec, index, record service) is
//! written against that trait.
//!
//! # Storage Backends
//!
//! - [`InMemoryKvStore`] -- `HashMap`-based store for tests and embedding
//! - [`JsonFileKvStore`] -- single-file store used by the CLI between runs
//!
//! # Design Rules
//!
//! 1. Absence is not an error: `get` returns `Ok(None)` for unknown keys.
//! 2. The store never interprets values -- it is a pure byte store.
//! 3. There are no multi-key transactions; each `put` stands alone.
//! 4. All backend failures are propagated, never silently ignored.

pub mod error;
pub mod file;
pub mod memory;
pub mod traits;

pub use error::{StoreError, StoreResult};
pub use file::JsonFileKvStore;
pub use memory::InMemoryKvStore;
pub use traits::KvStore;
