//! Record service for Consign.
//!
//! Composes the entity codec, the identifier index, and the key-value store
//! into the four record operations: create, update one field, get one, and
//! get all. One [`RecordService`] serves one [`EntitySchema`].
//!
//! # Two keys, no transaction
//!
//! Create writes the entity under its identifier and then appends the
//! identifier to the index. The store offers no way to make those two writes
//! atomic. If the index write fails, the entity record stays behind as an
//! orphan that enumeration cannot reach. The service reports the orphan to
//! its [`RecordObserver`] and returns the error; it does not roll back. The
//! host is expected to retry or discard the whole invocation.
//!
//! Aggregation tolerates the opposite defect: an indexed member that is
//! missing or undecodable is skipped and reported, and the rest of the
//! collection is still returned.

pub mod audit;
pub mod config;
pub mod error;
pub mod observer;
pub mod service;

pub use audit::IndexAudit;
pub use config::RecordsConfig;
pub use error::{RecordError, RecordResult};
pub use observer::{NoopObserver, RecordObserver, TracingObserver};
pub use service::RecordService;

// Re-export key types
pub use consign_codec::{Entity, EntitySchema, FieldSpec};
pub use consign_kv::{InMemoryKvStore, JsonFileKvStore, KvStore};
