//! The [`IndexManager`] owning one reserved index key.
//!
//! The manager holds no cached state: every call re-reads the index record
//! from the store, so it always observes writes made by earlier operations.

use std::sync::Arc;

use consign_kv::KvStore;
use tracing::debug;

use crate::error::{IndexError, IndexResult};

/// Read-modify-write access to one index record.
///
/// The index record is a JSON array of identifier strings in insertion order.
pub struct IndexManager {
    store: Arc<dyn KvStore>,
    key: String,
}

impl std::fmt::Debug for IndexManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IndexManager")
            .field("key", &self.key)
            .finish()
    }
}

impl IndexManager {
    /// Create a manager for the index stored under `key`.
    pub fn new(store: Arc<dyn KvStore>, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    /// The reserved key this manager reads and writes.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Load the ordered identifier list.
    ///
    /// A missing index record is the first-use case and yields an empty list.
    pub fn load(&self) -> IndexResult<Vec<String>> {
        match self.store.get(&self.key)? {
            Some(bytes) => self.decode(&bytes),
            None => Ok(Vec::new()),
        }
    }

    /// Returns `true` if `id` is listed.
    pub fn contains(&self, id: &str) -> IndexResult<bool> {
        Ok(self.load()?.iter().any(|existing| existing == id))
    }

    /// Append `id` to the end of the index.
    ///
    /// Fails with [`IndexError::DuplicateIdentifier`] without writing if the
    /// identifier is already listed.
    pub fn append(&self, id: &str) -> IndexResult<()> {
        if id.is_empty() {
            return Err(IndexError::EmptyIdentifier);
        }
        let mut ids = self.load()?;
        if ids.iter().any(|existing| existing == id) {
            return Err(IndexError::DuplicateIdentifier(id.to_string()));
        }
        ids.push(id.to_string());
        self.write(&ids)?;
        debug!(key = %self.key, id, len = ids.len(), "index append");
        Ok(())
    }

    /// Write an empty index if none exists yet.
    ///
    /// Returns `true` if this call created the record. An existing index is
    /// never reset.
    pub fn initialize(&self) -> IndexResult<bool> {
        if self.store.contains(&self.key)? {
            return Ok(false);
        }
        self.write(&[])?;
        debug!(key = %self.key, "index initialized");
        Ok(true)
    }

    fn decode(&self, bytes: &[u8]) -> IndexResult<Vec<String>> {
        serde_json::from_slice(bytes).map_err(|e| IndexError::Decode {
            key: self.key.clone(),
            reason: e.to_string(),
        })
    }

    fn write(&self, ids: &[String]) -> IndexResult<()> {
        let bytes =
            serde_json::to_vec(ids).map_err(|e| IndexError::Serialization(e.to_string()))?;
        self.store.put(&self.key, &bytes)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use consign_kv::{InMemoryKvStore, StoreError, StoreResult};

    /// Store whose `put` always fails.
    struct ReadOnlyStore(InMemoryKvStore);

    impl KvStore for ReadOnlyStore {
        fn get(&self, key: &str) -> StoreResult<Option<Vec<u8>>> {
            self.0.get(key)
        }

        fn put(&self, _key: &str, _value: &[u8]) -> StoreResult<()> {
            Err(StoreError::Backend("read-only".into()))
        }
    }

    fn setup() -> (Arc<InMemoryKvStore>, IndexManager) {
        let store = Arc::new(InMemoryKvStore::new());
        let index = IndexManager::new(store.clone(), "Consignment");
        (store, index)
    }

    #[test]
    fn missing_index_loads_empty() {
        let (store, index) = setup();
        assert!(index.load().unwrap().is_empty());
        assert!(store.is_empty());
    }

    #[test]
    fn append_preserves_insertion_order() {
        let (_store, index) = setup();
        index.append("P2").unwrap();
        index.append("P1").unwrap();
        index.append("P3").unwrap();
        assert_eq!(index.load().unwrap(), vec!["P2", "P1", "P3"]);
    }

    #[test]
    fn duplicate_append_fails_without_writing() {
        let (store, index) = setup();
        index.append("P1").unwrap();
        let before = store.get("Consignment").unwrap();

        let err = index.append("P1").unwrap_err();
        assert!(matches!(err, IndexError::DuplicateIdentifier(ref id) if id == "P1"));
        assert_eq!(store.get("Consignment").unwrap(), before);
        assert_eq!(index.load().unwrap(), vec!["P1"]);
    }

    #[test]
    fn empty_identifier_is_rejected() {
        let (_store, index) = setup();
        assert!(matches!(index.append(""), Err(IndexError::EmptyIdentifier)));
    }

    #[test]
    fn contains_reflects_appends() {
        let (_store, index) = setup();
        assert!(!index.contains("P1").unwrap());
        index.append("P1").unwrap();
        assert!(index.contains("P1").unwrap());
    }

    #[test]
    fn stored_format_is_json_array() {
        let (store, index) = setup();
        index.append("P1").unwrap();
        index.append("P2").unwrap();
        assert_eq!(store.get("Consignment").unwrap().unwrap(), br#"["P1","P2"]"#);
    }

    #[test]
    fn corrupt_index_is_a_decode_error() {
        let (store, index) = setup();
        store.put("Consignment", b"{not a list").unwrap();
        assert!(matches!(index.load(), Err(IndexError::Decode { .. })));
        assert!(matches!(index.append("P1"), Err(IndexError::Decode { .. })));
    }

    #[test]
    fn initialize_creates_once_and_never_resets() {
        let (store, index) = setup();
        assert!(index.initialize().unwrap());
        assert_eq!(store.get("Consignment").unwrap().unwrap(), b"[]");

        index.append("P1").unwrap();
        assert!(!index.initialize().unwrap());
        assert_eq!(index.load().unwrap(), vec!["P1"]);
    }

    #[test]
    fn store_failure_propagates() {
        let store = Arc::new(ReadOnlyStore(InMemoryKvStore::new()));
        let index = IndexManager::new(store, "User");
        assert!(matches!(index.append("alice"), Err(IndexError::Store(_))));
        assert!(index.load().unwrap().is_empty());
    }

    #[test]
    fn managers_on_different_keys_are_independent() {
        let store = Arc::new(InMemoryKvStore::new());
        let users = IndexManager::new(store.clone(), "User");
        let packages = IndexManager::new(store, "Consignment");
        users.append("alice").unwrap();
        packages.append("P1").unwrap();
        assert_eq!(users.load().unwrap(), vec!["alice"]);
        assert_eq!(packages.load().unwrap(), vec!["P1"]);
    }
}
