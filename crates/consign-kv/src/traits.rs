use crate::error::StoreResult;

/// Point-lookup key-value store.
///
/// This is the whole surface the record layer needs from a ledger. Many
/// ledger backends cannot list or scan keys, so the trait deliberately offers
/// neither; enumeration is the job of an explicit index record.
///
/// All implementations must satisfy these invariants:
/// - `get` on a key that was never written returns `Ok(None)`.
/// - `put` is an upsert: it replaces any previous value under the key.
/// - A successful `put` is visible to every later `get` on the same store.
/// - No two keys are ever written atomically together.
pub trait KvStore: Send + Sync {
    /// Read the value stored under `key`.
    ///
    /// Returns `Ok(None)` if the key does not exist.
    /// Returns `Err` only when the backend itself fails.
    fn get(&self, key: &str) -> StoreResult<Option<Vec<u8>>>;

    /// Store `value` under `key`, replacing any previous value.
    fn put(&self, key: &str, value: &[u8]) -> StoreResult<()>;

    /// Check whether a key exists.
    ///
    /// Default implementation calls `get()`. Backends may override to avoid
    /// copying the value.
    fn contains(&self, key: &str) -> StoreResult<bool> {
        Ok(self.get(key)?.is_some())
    }
}

impl<S: KvStore + ?Sized> KvStore for std::sync::Arc<S> {
    fn get(&self, key: &str) -> StoreResult<Option<Vec<u8>>> {
        (**self).get(key)
    }

    fn put(&self, key: &str, value: &[u8]) -> StoreResult<()> {
        (**self).put(key, value)
    }

    fn contains(&self, key: &str) -> StoreResult<bool> {
        (**self).contains(key)
    }
}
