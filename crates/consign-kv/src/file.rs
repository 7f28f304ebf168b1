//! Single-file key-value store.
//!
//! [`JsonFileKvStore`] keeps the whole keyspace in one JSON document that maps
//! each key to its hex-encoded value. The document is loaded on open and
//! rewritten on every `put` by writing a temp file in the same directory and
//! renaming it over the original, so a crash leaves either the old or the new
//! document, never a torn one.
//!
//! It stands in for a real ledger when the CLI needs state between runs.

use std::collections::BTreeMap;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use tracing::debug;

use crate::error::{StoreError, StoreResult};
use crate::traits::KvStore;

/// JSON-document backed key-value store.
pub struct JsonFileKvStore {
    path: PathBuf,
    values: RwLock<BTreeMap<String, Vec<u8>>>,
}

impl JsonFileKvStore {
    /// Open the store at `path`, creating an empty one if the file is absent.
    ///
    /// Nothing is written until the first `put`.
    pub fn open(path: impl Into<PathBuf>) -> StoreResult<Self> {
        let path = path.into();
        let values = match fs::read(&path) {
            Ok(raw) => parse_document(&path, &raw)?,
            Err(e) if e.kind() == io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(e.into()),
        };
        debug!(path = %path.display(), keys = values.len(), "opened file store");
        Ok(Self {
            path,
            values: RwLock::new(values),
        })
    }

    /// Path of the backing document.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, values: &BTreeMap<String, Vec<u8>>) -> StoreResult<()> {
        let encoded: BTreeMap<&str, String> = values
            .iter()
            .map(|(k, v)| (k.as_str(), hex::encode(v)))
            .collect();
        let body = serde_json::to_vec_pretty(&encoded)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;

        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&dir)?;
        let mut tmp = tempfile::NamedTempFile::new_in(&dir)?;
        tmp.write_all(&body)?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path).map_err(|e| StoreError::Io(e.error))?;
        Ok(())
    }
}

fn parse_document(path: &Path, raw: &[u8]) -> StoreResult<BTreeMap<String, Vec<u8>>> {
    let corrupt = |reason: String| StoreError::Corrupt {
        location: path.display().to_string(),
        reason,
    };
    if raw.iter().all(u8::is_ascii_whitespace) {
        return Ok(BTreeMap::new());
    }
    let encoded: BTreeMap<String, String> =
        serde_json::from_slice(raw).map_err(|e| corrupt(e.to_string()))?;
    encoded
        .into_iter()
        .map(|(key, value)| {
            let bytes = hex::decode(&value).map_err(|e| corrupt(format!("key {key}: {e}")))?;
            Ok((key, bytes))
        })
        .collect()
}

impl KvStore for JsonFileKvStore {
    fn get(&self, key: &str) -> StoreResult<Option<Vec<u8>>> {
        let map = self
            .values
            .read()
            .map_err(|e| StoreError::Backend(format!("lock poisoned: {e}")))?;
        Ok(map.get(key).cloned())
    }

    fn put(&self, key: &str, value: &[u8]) -> StoreResult<()> {
        if key.is_empty() {
            return Err(StoreError::EmptyKey);
        }
        let mut map = self
            .values
            .write()
            .map_err(|e| StoreError::Backend(format!("lock poisoned: {e}")))?;

        // Persist a candidate first so a failed write leaves memory and disk
        // in agreement.
        let previous = map.insert(key.to_string(), value.to_vec());
        if let Err(e) = self.persist(&map) {
            match previous {
                Some(old) => map.insert(key.to_string(), old),
                None => map.remove(key),
            };
            return Err(e);
        }
        debug!(key, len = value.len(), "file store put");
        Ok(())
    }
}

impl std::fmt::Debug for JsonFileKvStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JsonFileKvStore")
            .field("path", &self.path)
            .finish()
    }
}
