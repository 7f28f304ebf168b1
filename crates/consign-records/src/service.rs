//! The [`RecordService`]: create, update, and read entities of one schema.
//!
//! Every operation starts from the store. Nothing read by one call is kept
//! for the next, so the service is safe to rebuild per invocation and never
//! needs invalidation after updates.

use std::collections::HashSet;
use std::sync::Arc;

use consign_codec::{decode, encode, encode_list, Entity, EntitySchema};
use consign_index::IndexManager;
use consign_kv::KvStore;

use crate::audit::IndexAudit;
use crate::error::{RecordError, RecordResult};
use crate::observer::{RecordObserver, TracingObserver};

/// Record operations for one entity schema over a key-value store.
pub struct RecordService {
    store: Arc<dyn KvStore>,
    schema: EntitySchema,
    index: IndexManager,
    observer: Arc<dyn RecordObserver>,
    /// Index keys of other schemas sharing the store.
    reserved_keys: Vec<String>,
}

impl std::fmt::Debug for RecordService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecordService")
            .field("schema", &self.schema.name)
            .field("index", &self.index)
            .finish()
    }
}

impl RecordService {
    /// Create a service for `schema`, reporting through [`TracingObserver`].
    pub fn new(store: Arc<dyn KvStore>, schema: EntitySchema) -> RecordResult<Self> {
        schema.check()?;
        let index = IndexManager::new(store.clone(), schema.index_key.clone());
        Ok(Self {
            store,
            schema,
            index,
            observer: Arc::new(TracingObserver),
            reserved_keys: Vec::new(),
        })
    }

    /// Replace the observer.
    pub fn with_observer(mut self, observer: Arc<dyn RecordObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// Treat `keys` as unusable identifiers, in addition to this schema's
    /// own index key. Used when several schemas share one store.
    pub fn with_reserved_keys<I, K>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: Into<String>,
    {
        self.reserved_keys = keys
            .into_iter()
            .map(Into::into)
            .filter(|key: &String| *key != self.schema.index_key)
            .collect();
        self
    }

    pub fn schema(&self) -> &EntitySchema {
        &self.schema
    }

    // ---- Bootstrap ----

    /// Make sure the index record exists, optionally registering a first
    /// entity.
    ///
    /// Returns `true` if this call created the index. An existing index is
    /// left as it is; a seed whose identifier is already indexed fails with
    /// [`RecordError::DuplicateIdentifier`].
    pub fn init(&self, seed: Option<&Entity>) -> RecordResult<bool> {
        if let Some(entity) = seed {
            self.schema.validate_new(entity)?;
        }
        let created = self.index.initialize()?;
        if let Some(entity) = seed {
            self.create(entity)?;
        }
        Ok(created)
    }

    // ---- Writes ----

    /// Register a new entity.
    ///
    /// Validation and the duplicate checks happen before any write. Schemas on
    /// one store share a keyspace, so an identifier whose key already holds a
    /// record of another kind is a duplicate too. A record of this schema under
    /// the key that the index never listed is an orphan and gets replaced.
    ///
    /// The entity record is written first and the index second; if the index
    /// write fails the entity is left orphaned, reported to the observer, and
    /// the error is returned.
    pub fn create(&self, entity: &Entity) -> RecordResult<()> {
        let id = self.schema.validate_new(entity)?;
        if self.is_reserved(id) {
            return Err(RecordError::Validation(format!(
                "identifier {id:?} collides with a reserved index key"
            )));
        }
        if self.index.contains(id)? {
            return Err(RecordError::DuplicateIdentifier(id.to_string()));
        }
        if let Some(existing) = self.store.get(id)? {
            if self.read_own(id, &existing).is_err() {
                return Err(RecordError::DuplicateIdentifier(id.to_string()));
            }
        }

        let bytes = encode(entity)?;
        self.store.put(id, &bytes)?;

        if let Err(err) = self.index.append(id) {
            let err = RecordError::from(err);
            self.observer.entity_orphaned(&self.schema.name, id, &err);
            return Err(err);
        }
        self.observer.entity_created(&self.schema.name, id);
        Ok(())
    }

    /// Set one non-identifier field of an existing entity.
    ///
    /// The index is not touched.
    pub fn update_field(&self, id: &str, field: &str, value: &str) -> RecordResult<()> {
        let mut entity = self.get_one(id)?;
        if self.schema.is_identifier(field) {
            return Err(RecordError::ImmutableField {
                field: field.to_string(),
            });
        }
        self.schema.validate_update(field, value)?;

        entity.set(field, value);
        let bytes = encode(&entity)?;
        self.store.put(id, &bytes)?;
        self.observer.entity_updated(&self.schema.name, id, field);
        Ok(())
    }

    // ---- Reads ----

    /// Fetch and decode one entity.
    ///
    /// A record under `id` that does not carry `id` in this schema's
    /// identifier field belongs to something else and fails with
    /// [`RecordError::Decode`].
    pub fn get_one(&self, id: &str) -> RecordResult<Entity> {
        // Never resolve the index key (or an empty key) as an entity.
        if self.schema.validate_identifier(id).is_err() || self.is_reserved(id) {
            return Err(self.not_found(id));
        }
        let bytes = self.store.get(id)?.ok_or_else(|| self.not_found(id))?;
        self.read_own(id, &bytes)
    }

    /// Fetch every indexed entity in index order.
    ///
    /// Members that are missing or undecodable are skipped and reported to
    /// the observer. Store failures abort the whole call.
    pub fn get_all(&self) -> RecordResult<Vec<Entity>> {
        let ids = self.index.load()?;
        let mut entities = Vec::with_capacity(ids.len());
        for id in &ids {
            match self.get_one(id) {
                Ok(entity) => entities.push(entity),
                Err(err) if err.is_member_failure() => {
                    self.observer.member_skipped(&self.schema.name, id, &err);
                }
                Err(err) => return Err(err),
            }
        }
        Ok(entities)
    }

    /// [`get_one`](Self::get_one), encoded for the caller.
    pub fn get_one_encoded(&self, id: &str) -> RecordResult<Vec<u8>> {
        Ok(encode(&self.get_one(id)?)?)
    }

    /// [`get_all`](Self::get_all), encoded as an ordered list.
    pub fn get_all_encoded(&self) -> RecordResult<Vec<u8>> {
        Ok(encode_list(&self.get_all()?)?)
    }

    /// Identifiers in index order.
    pub fn ids(&self) -> RecordResult<Vec<String>> {
        Ok(self.index.load()?)
    }

    // ---- Diagnostics ----

    /// Check every indexed identifier against its record. Read-only.
    pub fn audit(&self) -> RecordResult<IndexAudit> {
        let ids = self.index.load()?;
        let mut audit = IndexAudit {
            schema: self.schema.name.clone(),
            index_key: self.schema.index_key.clone(),
            index_len: ids.len(),
            ..Default::default()
        };

        let mut seen = HashSet::new();
        for id in &ids {
            if !seen.insert(id.as_str()) {
                if !audit.duplicates.contains(id) {
                    audit.duplicates.push(id.clone());
                }
                continue;
            }
            match self.get_one(id) {
                Ok(_) => audit.present.push(id.clone()),
                Err(RecordError::NotFound { .. }) => audit.missing.push(id.clone()),
                Err(RecordError::Decode { reason, .. }) => audit.corrupt.push((id.clone(), reason)),
                Err(err) => return Err(err),
            }
        }
        Ok(audit)
    }

    fn read_own(&self, id: &str, bytes: &[u8]) -> RecordResult<Entity> {
        let entity = decode(bytes).map_err(|e| RecordError::decode_at(id, e.to_string()))?;
        if self.schema.identifier_of(&entity) != Some(id) {
            return Err(RecordError::decode_at(
                id,
                format!(
                    "record is not a {} with {} {id:?}",
                    self.schema.name, self.schema.identifier
                ),
            ));
        }
        Ok(entity)
    }

    fn is_reserved(&self, id: &str) -> bool {
        self.reserved_keys.iter().any(|key| key == id)
    }

    fn not_found(&self, id: &str) -> RecordError {
        RecordError::NotFound {
            schema: self.schema.name.clone(),
            id: id.to_string(),
        }
    }
}
