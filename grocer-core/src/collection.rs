//! Whole-collection persistence over a key-value store.
//!
//! A collection is one JSON array stored under one key. Every mutation loads
//! the full array, changes it in memory and writes the full array back. Two
//! mutations issued concurrently are not serialized against each other: the
//! last write wins at collection granularity.
//!
//! Each operation comes in two forms:
//! - `try_*` returns `Result` so callers can tell failures apart.
//! - the plain form logs failures and returns an empty or unchanged collection.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::marker::PhantomData;
use std::sync::Arc;

use crate::storage::{KeyValueStore, StorageKey, StoreError};

/// A record stored in a [`JsonCollection`].
pub trait Record: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    /// Partial update merged over an existing record.
    type Patch: Send + Sync;

    fn id(&self) -> &str;

    /// Merges `patch` into `self`. Must not change the id.
    fn apply(&mut self, patch: &Self::Patch);
}

/// Read-modify-write access to one JSON array in a key-value store.
pub struct JsonCollection<S, T> {
    store: Arc<S>,
    key: StorageKey,
    _record: PhantomData<fn() -> T>,
}

impl<S, T> Clone for JsonCollection<S, T> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            key: self.key,
            _record: PhantomData,
        }
    }
}

impl<S: KeyValueStore, T: Record> JsonCollection<S, T> {
    pub fn new(store: Arc<S>, key: StorageKey) -> Self {
        Self {
            store,
            key,
            _record: PhantomData,
        }
    }

    pub fn key(&self) -> StorageKey {
        self.key
    }

    /// Loads the collection. An absent key is an empty collection.
    ///
    /// Unlike the other operations this reports decode failures as
    /// [`StoreError::Decode`].
    pub async fn try_load(&self) -> Result<Vec<T>, StoreError> {
        let key = self.key.as_str();
        match self.store.get(key).await? {
            Some(json) => serde_json::from_str(&json).map_err(|source| StoreError::Decode {
                key: key.to_string(),
                source,
            }),
            None => Ok(Vec::new()),
        }
    }

    /// Serializes and writes the whole collection.
    pub async fn try_save(&self, records: &[T]) -> Result<(), StoreError> {
        let key = self.key.as_str();
        let json = serde_json::to_string(records).map_err(|source| StoreError::Encode {
            key: key.to_string(),
            source,
        })?;
        self.store.set(key, json).await?;
        tracing::debug!("Saved {} record(s) under {}", records.len(), key);
        Ok(())
    }

    pub async fn try_append(&self, record: T) -> Result<Vec<T>, StoreError> {
        self.modify(|records| records.push(record))
            .await
            .map_err(|(_, e)| e)
    }

    pub async fn try_update(&self, id: &str, patch: &T::Patch) -> Result<Vec<T>, StoreError> {
        self.modify(|records| Self::apply_patch(records, id, patch))
            .await
            .map_err(|(_, e)| e)
    }

    pub async fn try_remove(&self, id: &str) -> Result<Vec<T>, StoreError> {
        self.modify(|records| records.retain(|r| r.id() != id))
            .await
            .map_err(|(_, e)| e)
    }

    /// Loads the collection, returning an empty one on any failure.
    pub async fn load(&self) -> Vec<T> {
        match self.load_lenient().await {
            Ok(records) => records,
            Err(e) => {
                tracing::error!("Error reading {}: {}", self.key, e);
                Vec::new()
            }
        }
    }

    /// Appends a record. On failure returns the collection as loaded.
    pub async fn append(&self, record: T) -> Vec<T> {
        let result = self.modify(|records| records.push(record)).await;
        self.absorb("adding to", result)
    }

    /// Merges `patch` into the record with `id`, if present.
    pub async fn update(&self, id: &str, patch: &T::Patch) -> Vec<T> {
        let result = self
            .modify(|records| Self::apply_patch(records, id, patch))
            .await;
        self.absorb("updating", result)
    }

    /// Removes the record with `id`. Removing a missing id is not an error.
    pub async fn remove(&self, id: &str) -> Vec<T> {
        let result = self.modify(|records| records.retain(|r| r.id() != id)).await;
        self.absorb("deleting from", result)
    }

    /// Loads, treating undecodable contents the same as an absent key.
    async fn load_lenient(&self) -> Result<Vec<T>, StoreError> {
        match self.try_load().await {
            Err(e) if e.is_decode() => {
                tracing::warn!("Discarding unreadable {}: {}", self.key, e);
                Ok(Vec::new())
            }
            other => other,
        }
    }

    /// Runs one read-modify-write cycle.
    ///
    /// On failure the error carries the collection as it was loaded
    /// (empty if the read itself failed).
    async fn modify<F>(&self, f: F) -> Result<Vec<T>, (Vec<T>, StoreError)>
    where
        F: FnOnce(&mut Vec<T>),
    {
        let loaded = self.load_lenient().await.map_err(|e| (Vec::new(), e))?;
        let mut records = loaded.clone();
        f(&mut records);
        match self.try_save(&records).await {
            Ok(()) => Ok(records),
            Err(e) => Err((loaded, e)),
        }
    }

    fn absorb(&self, action: &str, result: Result<Vec<T>, (Vec<T>, StoreError)>) -> Vec<T> {
        match result {
            Ok(records) => records,
            Err((loaded, e)) => {
                tracing::error!("Error {} {}: {}", action, self.key, e);
                loaded
            }
        }
    }

    fn apply_patch(records: &mut [T], id: &str, patch: &T::Patch) {
        for record in records.iter_mut().filter(|r| r.id() == id) {
            record.apply(patch);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Item, ItemPatch};
    use crate::storage::MemoryStore;
    use crate::testing::FailingStore;

    fn items(store: MemoryStore) -> JsonCollection<MemoryStore, Item> {
        JsonCollection::new(Arc::new(store), StorageKey::ItemsDb)
    }

    #[tokio::test]
    async fn test_missing_key_is_empty() {
        let collection = items(MemoryStore::new());
        assert!(collection.try_load().await.unwrap().is_empty());
        assert!(collection.load().await.is_empty());
    }

    #[tokio::test]
    async fn test_corrupt_value_strict_and_lenient() {
        let collection = items(MemoryStore::with_value("items_db", "{not json"));

        let err = collection.try_load().await.unwrap_err();
        assert!(err.is_decode());

        assert!(collection.load().await.is_empty());
    }

    #[tokio::test]
    async fn test_append_over_corrupt_value_replaces_it() {
        let collection = items(MemoryStore::with_value("items_db", "garbage"));
        let item = Item::new("Eggs", "tray", 6.5);

        let records = collection.try_append(item.clone()).await.unwrap();
        assert_eq!(records, vec![item.clone()]);
        assert_eq!(collection.try_load().await.unwrap(), vec![item]);
    }

    #[tokio::test]
    async fn test_update_patches_every_matching_record() {
        let collection = items(MemoryStore::new());
        let a = Item::new("A", "kg", 1.0).with_id("dup");
        let b = Item::new("B", "kg", 2.0).with_id("dup");
        collection.append(a).await;
        collection.append(b).await;

        let records = collection
            .update("dup", &ItemPatch::default().with_unit("g"))
            .await;
        assert!(records.iter().all(|r| r.unit == "g"));
    }

    #[tokio::test]
    async fn test_failed_read_absorbs_to_empty() {
        let collection: JsonCollection<FailingStore, Item> =
            JsonCollection::new(Arc::new(FailingStore::reads()), StorageKey::ItemsDb);

        assert!(collection.load().await.is_empty());
        assert!(collection.append(Item::new("A", "kg", 1.0)).await.is_empty());
        assert!(collection.try_load().await.is_err());
    }

    #[tokio::test]
    async fn test_failed_write_returns_loaded_collection() {
        let existing = Item::new("Eggs", "tray", 6.5);
        let json = serde_json::to_string(&vec![existing.clone()]).unwrap();
        let store = FailingStore::writes(MemoryStore::with_value("items_db", json));
        let collection: JsonCollection<FailingStore, Item> =
            JsonCollection::new(Arc::new(store), StorageKey::ItemsDb);

        let records = collection.append(Item::new("Bread", "loaf", 4.5)).await;
        assert_eq!(records, vec![existing.clone()]);

        let records = collection.remove(&existing.id).await;
        assert_eq!(records, vec![existing.clone()]);

        let err = collection
            .try_append(Item::new("Bread", "loaf", 4.5))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Unavailable(_)));
        assert_eq!(collection.load().await, vec![existing]);
    }
}
