//! Catalog repository: CRUD over the `items_db` collection.
//!
//! Callers are responsible for supplying unique ids; `add_item` does not
//! check. Mutations are whole-collection read-modify-write cycles and are
//! not serialized against each other.

use std::sync::Arc;

use crate::collection::JsonCollection;
use crate::models::{Item, ItemPatch};
use crate::storage::{KeyValueStore, StorageKey, StoreError};

/// Repository for catalog items.
///
/// The plain methods never fail: errors are logged and an empty or unchanged
/// collection is returned. The `try_*` methods report the error instead.
pub struct CatalogRepository<S> {
    items: JsonCollection<S, Item>,
}

impl<S> Clone for CatalogRepository<S> {
    fn clone(&self) -> Self {
        Self {
            items: self.items.clone(),
        }
    }
}

impl<S: KeyValueStore> CatalogRepository<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self {
            items: JsonCollection::new(store, StorageKey::ItemsDb),
        }
    }

    /// All items in insertion order.
    pub async fn list_items(&self) -> Vec<Item> {
        self.items.load().await
    }

    /// Appends `item` and returns the updated collection.
    pub async fn add_item(&self, item: Item) -> Vec<Item> {
        self.items.append(item).await
    }

    /// Merges `patch` into the item with `id`. Other items are untouched.
    pub async fn update_item(&self, id: &str, patch: &ItemPatch) -> Vec<Item> {
        self.items.update(id, patch).await
    }

    /// Removes the item with `id`; a missing id is a no-op.
    pub async fn delete_item(&self, id: &str) -> Vec<Item> {
        self.items.remove(id).await
    }

    /// Finds an item by id.
    pub async fn find_item(&self, id: &str) -> Option<Item> {
        self.list_items().await.into_iter().find(|i| i.id == id)
    }

    /// Loads the catalog, reporting read and decode failures.
    pub async fn try_list_items(&self) -> Result<Vec<Item>, StoreError> {
        self.items.try_load().await
    }

    pub async fn try_add_item(&self, item: Item) -> Result<Vec<Item>, StoreError> {
        self.items.try_append(item).await
    }

    pub async fn try_update_item(
        &self,
        id: &str,
        patch: &ItemPatch,
    ) -> Result<Vec<Item>, StoreError> {
        self.items.try_update(id, patch).await
    }

    pub async fn try_delete_item(&self, id: &str) -> Result<Vec<Item>, StoreError> {
        self.items.try_remove(id).await
    }

    /// Replaces the whole catalog.
    pub(crate) async fn try_replace(&self, items: &[Item]) -> Result<(), StoreError> {
        self.items.try_save(items).await
    }
}
