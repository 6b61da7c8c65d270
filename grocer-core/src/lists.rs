//! Repository for saved shopping lists under the `shopping_lists` key.
//!
//! Nothing writes here implicitly; the aggregator stays in memory unless a
//! caller saves a snapshot.

use std::sync::Arc;

use crate::collection::JsonCollection;
use crate::models::{ShoppingList, ShoppingListPatch};
use crate::storage::{KeyValueStore, StorageKey, StoreError};

pub struct ShoppingListRepository<S> {
    lists: JsonCollection<S, ShoppingList>,
}

impl<S> Clone for ShoppingListRepository<S> {
    fn clone(&self) -> Self {
        Self {
            lists: self.lists.clone(),
        }
    }
}

impl<S: KeyValueStore> ShoppingListRepository<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self {
            lists: JsonCollection::new(store, StorageKey::ShoppingLists),
        }
    }

    pub async fn list_lists(&self) -> Vec<ShoppingList> {
        self.lists.load().await
    }

    pub async fn find_list(&self, id: &str) -> Option<ShoppingList> {
        self.list_lists().await.into_iter().find(|l| l.id == id)
    }

    pub async fn add_list(&self, list: ShoppingList) -> Vec<ShoppingList> {
        self.lists.append(list).await
    }

    pub async fn update_list(&self, id: &str, patch: &ShoppingListPatch) -> Vec<ShoppingList> {
        self.lists.update(id, patch).await
    }

    pub async fn delete_list(&self, id: &str) -> Vec<ShoppingList> {
        self.lists.remove(id).await
    }

    pub async fn try_add_list(&self, list: ShoppingList) -> Result<Vec<ShoppingList>, StoreError> {
        self.lists.try_append(list).await
    }

    pub async fn try_delete_list(&self, id: &str) -> Result<Vec<ShoppingList>, StoreError> {
        self.lists.try_remove(id).await
    }
}
