//! In-memory shopping list with running totals.
//!
//! The list is never persisted on its own. A caller that wants to keep a
//! list can take a [`ShoppingList`] snapshot and store it explicitly.

use serde::Serialize;

use crate::catalog::CatalogRepository;
use crate::models::{Entry, Item, ShoppingList};
use crate::storage::{KeyValueStore, StoreError};
use crate::validation::{NewItem, ValidationError};

/// Aggregate figures over all entries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Totals {
    pub entry_count: usize,
    pub total_quantity: u64,
    pub total_amount: f64,
}

/// Result of [`ShoppingListAggregator::add_custom`].
///
/// The entry is always added. The catalog write is a separate step that can
/// fail on its own; `catalog_error` holds the failure if it did.
#[derive(Debug)]
pub struct CustomAddition {
    pub item: Item,
    pub entry: Entry,
    pub catalog_error: Option<StoreError>,
}

impl CustomAddition {
    /// True if the item reached the catalog.
    pub fn persisted(&self) -> bool {
        self.catalog_error.is_none()
    }
}

#[derive(Debug, Clone, Default)]
pub struct ShoppingListAggregator {
    entries: Vec<Entry>,
}

impl ShoppingListAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Restores entries from a saved list.
    pub fn from_list(list: &ShoppingList) -> Self {
        Self {
            entries: list.entries.clone(),
        }
    }

    /// Copies the current entries into a new saved-list record.
    pub fn snapshot(&self, name: impl Into<String>) -> ShoppingList {
        ShoppingList::new(name, self.entries.clone())
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, entry_id: &str) -> Option<&Entry> {
        self.entries.iter().find(|e| e.id() == entry_id)
    }

    /// Adds a catalog item with quantity 1.
    pub fn add_from_catalog(&mut self, item: &Item) -> &Entry {
        self.push(Entry::from_item(item))
    }

    /// Adds freeform input to both the catalog and the list.
    ///
    /// Input is validated first; nothing is written when it is invalid.
    /// The catalog item and the entry get independent ids.
    pub async fn add_custom<S: KeyValueStore>(
        &mut self,
        catalog: &CatalogRepository<S>,
        name: &str,
        unit: &str,
        price: &str,
    ) -> Result<CustomAddition, ValidationError> {
        let input = NewItem::parse(name, unit, price)?;
        let entry = Entry::new(input.name.clone(), input.unit.clone(), input.price);
        let item = input.into_item();

        let catalog_error = catalog.try_add_item(item.clone()).await.err();
        if let Some(e) = &catalog_error {
            tracing::error!("Custom item '{}' not saved to catalog: {}", item.name, e);
        }

        let entry = self.push(entry).clone();
        Ok(CustomAddition {
            item,
            entry,
            catalog_error,
        })
    }

    /// Sets an entry's quantity (minimum 1). Returns `None` if the id is unknown.
    pub fn set_quantity(&mut self, entry_id: &str, quantity: u32) -> Option<&Entry> {
        let entry = self.entries.iter_mut().find(|e| e.id() == entry_id)?;
        entry.set_quantity(quantity);
        Some(&*entry)
    }

    pub fn increment(&mut self, entry_id: &str) -> Option<&Entry> {
        let quantity = self.get(entry_id)?.quantity();
        self.set_quantity(entry_id, quantity.saturating_add(1))
    }

    pub fn decrement(&mut self, entry_id: &str) -> Option<&Entry> {
        let quantity = self.get(entry_id)?.quantity();
        self.set_quantity(entry_id, quantity.saturating_sub(1))
    }

    /// Removes an entry. Returns true if one was removed.
    pub fn remove_entry(&mut self, entry_id: &str) -> bool {
        let len_before = self.entries.len();
        self.entries.retain(|e| e.id() != entry_id);
        self.entries.len() != len_before
    }

    pub fn clear_all(&mut self) {
        self.entries.clear();
    }

    pub fn compute_totals(&self) -> Totals {
        self.entries.iter().fold(Totals::default(), |acc, e| Totals {
            entry_count: acc.entry_count + 1,
            total_quantity: acc.total_quantity + u64::from(e.quantity()),
            total_amount: acc.total_amount + e.total(),
        })
    }

    fn push(&mut self, entry: Entry) -> &Entry {
        self.entries.push(entry);
        &self.entries[self.entries.len() - 1]
    }
}
