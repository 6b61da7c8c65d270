//! Grocer Core Library
//!
//! Price catalog persistence, first-run seeding and in-memory shopping list
//! aggregation.

pub mod aggregator;
pub mod catalog;
pub mod collection;
pub mod lists;
pub mod models;
pub mod seed;
pub mod storage;
pub mod validation;

#[cfg(test)]
mod testing;

pub use aggregator::{CustomAddition, ShoppingListAggregator, Totals};
pub use catalog::CatalogRepository;
pub use lists::ShoppingListRepository;
pub use models::{Entry, Item, ItemPatch, ShoppingList, ShoppingListPatch};
pub use seed::{default_items, SeedCoordinator, SeedOutcome};
pub use storage::{FileStore, KeyValueStore, MemoryStore, StorageKey, StoreError};
pub use validation::{parse_price, FieldError, NewItem, ValidationError};

pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
