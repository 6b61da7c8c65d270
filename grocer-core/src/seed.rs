//! One-time population of the catalog with default items.
//!
//! Concurrent calls share a single in-flight operation: the first caller
//! starts it, later callers await the same result, and the slot is cleared
//! once it settles. This only coordinates callers of one
//! [`SeedCoordinator`] in one process.

use futures::future::{BoxFuture, FutureExt, Shared};
use tokio::sync::Mutex;

use crate::catalog::CatalogRepository;
use crate::models::Item;
use crate::storage::KeyValueStore;

/// The catalog written on first run.
pub fn default_items() -> Vec<Item> {
    vec![
        Item::new("Eggs", "tray", 6.5).with_id("1"),
        Item::new("Bread", "loaf", 4.5).with_id("2"),
        Item::new("Milk", "1L box", 11.0).with_id("3"),
        Item::new("Rice", "5kg", 20.0).with_id("4"),
    ]
}

/// Result of a seeding attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum SeedOutcome {
    /// The catalog was empty and the defaults were written.
    Seeded(Vec<Item>),
    /// The catalog already had items; nothing was written.
    Existing(Vec<Item>),
    /// Storage failed; see the log.
    Failed,
}

impl SeedOutcome {
    pub fn items(&self) -> &[Item] {
        match self {
            SeedOutcome::Seeded(items) | SeedOutcome::Existing(items) => items,
            SeedOutcome::Failed => &[],
        }
    }

    pub fn into_items(self) -> Vec<Item> {
        match self {
            SeedOutcome::Seeded(items) | SeedOutcome::Existing(items) => items,
            SeedOutcome::Failed => Vec::new(),
        }
    }

    pub fn was_seeded(&self) -> bool {
        matches!(self, SeedOutcome::Seeded(_))
    }
}

type SeedOperation = Shared<BoxFuture<'static, SeedOutcome>>;

#[derive(Default)]
struct InFlight {
    next_generation: u64,
    current: Option<(u64, SeedOperation)>,
}

/// Seeds the catalog at most once per in-flight window.
pub struct SeedCoordinator<S> {
    catalog: CatalogRepository<S>,
    defaults: Vec<Item>,
    in_flight: Mutex<InFlight>,
}

impl<S: KeyValueStore + 'static> SeedCoordinator<S> {
    /// Coordinator that seeds [`default_items`].
    pub fn new(catalog: CatalogRepository<S>) -> Self {
        Self::with_defaults(catalog, default_items())
    }

    pub fn with_defaults(catalog: CatalogRepository<S>, defaults: Vec<Item>) -> Self {
        Self {
            catalog,
            defaults,
            in_flight: Mutex::new(InFlight::default()),
        }
    }

    /// Writes the defaults if the catalog is empty.
    ///
    /// If a seed is already running, waits for it and returns its outcome
    /// instead of reading storage again.
    pub async fn seed_if_empty(&self) -> SeedOutcome {
        let (generation, operation) = {
            let mut slot = self.in_flight.lock().await;
            if let Some((generation, operation)) = slot.current.clone() {
                tracing::debug!("Seeding already in progress, joining");
                (generation, operation)
            } else {
                let generation = slot.next_generation;
                slot.next_generation += 1;
                let operation = Self::run(self.catalog.clone(), self.defaults.clone())
                    .boxed()
                    .shared();
                slot.current = Some((generation, operation.clone()));
                (generation, operation)
            }
        };

        let outcome = operation.await;

        let mut slot = self.in_flight.lock().await;
        if matches!(&slot.current, Some((current, _)) if *current == generation) {
            slot.current = None;
        }
        outcome
    }

    async fn run(catalog: CatalogRepository<S>, defaults: Vec<Item>) -> SeedOutcome {
        match catalog.try_list_items().await {
            Ok(items) if !items.is_empty() => {
                tracing::debug!("Catalog has {} item(s), skipping seed", items.len());
                return SeedOutcome::Existing(items);
            }
            Ok(_) => {}
            Err(e) if e.is_decode() => {
                tracing::warn!("Catalog unreadable, replacing with defaults: {}", e);
            }
            Err(e) => {
                tracing::error!("Error reading catalog before seeding: {}", e);
                return SeedOutcome::Failed;
            }
        }

        match catalog.try_replace(&defaults).await {
            Ok(()) => {
                tracing::info!("Seeded {} default item(s)", defaults.len());
                SeedOutcome::Seeded(defaults)
            }
            Err(e) => {
                tracing::error!("Error seeding default items: {}", e);
                SeedOutcome::Failed
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use crate::testing::{FailingStore, SlowStore};
    use futures::future::join_all;
    use std::sync::Arc;

    fn coordinator<S: KeyValueStore + 'static>(store: Arc<S>) -> SeedCoordinator<S> {
        SeedCoordinator::new(CatalogRepository::new(store))
    }

    #[test]
    fn test_default_items() {
        let items = default_items();
        let summary: Vec<_> = items
            .iter()
            .map(|i| (i.id.as_str(), i.name.as_str(), i.unit.as_str(), i.price_per_unit))
            .collect();
        assert_eq!(
            summary,
            vec![
                ("1", "Eggs", "tray", 6.5),
                ("2", "Bread", "loaf", 4.5),
                ("3", "Milk", "1L box", 11.0),
                ("4", "Rice", "5kg", 20.0),
            ]
        );
    }

    #[tokio::test]
    async fn test_seeds_empty_catalog() {
        let store = Arc::new(MemoryStore::new());
        let seeder = coordinator(Arc::clone(&store));

        let outcome = seeder.seed_if_empty().await;
        assert!(outcome.was_seeded());
        assert_eq!(outcome.items().len(), 4);

        let catalog = CatalogRepository::new(store);
        let names: Vec<_> = catalog
            .list_items()
            .await
            .into_iter()
            .map(|i| i.name)
            .collect();
        assert_eq!(names, vec!["Eggs", "Bread", "Milk", "Rice"]);
    }

    #[tokio::test]
    async fn test_existing_catalog_not_overwritten() {
        let store = Arc::new(MemoryStore::new());
        let catalog = CatalogRepository::new(Arc::clone(&store));
        let coffee = Item::new("Coffee", "bag", 32.0);
        catalog.add_item(coffee.clone()).await;

        let outcome = coordinator(store).seed_if_empty().await;
        assert_eq!(outcome, SeedOutcome::Existing(vec![coffee.clone()]));
        assert_eq!(catalog.list_items().await, vec![coffee]);
    }

    #[tokio::test]
    async fn test_concurrent_calls_share_one_write() {
        let store = Arc::new(SlowStore::new());
        let seeder = coordinator(Arc::clone(&store));

        let outcomes = join_all((0..8).map(|_| seeder.seed_if_empty())).await;

        assert_eq!(store.reads(), 1);
        assert_eq!(store.writes(), 1);
        assert!(outcomes.iter().all(|o| o.was_seeded()));
        assert!(outcomes.iter().all(|o| o == &outcomes[0]));

        let catalog = CatalogRepository::new(store);
        assert_eq!(catalog.list_items().await.len(), 4);
    }

    #[tokio::test]
    async fn test_slot_cleared_after_settling() {
        let store = Arc::new(SlowStore::new());
        let seeder = coordinator(Arc::clone(&store));

        assert!(seeder.seed_if_empty().await.was_seeded());

        let second = seeder.seed_if_empty().await;
        assert!(matches!(second, SeedOutcome::Existing(ref items) if items.len() == 4));
        assert_eq!(store.reads(), 2);
        assert_eq!(store.writes(), 1);
    }

    #[tokio::test]
    async fn test_read_failure_does_not_write() {
        let seeder = coordinator(Arc::new(FailingStore::reads()));
        let outcome = seeder.seed_if_empty().await;
        assert_eq!(outcome, SeedOutcome::Failed);
        assert!(outcome.items().is_empty());

        // The failed attempt does not block later attempts.
        assert_eq!(seeder.seed_if_empty().await, SeedOutcome::Failed);
    }

    #[tokio::test]
    async fn test_write_failure_reported() {
        let seeder = coordinator(Arc::new(FailingStore::writes(MemoryStore::new())));
        assert_eq!(seeder.seed_if_empty().await, SeedOutcome::Failed);
    }

    #[tokio::test]
    async fn test_corrupt_catalog_is_reseeded() {
        let store = Arc::new(MemoryStore::with_value("items_db", "not json"));
        let outcome = coordinator(store).seed_if_empty().await;
        assert!(outcome.was_seeded());
    }

    #[tokio::test]
    async fn test_custom_defaults() {
        let store = Arc::new(MemoryStore::new());
        let tea = Item::new("Tea", "box", 8.0).with_id("tea");
        let seeder =
            SeedCoordinator::with_defaults(CatalogRepository::new(store), vec![tea.clone()]);

        assert_eq!(seeder.seed_if_empty().await.into_items(), vec![tea]);
    }
}
