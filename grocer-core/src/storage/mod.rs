//! Key-value storage for persisted collections.
//!
//! The core treats storage as an opaque async map from string keys to
//! string values. Two keys are fixed:
//!
//! ```text
//! items_db        -> JSON array of Item
//! shopping_lists  -> JSON array of ShoppingList
//! ```
//!
//! Every call may fail and there is no ordering or transactional guarantee
//! across keys.

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use async_trait::async_trait;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Storage keys with a fixed layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StorageKey {
    /// The catalog of priced items.
    ItemsDb,
    /// Saved shopping lists.
    ShoppingLists,
}

impl StorageKey {
    /// Returns the raw key string.
    pub fn as_str(&self) -> &'static str {
        match self {
            StorageKey::ItemsDb => "items_db",
            StorageKey::ShoppingLists => "shopping_lists",
        }
    }
}

impl std::fmt::Display for StorageKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Async get/set of string values by string key.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Reads the value stored under `key`. `Ok(None)` if the key is absent.
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Replaces the value stored under `key`.
    async fn set(&self, key: &str, value: String) -> Result<(), StoreError>;
}

/// Errors reported by storage adapters and collection codecs.
#[derive(Debug, Error)]
pub enum StoreError {
    /// I/O error reading or writing a file.
    #[error("I/O error for {}: {}", .0.display(), .1)]
    Io(PathBuf, #[source] io::Error),

    /// Key cannot be mapped onto the backing store.
    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    /// Stored value is not a valid serialized collection.
    #[error("Failed to decode value under '{key}': {source}")]
    Decode {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    /// Collection could not be serialized.
    #[error("Failed to encode value for '{key}': {source}")]
    Encode {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    /// Adapter-specific failure with no richer type.
    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

impl StoreError {
    /// Returns true for decode failures, which are treated like an absent key.
    pub fn is_decode(&self) -> bool {
        matches!(self, StoreError::Decode { .. })
    }
}
