//! File-backed key-value store.
//!
//! Each key is stored as `<data_dir>/<key>.json`:
//! ```text
//! ~/.local/share/grocer/
//! ├── items_db.json
//! └── shopping_lists.json
//! ```

use async_trait::async_trait;
use std::io;
use std::path::PathBuf;
use tokio::fs;
use uuid::Uuid;

use super::{KeyValueStore, StoreError};

/// File extension for stored values.
const VALUE_EXTENSION: &str = "json";

/// Durable key-value store that keeps one file per key.
#[derive(Debug, Clone)]
pub struct FileStore {
    data_dir: PathBuf,
}

impl FileStore {
    /// Creates a store rooted at `data_dir`. The directory is created on first write.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Returns the data directory path.
    pub fn data_dir(&self) -> &PathBuf {
        &self.data_dir
    }

    /// Rejects keys that could escape the data directory.
    fn validate_key(key: &str) -> Result<(), StoreError> {
        if key.is_empty()
            || key.contains('/')
            || key.contains('\\')
            || key.contains("..")
            || key.starts_with('.')
        {
            return Err(StoreError::InvalidKey(key.to_string()));
        }
        Ok(())
    }

    /// Returns the full path for a key.
    pub fn path(&self, key: &str) -> PathBuf {
        self.data_dir.join(format!("{}.{}", key, VALUE_EXTENSION))
    }

    fn temp_path(&self, key: &str) -> PathBuf {
        self.data_dir
            .join(format!("{}.{}.{}.tmp", key, VALUE_EXTENSION, Uuid::new_v4()))
    }
}

#[async_trait]
impl KeyValueStore for FileStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Self::validate_key(key)?;
        let path = self.path(key);

        match fs::read_to_string(&path).await {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StoreError::Io(path, e)),
        }
    }

    async fn set(&self, key: &str, value: String) -> Result<(), StoreError> {
        Self::validate_key(key)?;

        fs::create_dir_all(&self.data_dir)
            .await
            .map_err(|e| StoreError::Io(self.data_dir.clone(), e))?;

        let path = self.path(key);

        // Write atomically using temp file + rename. Each write gets its own
        // temp file so concurrent writers to one key never share it.
        let temp_path = self.temp_path(key);
        if let Err(e) = fs::write(&temp_path, value.as_bytes()).await {
            let _ = fs::remove_file(&temp_path).await;
            return Err(StoreError::Io(temp_path, e));
        }
        if let Err(e) = fs::rename(&temp_path, &path).await {
            let _ = fs::remove_file(&temp_path).await;
            return Err(StoreError::Io(path, e));
        }

        tracing::debug!("Wrote {} bytes to {}", value.len(), path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn test_store() -> (FileStore, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let store = FileStore::new(temp_dir.path().to_path_buf());
        (store, temp_dir)
    }

    #[test]
    fn test_store_path() {
        let (store, _temp) = test_store();
        assert!(store.path("items_db").ends_with("items_db.json"));
    }

    #[tokio::test]
    async fn test_get_missing_key_returns_none() {
        let (store, _temp) = test_store();
        assert!(store.get("items_db").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_set_then_get() {
        let (store, _temp) = test_store();
        store.set("items_db", "[]".to_string()).await.unwrap();
        assert_eq!(store.get("items_db").await.unwrap().as_deref(), Some("[]"));
    }

    #[tokio::test]
    async fn test_set_creates_directory() {
        let temp_dir = TempDir::new().unwrap();
        let nested = temp_dir.path().join("nested").join("data");
        let store = FileStore::new(nested.clone());

        store.set("items_db", "[]".to_string()).await.unwrap();

        assert!(nested.exists());
        assert!(store.path("items_db").exists());
        assert_eq!(std::fs::read_dir(&nested).unwrap().count(), 1);
    }

    #[tokio::test]
    async fn test_overwrite_replaces_value() {
        let (store, _temp) = test_store();
        store.set("shopping_lists", "[1]".to_string()).await.unwrap();
        store.set("shopping_lists", "[2]".to_string()).await.unwrap();
        assert_eq!(
            store.get("shopping_lists").await.unwrap().as_deref(),
            Some("[2]")
        );
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_writes_all_succeed() {
        let (store, temp) = test_store();
        let first = r#"[{"writer":"first"}]"#.to_string();
        let second = r#"[{"writer":"second"}]"#.to_string();

        for _ in 0..100 {
            let (a, b) = tokio::join!(
                store.set("items_db", first.clone()),
                store.set("items_db", second.clone())
            );
            a.unwrap();
            b.unwrap();

            let stored = store.get("items_db").await.unwrap().unwrap();
            assert!(stored == first || stored == second, "got {:?}", stored);
        }

        // No temp files are left behind.
        assert_eq!(std::fs::read_dir(temp.path()).unwrap().count(), 1);
    }

    #[tokio::test]
    async fn test_keys_are_independent() {
        let (store, _temp) = test_store();
        store.set("items_db", "a".to_string()).await.unwrap();
        assert!(store.get("shopping_lists").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_invalid_keys_rejected() {
        let (store, _temp) = test_store();
        for key in ["", "../escape", "a/b", "a\\b", ".hidden"] {
            let err = store.get(key).await.unwrap_err();
            assert!(matches!(err, StoreError::InvalidKey(_)), "key {:?}", key);
            let err = store.set(key, String::new()).await.unwrap_err();
            assert!(matches!(err, StoreError::InvalidKey(_)), "key {:?}", key);
        }
    }

    #[tokio::test]
    async fn test_read_error_is_reported() {
        let (store, _temp) = test_store();
        // A directory where the file should be makes the read fail with a non-NotFound error.
        std::fs::create_dir_all(store.path("items_db")).unwrap();
        let err = store.get("items_db").await.unwrap_err();
        assert!(matches!(err, StoreError::Io(_, _)));
    }
}
