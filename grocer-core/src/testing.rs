//! Store wrappers for tests.

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::storage::{KeyValueStore, MemoryStore, StoreError};

/// Store whose reads and/or writes always fail.
pub struct FailingStore {
    inner: MemoryStore,
    fail_reads: bool,
    fail_writes: bool,
}

impl FailingStore {
    /// Every read fails (and so every read-modify-write does too).
    pub fn reads() -> Self {
        Self {
            inner: MemoryStore::new(),
            fail_reads: true,
            fail_writes: false,
        }
    }

    /// Reads are served from `inner`; every write fails.
    pub fn writes(inner: MemoryStore) -> Self {
        Self {
            inner,
            fail_reads: false,
            fail_writes: true,
        }
    }
}

#[async_trait]
impl KeyValueStore for FailingStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        if self.fail_reads {
            return Err(StoreError::Unavailable(format!("read of {} refused", key)));
        }
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, value: String) -> Result<(), StoreError> {
        if self.fail_writes {
            return Err(StoreError::Unavailable(format!("write of {} refused", key)));
        }
        self.inner.set(key, value).await
    }
}

/// Store that yields to the scheduler on every call and counts calls,
/// so concurrent operations interleave at each I/O boundary.
#[derive(Default)]
pub struct SlowStore {
    inner: MemoryStore,
    reads: AtomicUsize,
    writes: AtomicUsize,
}

impl SlowStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl KeyValueStore for SlowStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        tokio::task::yield_now().await;
        self.reads.fetch_add(1, Ordering::SeqCst);
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, value: String) -> Result<(), StoreError> {
        tokio::task::yield_now().await;
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.inner.set(key, value).await
    }
}
