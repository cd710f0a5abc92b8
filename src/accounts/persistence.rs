//! Snapshot persistence for the account registry.
//!
//! The registry survives restarts through a string-keyed slot store. Stores
//! must tolerate absence (first run) and report failures without corrupting
//! in-memory state; the registry treats every persistence failure as
//! non-fatal and logs it.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::debug;

/// Error types for snapshot store operations
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Durable string-keyed slot store backing the account registry.
#[async_trait::async_trait]
pub trait SnapshotStore: Send + Sync {
    async fn save(&self, key: &str, value: &str) -> Result<(), StoreError>;
    /// Returns `None` when the slot has never been written.
    async fn load(&self, key: &str) -> Result<Option<String>, StoreError>;
    async fn remove(&self, key: &str) -> Result<(), StoreError>;
}

/// File-backed store mapping each key to `{dir}/{key}.json`.
pub struct FileSnapshotStore {
    dir: PathBuf,
}

impl FileSnapshotStore {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    fn slot_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

#[async_trait::async_trait]
impl SnapshotStore for FileSnapshotStore {
    async fn save(&self, key: &str, value: &str) -> Result<(), StoreError> {
        tokio::fs::create_dir_all(&self.dir).await?;
        tokio::fs::write(self.slot_path(key), value).await?;
        debug!("Saved snapshot slot {}", key);
        Ok(())
    }

    async fn load(&self, key: &str) -> Result<Option<String>, StoreError> {
        let path = self.slot_path(key);
        if !path.exists() {
            return Ok(None);
        }
        Ok(Some(tokio::fs::read_to_string(&path).await?))
    }

    async fn remove(&self, key: &str) -> Result<(), StoreError> {
        let path = self.slot_path(key);
        if path.exists() {
            tokio::fs::remove_file(&path).await?;
        }
        Ok(())
    }
}

/// In-memory store for ephemeral runs and tests.
#[derive(Clone, Default)]
pub struct MemorySnapshotStore {
    slots: Arc<Mutex<HashMap<String, String>>>,
}

impl MemorySnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl SnapshotStore for MemorySnapshotStore {
    async fn save(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.slots
            .lock()
            .await
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn load(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.slots.lock().await.get(key).cloned())
    }

    async fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.slots.lock().await.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;

    #[tokio::test]
    async fn file_store_roundtrips_slots() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let store = FileSnapshotStore::new(dir.path().join("state"));

        assert_eq!(store.load("accounts").await?, None);

        store.save("accounts", "[1,2,3]").await?;
        assert_eq!(store.load("accounts").await?.as_deref(), Some("[1,2,3]"));

        store.save("accounts", "[]").await?;
        assert_eq!(store.load("accounts").await?.as_deref(), Some("[]"));

        store.remove("accounts").await?;
        assert_eq!(store.load("accounts").await?, None);
        // Removing an absent slot is not an error.
        store.remove("accounts").await?;
        Ok(())
    }

    #[tokio::test]
    async fn memory_store_roundtrips_slots() -> Result<()> {
        let store = MemorySnapshotStore::new();
        store.save("selected_account", "3").await?;
        assert_eq!(
            store.load("selected_account").await?.as_deref(),
            Some("3")
        );
        store.remove("selected_account").await?;
        assert_eq!(store.load("selected_account").await?, None);
        Ok(())
    }
}
