//! On-device key-value storage backends

use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use tokio::sync::RwLock;
use tracing::debug;

use crate::error::Error;

/// Async string key-value store, the equivalent of the device's local storage
#[async_trait]
pub trait KeyValueStorage: Send + Sync {
    /// Read a value, `Ok(None)` if the key is absent
    async fn get_item(&self, key: &str) -> Result<Option<String>, Error>;

    /// Store a value, overwriting any previous one
    async fn set_item(&self, key: &str, value: &str) -> Result<(), Error>;

    /// Remove a value, absent keys are not an error
    async fn remove_item(&self, key: &str) -> Result<(), Error>;
}

/// Storage kept in process memory
#[derive(Debug, Default)]
pub struct MemoryStorage {
    items: RwLock<HashMap<String, String>>,
}

impl MemoryStorage {
    /// Create an empty MemoryStorage
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KeyValueStorage for MemoryStorage {
    async fn get_item(&self, key: &str) -> Result<Option<String>, Error> {
        Ok(self.items.read().await.get(key).cloned())
    }

    async fn set_item(&self, key: &str, value: &str) -> Result<(), Error> {
        self.items
            .write()
            .await
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove_item(&self, key: &str) -> Result<(), Error> {
        self.items.write().await.remove(key);
        Ok(())
    }
}

/// Storage keeping one file per key inside a directory
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    /// Create a FileStorage rooted at `dir`, created lazily on first write
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    /// File holding `key`, named by the key in URL-safe base64
    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", URL_SAFE_NO_PAD.encode(key)))
    }
}

#[async_trait]
impl KeyValueStorage for FileStorage {
    async fn get_item(&self, key: &str) -> Result<Option<String>, Error> {
        match tokio::fs::read_to_string(self.path_for(key)).await {
            Ok(value) => Ok(Some(value)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(Error::storage(format!("failed to read {key}: {err}"))),
        }
    }

    async fn set_item(&self, key: &str, value: &str) -> Result<(), Error> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| Error::storage(format!("failed to create {}: {e}", self.dir.display())))?;

        let path = self.path_for(key);
        tokio::fs::write(&path, value)
            .await
            .map_err(|e| Error::storage(format!("failed to write {key}: {e}")))?;
        debug!(path = %path.display(), "stored item");
        Ok(())
    }

    async fn remove_item(&self, key: &str) -> Result<(), Error> {
        match tokio::fs::remove_file(self.path_for(key)).await {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(Error::storage(format!("failed to remove {key}: {err}"))),
        }
    }
}
