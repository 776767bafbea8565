//! Blob storage for uploaded media.

use std::path::PathBuf;
use std::sync::Arc;

use crate::{AppError, AppResult};

/// Storage backend trait.
#[async_trait::async_trait]
pub trait StorageBackend: Send + Sync {
    /// Write a blob under `key`, replacing any existing one.
    async fn save(&self, key: &str, data: &[u8]) -> AppResult<()>;

    /// Delete the blob under `key`. Missing blobs are an error.
    async fn delete(&self, key: &str) -> AppResult<()>;

    /// Check if a blob exists.
    async fn exists(&self, key: &str) -> AppResult<bool>;

    /// Path the blob is served under, relative to the site root.
    fn public_path(&self, key: &str) -> String;
}

/// Shared handle to the configured backend.
pub type StorageService = Arc<dyn StorageBackend>;

/// Local filesystem storage backend.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    base_path: PathBuf,
    public_root: String,
}

impl LocalStorage {
    /// Create a new local storage backend.
    #[must_use]
    pub const fn new(base_path: PathBuf, public_root: String) -> Self {
        Self {
            base_path,
            public_root,
        }
    }

    /// Keys are flat file names; anything that could escape the base directory is refused.
    fn resolve(&self, key: &str) -> AppResult<PathBuf> {
        if key.is_empty() || key.contains('/') || key.contains('\\') || key.starts_with('.') {
            return Err(AppError::Storage(format!("Invalid storage key: {key}")));
        }
        Ok(self.base_path.join(key))
    }
}

#[async_trait::async_trait]
impl StorageBackend for LocalStorage {
    async fn save(&self, key: &str, data: &[u8]) -> AppResult<()> {
        let path = self.resolve(key)?;

        tokio::fs::create_dir_all(&self.base_path)
            .await
            .map_err(|e| AppError::Storage(format!("Failed to create directory: {e}")))?;

        tokio::fs::write(&path, data)
            .await
            .map_err(|e| AppError::Storage(format!("Failed to write file {key}: {e}")))
    }

    async fn delete(&self, key: &str) -> AppResult<()> {
        let path = self.resolve(key)?;
        tokio::fs::remove_file(&path)
            .await
            .map_err(|e| AppError::Storage(format!("Failed to delete file {key}: {e}")))
    }

    async fn exists(&self, key: &str) -> AppResult<bool> {
        let path = self.resolve(key)?;
        tokio::fs::try_exists(&path)
            .await
            .map_err(|e| AppError::Storage(e.to_string()))
    }

    fn public_path(&self, key: &str) -> String {
        format!("{}/{}", self.public_root.trim_end_matches('/'), key)
    }
}
