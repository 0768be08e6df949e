//! Durable token storage.

use crate::error::{ClientError, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::debug;

/// Backing store for the auth token.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TokenStorage: Send + Sync {
    /// Read the stored token, if any.
    async fn load(&self) -> Result<Option<String>>;

    /// Replace the stored token.
    async fn save(&self, token: &str) -> Result<()>;

    /// Remove the stored token. Removing a missing token is not an error.
    async fn delete(&self) -> Result<()>;
}

#[derive(Debug, Serialize, Deserialize)]
struct TokenDocument {
    jwt_token: Option<String>,
}

/// Token kept in a small JSON file.
#[derive(Debug, Clone)]
pub struct FileTokenStorage {
    path: PathBuf,
}

impl FileTokenStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn storage_error(path: &Path, e: impl std::fmt::Display) -> ClientError {
    ClientError::Storage(format!("{}: {}", path.display(), e))
}

#[async_trait]
impl TokenStorage for FileTokenStorage {
    async fn load(&self) -> Result<Option<String>> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(storage_error(&self.path, e)),
        };

        let doc: TokenDocument =
            serde_json::from_slice(&bytes).map_err(|e| storage_error(&self.path, e))?;

        Ok(doc.jwt_token.filter(|t| !t.is_empty()))
    }

    async fn save(&self, token: &str) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| storage_error(parent, e))?;
        }

        let doc = TokenDocument {
            jwt_token: Some(token.to_string()),
        };
        let json = serde_json::to_vec(&doc).map_err(|e| storage_error(&self.path, e))?;

        tokio::fs::write(&self.path, json)
            .await
            .map_err(|e| storage_error(&self.path, e))?;

        debug!(path = %self.path.display(), "Token saved");
        Ok(())
    }

    async fn delete(&self) -> Result<()> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(storage_error(&self.path, e)),
        }
    }
}

/// In-memory token storage for tests and throwaway sessions.
#[derive(Debug, Default)]
pub struct MemoryTokenStorage {
    token: Mutex<Option<String>>,
}

impl MemoryTokenStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Storage that already holds a token.
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: Mutex::new(Some(token.into())),
        }
    }

    fn slot(&self) -> std::sync::MutexGuard<'_, Option<String>> {
        self.token.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl TokenStorage for MemoryTokenStorage {
    async fn load(&self) -> Result<Option<String>> {
        Ok(self.slot().clone())
    }

    async fn save(&self, token: &str) -> Result<()> {
        *self.slot() = Some(token.to_string());
        Ok(())
    }

    async fn delete(&self) -> Result<()> {
        *self.slot() = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn file_storage_round_trips_token() {
        let dir = TempDir::new().unwrap();
        let storage = FileTokenStorage::new(dir.path().join("nested").join("session.json"));

        assert_eq!(storage.load().await.unwrap(), None);

        storage.save("abc.def").await.unwrap();
        assert_eq!(storage.load().await.unwrap().as_deref(), Some("abc.def"));

        let raw = std::fs::read_to_string(storage.path()).unwrap();
        assert!(raw.contains("\"jwt_token\""));

        storage.delete().await.unwrap();
        assert_eq!(storage.load().await.unwrap(), None);
        storage.delete().await.unwrap();
    }

    #[tokio::test]
    async fn corrupt_file_is_a_storage_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(&path, b"not json").unwrap();

        let result = FileTokenStorage::new(&path).load().await;
        assert!(matches!(result, Err(ClientError::Storage(_))));
    }

    #[tokio::test]
    async fn memory_storage() {
        let storage = MemoryTokenStorage::with_token("t1");
        assert_eq!(storage.load().await.unwrap().as_deref(), Some("t1"));
        storage.delete().await.unwrap();
        assert_eq!(storage.load().await.unwrap(), None);
    }
}
