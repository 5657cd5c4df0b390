//! Persistence for the session token.

use crate::error::{ClientError, Result};
use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::sync::RwLock;
use tracing::debug;

/// Key (file name) the token is stored under.
pub const TOKEN_KEY: &str = "token";

/// Key-value storage for the session token.
///
/// Implementations must treat deleting an absent token as success.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TokenStore: Send + Sync {
    /// Read the stored token, if any.
    async fn load(&self) -> Result<Option<String>>;

    /// Replace the stored token.
    async fn save(&self, token: &str) -> Result<()>;

    /// Remove the stored token.
    async fn delete(&self) -> Result<()>;
}

/// In-memory store; nothing survives the process.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    token: RwLock<Option<String>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: RwLock::new(Some(token.into())),
        }
    }
}

#[async_trait]
impl TokenStore for MemoryTokenStore {
    async fn load(&self) -> Result<Option<String>> {
        Ok(self.token.read().await.clone())
    }

    async fn save(&self, token: &str) -> Result<()> {
        *self.token.write().await = Some(token.to_string());
        Ok(())
    }

    async fn delete(&self) -> Result<()> {
        *self.token.write().await = None;
        Ok(())
    }
}

/// Store keeping the token in a file named [`TOKEN_KEY`] inside a directory.
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    dir: PathBuf,
}

impl FileTokenStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path(&self) -> PathBuf {
        self.dir.join(TOKEN_KEY)
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

#[async_trait]
impl TokenStore for FileTokenStore {
    async fn load(&self) -> Result<Option<String>> {
        match tokio::fs::read_to_string(self.path()).await {
            Ok(contents) => {
                let token = contents.trim();
                Ok((!token.is_empty()).then(|| token.to_string()))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(ClientError::TokenStore(format!(
                "Failed to read {}: {}",
                self.path().display(),
                e
            ))),
        }
    }

    async fn save(&self, token: &str) -> Result<()> {
        tokio::fs::create_dir_all(&self.dir).await.map_err(|e| {
            ClientError::TokenStore(format!("Failed to create {}: {}", self.dir.display(), e))
        })?;

        tokio::fs::write(self.path(), token).await.map_err(|e| {
            ClientError::TokenStore(format!("Failed to write {}: {}", self.path().display(), e))
        })?;

        debug!(path = %self.path().display(), "Token saved");
        Ok(())
    }

    async fn delete(&self) -> Result<()> {
        match tokio::fs::remove_file(self.path()).await {
            Ok(()) => {
                debug!(path = %self.path().display(), "Token removed");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(ClientError::TokenStore(format!(
                "Failed to remove {}: {}",
                self.path().display(),
                e
            ))),
        }
    }
}
