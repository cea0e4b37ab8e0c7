//! Persistence of the session token and cookies between runs.

use crate::cookies::CookieRecord;
use crate::error::{RespeecherError, Result};
use async_trait::async_trait;
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;
use tracing::debug;

/// Storage key of the CSRF token.
pub const TOKEN_KEY: &str = "respeecher_token";

/// Storage key of the serialized session cookies.
pub const COOKIE_KEY: &str = "respeecher_savedCookies";

/// What a successful login leaves behind.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoredCredentials {
    pub token: Option<String>,
    pub cookies: Vec<CookieRecord>,
}

impl StoredCredentials {
    /// A session can only be resumed with both a token and cookies.
    pub fn is_resumable(&self) -> bool {
        self.token.as_deref().is_some_and(|t| !t.is_empty())
            && self.cookies.iter().any(|c| !c.is_expired())
    }
}

/// Backend holding the token and cookies.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    async fn load(&self) -> Result<StoredCredentials>;

    async fn save_token(&self, token: &str) -> Result<()>;

    async fn save_cookies(&self, cookies: &[CookieRecord]) -> Result<()>;

    async fn clear_token(&self) -> Result<()>;

    async fn clear_cookies(&self) -> Result<()>;
}

/// Keeps everything in memory; nothing survives the process.
#[derive(Debug, Default)]
pub struct MemoryCredentialStore {
    inner: Mutex<StoredCredentials>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_credentials(credentials: StoredCredentials) -> Self {
        Self {
            inner: Mutex::new(credentials),
        }
    }
}

#[async_trait]
impl CredentialStore for MemoryCredentialStore {
    async fn load(&self) -> Result<StoredCredentials> {
        Ok(self.inner.lock().await.clone())
    }

    async fn save_token(&self, token: &str) -> Result<()> {
        self.inner.lock().await.token = Some(token.to_string());
        Ok(())
    }

    async fn save_cookies(&self, cookies: &[CookieRecord]) -> Result<()> {
        self.inner.lock().await.cookies = cookies.to_vec();
        Ok(())
    }

    async fn clear_token(&self) -> Result<()> {
        self.inner.lock().await.token = None;
        Ok(())
    }

    async fn clear_cookies(&self) -> Result<()> {
        self.inner.lock().await.cookies.clear();
        Ok(())
    }
}

/// Stores both keys in a single JSON document on disk.
///
/// Writes are serialized through a lock so concurrent updates of the two
/// keys do not clobber each other.
#[derive(Debug)]
pub struct FileCredentialStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileCredentialStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_document(&self) -> Result<Map<String, Value>> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) if bytes.is_empty() => Ok(Map::new()),
            Ok(bytes) => serde_json::from_slice(&bytes).map_err(|e| {
                RespeecherError::Storage(format!(
                    "Failed to parse {}: {}",
                    self.path.display(),
                    e
                ))
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Map::new()),
            Err(e) => Err(storage_error(&self.path, &e)),
        }
    }

    async fn write_document(&self, document: &Map<String, Value>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent)
                    .await
                    .map_err(|e| storage_error(parent, &e))?;
            }
        }

        let bytes = serde_json::to_vec_pretty(document)
            .map_err(|e| RespeecherError::Storage(e.to_string()))?;
        tokio::fs::write(&self.path, bytes)
            .await
            .map_err(|e| storage_error(&self.path, &e))?;

        debug!(path = %self.path.display(), "Credentials written");
        Ok(())
    }

    async fn update<F>(&self, apply: F) -> Result<()>
    where
        F: FnOnce(&mut Map<String, Value>) -> Result<()> + Send,
    {
        let _guard = self.lock.lock().await;
        let mut document = self.read_document().await?;
        apply(&mut document)?;
        self.write_document(&document).await
    }
}

fn storage_error(path: &Path, e: &std::io::Error) -> RespeecherError {
    RespeecherError::Storage(format!("{}: {}", path.display(), e))
}

#[async_trait]
impl CredentialStore for FileCredentialStore {
    async fn load(&self) -> Result<StoredCredentials> {
        let _guard = self.lock.lock().await;
        let mut document = self.read_document().await?;

        let token = match document.remove(TOKEN_KEY) {
            Some(Value::String(token)) => Some(token),
            _ => None,
        };
        let cookies = match document.remove(COOKIE_KEY) {
            Some(value) => serde_json::from_value(value)
                .map_err(|e| RespeecherError::Storage(format!("Invalid cookies: {}", e)))?,
            None => Vec::new(),
        };

        Ok(StoredCredentials { token, cookies })
    }

    async fn save_token(&self, token: &str) -> Result<()> {
        let token = token.to_string();
        self.update(move |doc| {
            doc.insert(TOKEN_KEY.to_string(), Value::String(token));
            Ok(())
        })
        .await
    }

    async fn save_cookies(&self, cookies: &[CookieRecord]) -> Result<()> {
        let value =
            serde_json::to_value(cookies).map_err(|e| RespeecherError::Storage(e.to_string()))?;
        self.update(move |doc| {
            doc.insert(COOKIE_KEY.to_string(), value);
            Ok(())
        })
        .await
    }

    async fn clear_token(&self) -> Result<()> {
        self.update(|doc| {
            doc.remove(TOKEN_KEY);
            Ok(())
        })
        .await
    }

    async fn clear_cookies(&self) -> Result<()> {
        self.update(|doc| {
            doc.remove(COOKIE_KEY);
            Ok(())
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cookie() -> CookieRecord {
        CookieRecord {
            name: "sessionid".into(),
            value: "abc".into(),
            domain: Some("gateway.respeecher.com".into()),
            path: Some("/".into()),
            secure: true,
            http_only: true,
            expires_at: None,
        }
    }

    #[tokio::test]
    async fn test_file_store_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileCredentialStore::new(dir.path().join("nested/credentials.json"));

        assert_eq!(store.load().await.unwrap(), StoredCredentials::default());

        store.save_token("csrf").await.unwrap();
        store.save_cookies(&[cookie()]).await.unwrap();

        let loaded = store.load().await.unwrap();
        assert_eq!(loaded.token.as_deref(), Some("csrf"));
        assert_eq!(loaded.cookies, vec![cookie()]);
        assert!(loaded.is_resumable());

        store.clear_cookies().await.unwrap();
        let loaded = store.load().await.unwrap();
        assert_eq!(loaded.token.as_deref(), Some("csrf"));
        assert!(!loaded.is_resumable());
    }

    #[tokio::test]
    async fn test_file_store_uses_fixed_keys() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("credentials.json");
        let store = FileCredentialStore::new(&path);
        store.save_token("csrf").await.unwrap();
        store.save_cookies(&[cookie()]).await.unwrap();

        let raw: Value = serde_json::from_slice(&std::fs::read(&path).unwrap()).unwrap();
        assert_eq!(raw[TOKEN_KEY], "csrf");
        assert_eq!(raw[COOKIE_KEY][0]["name"], "sessionid");
    }

    #[tokio::test]
    async fn test_corrupt_file_is_storage_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("credentials.json");
        std::fs::write(&path, b"{not json").unwrap();

        let err = FileCredentialStore::new(&path).load().await.unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::Storage);
    }

    #[test]
    fn test_empty_token_is_not_resumable() {
        let credentials = StoredCredentials {
            token: Some(String::new()),
            cookies: vec![cookie()],
        };
        assert!(!credentials.is_resumable());
    }
}
