//! File-backed persistence for per-user resume documents and side files.
//!
//! Layout: `<data_dir>/<user>/resume_data.json`, plus any per-user JSON files
//! other modules keep next to it. Writes go to a temp file and are renamed
//! into place, so readers never observe a half-written document.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;
use tokio::sync::{Mutex, MutexGuard};
use tracing::{debug, info};

use crate::models::resume::ResumeDocument;

pub const RESUME_FILE: &str = "resume_data.json";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Invalid user name: {0:?}")]
    InvalidUser(String),

    #[error("No {file} found for user '{user}'")]
    NotFound { user: String, file: String },

    #[error("{file} for user '{user}' is malformed: {source}")]
    Malformed {
        user: String,
        file: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to serialize {file}: {source}")]
    Serialize {
        file: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Sanitizes a user name: spaces become `_`, anything but alphanumerics and
/// `_` is dropped. Returns `None` if nothing is left.
pub fn sanitize_user_name(raw: &str) -> Option<String> {
    let name: String = raw
        .trim()
        .replace(' ', "_")
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == '_')
        .collect();
    (!name.is_empty()).then_some(name)
}

#[derive(Debug, Clone)]
pub struct ResumeStore {
    data_dir: PathBuf,
    write_lock: Arc<Mutex<()>>,
}

impl ResumeStore {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Serializes read-modify-write sequences on per-user files.
    pub async fn write_lock(&self) -> MutexGuard<'_, ()> {
        self.write_lock.lock().await
    }

    /// Loads a user's resume document. Legacy shapes are normalized on the way in.
    pub async fn load(&self, user: &str) -> Result<ResumeDocument, StoreError> {
        self.read_user_file(user, RESUME_FILE)
            .await?
            .ok_or_else(|| StoreError::NotFound {
                user: user.to_string(),
                file: RESUME_FILE.to_string(),
            })
    }

    pub async fn save(&self, user: &str, doc: &ResumeDocument) -> Result<(), StoreError> {
        self.write_user_file(user, RESUME_FILE, doc).await?;
        info!("Saved resume document for user {user}");
        Ok(())
    }

    /// Reads and parses a per-user JSON file; `Ok(None)` if it does not exist.
    pub async fn read_user_file<T: DeserializeOwned>(
        &self,
        user: &str,
        file: &str,
    ) -> Result<Option<T>, StoreError> {
        let path = self.user_dir(user)?.join(file);
        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        debug!("Read {} ({} bytes)", path.display(), bytes.len());

        serde_json::from_slice(&bytes)
            .map(Some)
            .map_err(|source| StoreError::Malformed {
                user: user.to_string(),
                file: file.to_string(),
                source,
            })
    }

    /// Atomically replaces a per-user JSON file.
    pub async fn write_user_file<T: Serialize>(
        &self,
        user: &str,
        file: &str,
        value: &T,
    ) -> Result<(), StoreError> {
        let dir = self.user_dir(user)?;
        tokio::fs::create_dir_all(&dir).await?;

        let body = serde_json::to_vec_pretty(value)
            .map_err(|source| StoreError::Serialize {
                file: file.to_string(),
                source,
            })?;
        let path = dir.join(file);
        let tmp = dir.join(format!(".{file}.tmp"));
        tokio::fs::write(&tmp, &body).await?;
        tokio::fs::rename(&tmp, &path).await?;
        Ok(())
    }

    fn user_dir(&self, user: &str) -> Result<PathBuf, StoreError> {
        let name =
            sanitize_user_name(user).ok_or_else(|| StoreError::InvalidUser(user.to_string()))?;
        Ok(self.data_dir.join(name))
    }
}
