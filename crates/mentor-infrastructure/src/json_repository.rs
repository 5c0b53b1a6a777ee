//! JSON-backed repository implementations.
//!
//! Both durable slots (the chat/folder tree and the preference flags) are
//! stored as JSON files under the app directory, written through on every
//! mutation. Per the startup policy, an unreadable payload is discarded
//! with a warning instead of failing the load.

use std::sync::Arc;

use async_trait::async_trait;

use mentor_core::chat::{ChatStore, StoreRepository};
use mentor_core::prefs::{Preferences, PreferencesRepository};
use mentor_core::{MentorError, Result};

use crate::atomic_json::{AtomicJsonError, AtomicJsonFile};
use crate::paths::MentorPaths;

impl From<AtomicJsonError> for MentorError {
    fn from(e: AtomicJsonError) -> Self {
        match e {
            AtomicJsonError::IoError(e) => MentorError::io(e.to_string()),
            AtomicJsonError::JsonError(e) => MentorError::serialization("JSON", e.to_string()),
            AtomicJsonError::LockError(msg) => MentorError::internal(msg),
        }
    }
}

/// File-backed repository for the chat/folder tree snapshot.
pub struct JsonStoreRepository {
    file: Arc<AtomicJsonFile<ChatStore>>,
}

impl JsonStoreRepository {
    /// Creates a repository at the standard store path.
    pub fn new(paths: &MentorPaths) -> Self {
        Self::at_path(paths.store_file())
    }

    /// Creates a repository at an explicit path. Used by tests.
    pub fn at_path(path: std::path::PathBuf) -> Self {
        Self {
            file: Arc::new(AtomicJsonFile::new(path)),
        }
    }
}

#[async_trait]
impl StoreRepository for JsonStoreRepository {
    async fn load(&self) -> Result<Option<ChatStore>> {
        let file = Arc::clone(&self.file);
        let loaded = tokio::task::spawn_blocking(move || file.load())
            .await
            .map_err(|e| MentorError::internal(format!("Failed to join task: {}", e)))?;

        match loaded {
            Ok(snapshot) => Ok(snapshot),
            Err(AtomicJsonError::JsonError(e)) => {
                tracing::warn!("Discarding unreadable store snapshot: {}", e);
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn save(&self, store: &ChatStore) -> Result<()> {
        let file = Arc::clone(&self.file);
        let snapshot = store.clone();
        tokio::task::spawn_blocking(move || file.save(&snapshot))
            .await
            .map_err(|e| MentorError::internal(format!("Failed to join task: {}", e)))?
            .map_err(Into::into)
    }
}

/// File-backed repository for the preference flags.
pub struct JsonPreferencesRepository {
    file: Arc<AtomicJsonFile<Preferences>>,
}

impl JsonPreferencesRepository {
    /// Creates a repository at the standard preferences path.
    pub fn new(paths: &MentorPaths) -> Self {
        Self::at_path(paths.preferences_file())
    }

    /// Creates a repository at an explicit path. Used by tests.
    pub fn at_path(path: std::path::PathBuf) -> Self {
        Self {
            file: Arc::new(AtomicJsonFile::new(path)),
        }
    }
}

#[async_trait]
impl PreferencesRepository for JsonPreferencesRepository {
    async fn load(&self) -> Result<Option<Preferences>> {
        let file = Arc::clone(&self.file);
        let loaded = tokio::task::spawn_blocking(move || file.load())
            .await
            .map_err(|e| MentorError::internal(format!("Failed to join task: {}", e)))?;

        match loaded {
            Ok(prefs) => Ok(prefs),
            Err(AtomicJsonError::JsonError(e)) => {
                tracing::warn!("Discarding unreadable preferences: {}", e);
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn save(&self, prefs: &Preferences) -> Result<()> {
        let file = Arc::clone(&self.file);
        let prefs = prefs.clone();
        tokio::task::spawn_blocking(move || file.save(&prefs))
            .await
            .map_err(|e| MentorError::internal(format!("Failed to join task: {}", e)))?
            .map_err(Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_store_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let repo = JsonStoreRepository::at_path(temp_dir.path().join("store.json"));

        let mut store = ChatStore::new();
        let folder_id = store.create_folder("Physics").unwrap();
        let chat_id = store.create_chat(Some(folder_id));
        store.append_exchange(&chat_id, "hi", "hello");

        repo.save(&store).await.unwrap();
        let loaded = repo.load().await.unwrap().unwrap();
        assert_eq!(loaded, store);
    }

    #[tokio::test]
    async fn test_missing_store_loads_as_none() {
        let temp_dir = TempDir::new().unwrap();
        let repo = JsonStoreRepository::at_path(temp_dir.path().join("store.json"));
        assert!(repo.load().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_corrupt_store_falls_back_to_none() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("store.json");
        std::fs::write(&path, "{definitely not json").unwrap();

        let repo = JsonStoreRepository::at_path(path);
        assert!(repo.load().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_preferences_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let repo = JsonPreferencesRepository::at_path(temp_dir.path().join("preferences.json"));

        let prefs = Preferences { dark_mode: true };
        repo.save(&prefs).await.unwrap();
        assert_eq!(repo.load().await.unwrap(), Some(prefs));
    }

    #[tokio::test]
    async fn test_corrupt_preferences_fall_back_to_none() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("preferences.json");
        std::fs::write(&path, "]").unwrap();

        let repo = JsonPreferencesRepository::at_path(path);
        assert!(repo.load().await.unwrap().is_none());
    }
}
