//! Preferences use case implementation.
//!
//! Caches the persisted preference flags in memory to avoid repeated file
//! reads, writing through on every change.

use std::sync::Arc;

use tokio::sync::RwLock;

use mentor_core::prefs::{Preferences, PreferencesRepository};
use mentor_core::Result;

/// Use case for the persisted preference flags.
pub struct PreferencesUseCase {
    /// Cached preferences loaded from storage.
    prefs: RwLock<Preferences>,
    /// Repository for persistence.
    repository: Arc<dyn PreferencesRepository>,
}

impl PreferencesUseCase {
    /// Creates a use case with default preferences. Call [`Self::hydrate`]
    /// to load the persisted flags.
    pub fn new(repository: Arc<dyn PreferencesRepository>) -> Self {
        Self {
            prefs: RwLock::new(Preferences::default()),
            repository,
        }
    }

    /// Loads the persisted preferences, falling back to defaults.
    pub async fn hydrate(&self) -> Result<()> {
        let loaded = self.repository.load().await?.unwrap_or_default();
        *self.prefs.write().await = loaded;
        Ok(())
    }

    /// Returns whether dark mode is active.
    pub async fn dark_mode(&self) -> bool {
        self.prefs.read().await.dark_mode
    }

    /// Sets the dark mode flag and persists.
    pub async fn set_dark_mode(&self, dark_mode: bool) -> Result<()> {
        let snapshot = {
            let mut prefs = self.prefs.write().await;
            prefs.dark_mode = dark_mode;
            prefs.clone()
        };
        self.repository.save(&snapshot).await
    }

    /// Flips the dark mode flag, persists, and returns the new value.
    pub async fn toggle_dark_mode(&self) -> Result<bool> {
        let (value, snapshot) = {
            let mut prefs = self.prefs.write().await;
            let value = prefs.toggle_dark_mode();
            (value, prefs.clone())
        };
        self.repository.save(&snapshot).await?;
        Ok(value)
    }
}
