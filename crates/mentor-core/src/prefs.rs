//! User preference state.
//!
//! Contains the small preference flags that persist across restarts,
//! separate from the chat/folder tree.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Preferences that persist across restarts.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct Preferences {
    /// Whether the dark color scheme is active.
    #[serde(default)]
    pub dark_mode: bool,
}

impl Preferences {
    /// Creates preferences with all defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Flips the dark mode flag and returns the new value.
    pub fn toggle_dark_mode(&mut self) -> bool {
        self.dark_mode = !self.dark_mode;
        self.dark_mode
    }
}

/// An abstract repository for persisted preferences.
#[async_trait]
pub trait PreferencesRepository: Send + Sync {
    /// Loads the persisted preferences.
    ///
    /// Returns `Ok(None)` when nothing is persisted yet or the payload is
    /// unreadable; startup falls back to defaults either way.
    async fn load(&self) -> Result<Option<Preferences>>;

    /// Persists the preferences, replacing any previous value.
    async fn save(&self, prefs: &Preferences) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_light() {
        assert!(!Preferences::new().dark_mode);
    }

    #[test]
    fn test_toggle_dark_mode() {
        let mut prefs = Preferences::new();
        assert!(prefs.toggle_dark_mode());
        assert!(prefs.dark_mode);
        assert!(!prefs.toggle_dark_mode());
    }
}
