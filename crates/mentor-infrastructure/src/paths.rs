//! Unified path management for mentor state files.
//!
//! All mentor configuration and persisted state live under a single
//! application directory inside the platform config dir, resolved via the
//! `dirs` crate. This ensures consistency across Linux, macOS and Windows.

use std::path::PathBuf;

/// Errors that can occur during path resolution.
#[derive(Debug)]
pub enum PathError {
    /// Platform config directory could not be determined.
    ConfigDirNotFound,
}

impl std::fmt::Display for PathError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathError::ConfigDirNotFound => write!(f, "Cannot find config directory"),
        }
    }
}

impl std::error::Error for PathError {}

/// Unified path management for mentor.
///
/// # Directory Structure
///
/// ```text
/// ~/.config/mentor/            # App directory (platform config dir)
/// ├── config.toml              # Backend configuration
/// ├── store.json               # Persisted chat/folder tree snapshot
/// └── preferences.json         # Persisted preference flags
/// ```
#[derive(Debug, Clone)]
pub struct MentorPaths {
    root: PathBuf,
}

impl MentorPaths {
    /// Resolves the default app directory for the platform.
    ///
    /// # Returns
    ///
    /// - `Ok(MentorPaths)`: rooted at e.g. `~/.config/mentor/`
    /// - `Err(PathError::ConfigDirNotFound)`: no config dir on this system
    pub fn new() -> Result<Self, PathError> {
        let base = dirs::config_dir().ok_or(PathError::ConfigDirNotFound)?;
        Ok(Self {
            root: base.join("mentor"),
        })
    }

    /// Creates paths rooted at an explicit directory.
    ///
    /// Used by tests and by callers that manage their own state directory.
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Returns the app directory itself.
    pub fn root(&self) -> &PathBuf {
        &self.root
    }

    /// Returns the path to the main configuration file.
    pub fn config_file(&self) -> PathBuf {
        self.root.join("config.toml")
    }

    /// Returns the path to the persisted chat/folder tree snapshot.
    pub fn store_file(&self) -> PathBuf {
        self.root.join("store.json")
    }

    /// Returns the path to the persisted preference flags.
    pub fn preferences_file(&self) -> PathBuf {
        self.root.join("preferences.json")
    }
}
