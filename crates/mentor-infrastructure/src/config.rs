//! Application configuration.
//!
//! Mentor reads a small TOML file from the app directory. Every field has
//! a default, so a missing or malformed file never blocks startup; the
//! backend URL can also be overridden through the environment.

use serde::{Deserialize, Serialize};

use crate::paths::MentorPaths;

/// Default address of the remote chat backend.
pub const DEFAULT_BACKEND_URL: &str = "http://localhost:8000";

/// Environment variable overriding the backend URL.
pub const BACKEND_URL_ENV: &str = "MENTOR_BACKEND_URL";

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MentorConfig {
    /// Base URL of the remote chat backend.
    pub backend_url: String,
}

impl Default for MentorConfig {
    fn default() -> Self {
        Self {
            backend_url: DEFAULT_BACKEND_URL.to_string(),
        }
    }
}

impl MentorConfig {
    /// Loads configuration from the standard config file.
    ///
    /// Resolution order: `config.toml` if present and parseable, then
    /// defaults; the `MENTOR_BACKEND_URL` environment variable wins over
    /// both. A malformed file is logged and ignored.
    pub fn load(paths: &MentorPaths) -> Self {
        let mut config = match std::fs::read_to_string(paths.config_file()) {
            Ok(content) => match toml::from_str::<MentorConfig>(&content) {
                Ok(config) => config,
                Err(e) => {
                    tracing::warn!("Ignoring malformed config file: {}", e);
                    Self::default()
                }
            },
            Err(_) => Self::default(),
        };

        if let Ok(url) = std::env::var(BACKEND_URL_ENV) {
            if !url.trim().is_empty() {
                config.backend_url = url;
            }
        }

        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_yields_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let paths = MentorPaths::with_root(temp_dir.path());
        let config = MentorConfig::load(&paths);
        assert_eq!(config.backend_url, DEFAULT_BACKEND_URL);
    }

    #[test]
    fn test_file_overrides_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let paths = MentorPaths::with_root(temp_dir.path());
        std::fs::write(
            paths.config_file(),
            "backend_url = \"http://127.0.0.1:9001\"\n",
        )
        .unwrap();

        let config = MentorConfig::load(&paths);
        assert_eq!(config.backend_url, "http://127.0.0.1:9001");
    }

    #[test]
    fn test_malformed_file_yields_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let paths = MentorPaths::with_root(temp_dir.path());
        std::fs::write(paths.config_file(), "backend_url = [not toml").unwrap();

        let config = MentorConfig::load(&paths);
        assert_eq!(config.backend_url, DEFAULT_BACKEND_URL);
    }
}
