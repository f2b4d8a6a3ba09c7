//! Configuration management for lexid.
//!
//! Loads configuration from ${LEXID_HOME}/config.toml with sensible defaults.

use std::fs;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Default config template with comments, embedded at compile time.
const DEFAULT_CONFIG_TEMPLATE: &str = include_str!("default_config.toml");

pub mod paths {
    //! Path resolution for lexid configuration and session storage.
    //!
    //! LEXID_HOME resolution order:
    //! 1. LEXID_HOME environment variable (if set)
    //! 2. ~/.config/lexid (default)

    use std::path::PathBuf;

    /// Returns the lexid home directory.
    ///
    /// Checks LEXID_HOME env var first, falls back to ~/.config/lexid
    pub fn lexid_home() -> PathBuf {
        if let Ok(home) = std::env::var("LEXID_HOME") {
            return PathBuf::from(home);
        }

        dirs::home_dir()
            .map(|h| h.join(".config").join("lexid"))
            .expect("Could not determine home directory")
    }

    /// Returns the path to the config.toml file.
    pub fn config_path() -> PathBuf {
        lexid_home().join("config.toml")
    }

    /// Returns the path to the stored session credentials.
    pub fn session_path() -> PathBuf {
        lexid_home().join("session.json")
    }
}

/// Main configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Platform API base URL (empty string means the built-in default)
    pub api_base_url: Option<String>,

    /// Timeout for API requests in seconds (0 disables)
    pub request_timeout_secs: u32,

    /// Route to land on after login when no return location was recorded
    pub default_landing: String,
}

impl Config {
    const DEFAULT_REQUEST_TIMEOUT_SECS: u32 = 30;
    const DEFAULT_LANDING: &str = "/home";

    /// Loads configuration from the default config path.
    pub fn load() -> Result<Self> {
        Self::load_from(&paths::config_path())
    }

    /// Loads configuration from a specific path.
    /// Returns defaults if file doesn't exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config from {}", path.display()))?;
            toml::from_str(&contents)
                .with_context(|| format!("Failed to parse config from {}", path.display()))
        } else {
            Ok(Config::default())
        }
    }

    /// Returns the effective API base URL.
    ///
    /// Resolution order: LEXID_API_BASE_URL env var, config file, built-in
    /// default. Empty strings are treated as unset.
    pub fn effective_api_base_url(&self) -> String {
        if let Ok(url) = std::env::var("LEXID_API_BASE_URL")
            && !url.trim().is_empty()
        {
            return url;
        }

        self.api_base_url
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map_or_else(|| crate::api::DEFAULT_BASE_URL.to_string(), String::from)
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        if self.request_timeout_secs == 0 {
            None
        } else {
            Some(Duration::from_secs(u64::from(self.request_timeout_secs)))
        }
    }

    /// Creates a default config file at the given path.
    /// Returns an error if the file already exists.
    pub fn init(path: &Path) -> Result<()> {
        if path.exists() {
            anyhow::bail!("Config file already exists at {}", path.display());
        }

        Self::write_config(path, DEFAULT_CONFIG_TEMPLATE)
    }

    /// Writes config content to a file, creating parent directories as needed.
    /// Uses atomic write (temp file + rename) to prevent corruption.
    fn write_config(path: &Path, content: &str) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }

        let tmp_path = path.with_extension("toml.tmp");
        fs::write(&tmp_path, content)
            .with_context(|| format!("Failed to write config to {}", tmp_path.display()))?;
        fs::rename(&tmp_path, path).with_context(|| {
            format!(
                "Failed to rename {} to {}",
                tmp_path.display(),
                path.display()
            )
        })?;

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: None,
            request_timeout_secs: Self::DEFAULT_REQUEST_TIMEOUT_SECS,
            default_landing: Self::DEFAULT_LANDING.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::tempdir;

    use super::*;

    /// Config loading: missing file returns defaults.
    #[test]
    fn test_load_missing_file_returns_defaults() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("nonexistent.toml");

        let config = Config::load_from(&config_path).unwrap();
        assert_eq!(config.api_base_url, None);
        assert_eq!(config.request_timeout_secs, 30);
        assert_eq!(config.default_landing, "/home");
    }

    /// Config loading: partial config merges with defaults.
    #[test]
    fn test_load_partial_config_merges_defaults() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("config.toml");

        fs::write(&config_path, "default_landing = \"/dashboard\"\n").unwrap();

        let config = Config::load_from(&config_path).unwrap();
        assert_eq!(config.default_landing, "/dashboard");
        assert_eq!(config.request_timeout_secs, 30); // default preserved
    }

    /// Config init: creates file with defaults, creates parent dirs.
    #[test]
    fn test_init_creates_config_with_defaults() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("subdir").join("config.toml");

        Config::init(&config_path).unwrap();

        assert!(config_path.exists());
        let contents = fs::read_to_string(&config_path).unwrap();
        assert!(contents.contains("api_base_url"));
        assert!(contents.contains("request_timeout_secs"));
    }

    /// Config init: fails if file exists (no silent overwrite).
    #[test]
    fn test_init_fails_if_exists() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("config.toml");

        fs::write(&config_path, "").unwrap();

        let result = Config::init(&config_path);
        assert!(result.is_err());
    }

    /// Base URL: config value wins over the built-in default.
    #[test]
    fn test_api_base_url_from_config() {
        let config = Config {
            api_base_url: Some("https://staging.lexid.app".to_string()),
            ..Default::default()
        };
        assert_eq!(config.effective_api_base_url(), "https://staging.lexid.app");
    }

    /// Base URL: empty/whitespace treated as unset.
    #[test]
    fn test_api_base_url_empty_is_default() {
        let config = Config {
            api_base_url: Some("   ".to_string()),
            ..Default::default()
        };
        assert_eq!(config.effective_api_base_url(), crate::api::DEFAULT_BASE_URL);
    }

    /// Timeout: zero disables timeout.
    #[test]
    fn test_request_timeout_zero_disables() {
        let config = Config {
            request_timeout_secs: 0,
            ..Default::default()
        };
        assert_eq!(config.request_timeout(), None);
    }
}
