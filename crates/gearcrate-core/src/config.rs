//! Configuration management for GearCrate.
//!
//! This module provides configuration loading, saving, and defaults.
//! Configuration is stored in TOML format in a platform-appropriate location.

use crate::error::{GearCrateError, Result};
use crate::search::SearchLimit;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, info};

/// Main configuration structure for GearCrate.
///
/// ## Example Configuration File (gearcrate.toml)
///
/// ```toml
/// [general]
/// log_level = "info"
///
/// [api]
/// transport = "http"
/// base_url = "http://127.0.0.1:8080"
/// timeout_secs = 10
///
/// [catalog]
/// data_file = "/home/me/.local/share/gearcrate/inventory.json"
/// sets_file = "/home/me/.config/gearcrate/sets.toml"
///
/// [ui]
/// default_search_limit = 25
/// debounce_ms = 120
/// language = "de"
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// General settings
    pub general: GeneralConfig,

    /// Backend connection
    pub api: ApiConfig,

    /// Local data files
    pub catalog: CatalogConfig,

    /// UI settings
    pub ui: UiConfig,
}

/// General configuration options
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Data directory (None = platform default)
    pub data_dir: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        GeneralConfig {
            data_dir: None,
            log_level: "info".to_string(),
        }
    }
}

/// How the client reaches the item backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Transport {
    /// In-process backend over a local data file
    #[default]
    Local,
    /// Remote backend over HTTP
    Http,
}

impl fmt::Display for Transport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Transport::Local => write!(f, "local"),
            Transport::Http => write!(f, "http"),
        }
    }
}

impl FromStr for Transport {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "local" => Ok(Transport::Local),
            "http" => Ok(Transport::Http),
            _ => Err(format!("Unknown transport: {}", s)),
        }
    }
}

/// Backend connection settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Transport selected at startup
    pub transport: Transport,

    /// Base URL of the HTTP backend (without the `/api` suffix)
    pub base_url: String,

    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        ApiConfig {
            transport: Transport::Local,
            base_url: "http://127.0.0.1:8080".to_string(),
            timeout_secs: 10,
        }
    }
}

impl ApiConfig {
    /// Request timeout as a duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }
}

/// Local data file locations
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// Item database for the local transport (None = `<data_dir>/inventory.json`)
    pub data_file: Option<PathBuf>,

    /// Gear set definitions (None = `<config_dir>/sets.toml`)
    pub sets_file: Option<PathBuf>,
}

/// UI configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// Search limit used until the user picks one
    pub default_search_limit: SearchLimit,

    /// Delay before an as-you-type search runs
    pub debounce_ms: u64,

    /// Language override (de, en, fr, es)
    pub language: Option<String>,
}

impl Default for UiConfig {
    fn default() -> Self {
        UiConfig {
            default_search_limit: SearchLimit::DEFAULT,
            debounce_ms: 120,
            language: None,
        }
    }
}

impl UiConfig {
    /// Debounce delay as a duration
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

impl Config {
    /// Load configuration from the default location.
    ///
    /// Returns default config if no config file exists.
    pub fn load() -> Result<Self> {
        let config_path = Self::default_config_path()?;
        Self::load_from(&config_path)
    }

    /// Load configuration from a specific path.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!(path = %path.display(), "Config file not found, using defaults");
            return Ok(Config::default());
        }

        info!(path = %path.display(), "Loading configuration");
        let contents = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents).map_err(|e| GearCrateError::ConfigError {
            reason: format!("Failed to parse config: {}", e),
        })?;

        Ok(config)
    }

    /// Save configuration to a specific path.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        info!(path = %path.display(), "Saving configuration");
        let contents = toml::to_string_pretty(self).map_err(|e| GearCrateError::ConfigError {
            reason: format!("Failed to serialize config: {}", e),
        })?;

        fs::write(path, contents)?;
        Ok(())
    }

    fn project_dirs() -> Result<ProjectDirs> {
        ProjectDirs::from("", "", "gearcrate").ok_or_else(|| GearCrateError::ConfigError {
            reason: "Could not determine config directory".to_string(),
        })
    }

    /// Get the default configuration file path.
    pub fn default_config_path() -> Result<PathBuf> {
        Ok(Self::project_dirs()?.config_dir().join("gearcrate.toml"))
    }

    /// Get the data directory (from config or default).
    pub fn data_dir(&self) -> Result<PathBuf> {
        match self.general.data_dir {
            Some(ref path) => Ok(path.clone()),
            None => Ok(Self::project_dirs()?.data_dir().to_path_buf()),
        }
    }

    /// Item database used by the local transport.
    pub fn data_file(&self) -> Result<PathBuf> {
        match self.catalog.data_file {
            Some(ref path) => Ok(path.clone()),
            None => Ok(self.data_dir()?.join("inventory.json")),
        }
    }

    /// Gear set definition file.
    pub fn sets_file(&self) -> Result<PathBuf> {
        match self.catalog.sets_file {
            Some(ref path) => Ok(path.clone()),
            None => Ok(Self::project_dirs()?.config_dir().join("sets.toml")),
        }
    }

    /// File holding persisted UI preferences.
    pub fn preferences_file(&self) -> Result<PathBuf> {
        Ok(self.data_dir()?.join("preferences.json"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.api.transport, Transport::Local);
        assert_eq!(config.ui.default_search_limit.get(), 25);
        assert_eq!(config.ui.debounce(), Duration::from_millis(120));
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("test.toml");

        let mut config = Config::default();
        config.api.transport = Transport::Http;
        config.api.base_url = "http://localhost:9000".to_string();
        config.ui.default_search_limit = SearchLimit::new(50).unwrap();

        config.save_to(&config_path).unwrap();
        let loaded = Config::load_from(&config_path).unwrap();

        assert_eq!(loaded.api.transport, Transport::Http);
        assert_eq!(loaded.api.base_url, "http://localhost:9000");
        assert_eq!(loaded.ui.default_search_limit.get(), 50);
    }

    #[test]
    fn test_load_nonexistent() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("nonexistent.toml");

        let config = Config::load_from(&config_path).unwrap();
        assert_eq!(config.api.timeout_secs, 10);
    }

    #[test]
    fn test_partial_file_and_bad_limit() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("partial.toml");

        fs::write(&config_path, "[ui]\nlanguage = \"fr\"\n").unwrap();
        let config = Config::load_from(&config_path).unwrap();
        assert_eq!(config.ui.language.as_deref(), Some("fr"));
        assert_eq!(config.ui.debounce_ms, 120);

        fs::write(&config_path, "[ui]\ndefault_search_limit = 0\n").unwrap();
        assert!(Config::load_from(&config_path).is_err());
    }

    #[test]
    fn test_paths_follow_data_dir() {
        let temp_dir = TempDir::new().unwrap();
        let mut config = Config::default();
        config.general.data_dir = Some(temp_dir.path().to_path_buf());

        assert_eq!(config.data_file().unwrap(), temp_dir.path().join("inventory.json"));
        assert_eq!(
            config.preferences_file().unwrap(),
            temp_dir.path().join("preferences.json")
        );
    }
}
