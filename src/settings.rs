//! Application settings with persistence
//!
//! Settings are saved to `~/.config/gunsmith/settings.toml`

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use gunsmith_builder::BUILDS_STORAGE_KEY;
use gunsmith_integration::{ClientConfig, DEFAULT_ENDPOINT};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// All settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub api: ApiSettings,
    pub storage: StorageSettings,
    pub logging: LoggingSettings,
}

impl Settings {
    /// Get the config directory path
    fn config_dir() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("gunsmith"))
    }

    /// Load settings from the default location, or return defaults
    pub fn load() -> (Self, LoadStatus) {
        let Some(dir) = Self::config_dir() else {
            return (Self::default(), LoadStatus::NoConfigDir);
        };
        Self::load_from(&dir.join("settings.toml"))
    }

    /// Load settings from `path`, falling back to defaults when the file is
    /// missing or unreadable. Nothing is logged here; call
    /// [`LoadStatus::log`] once a subscriber is installed.
    pub fn load_from(path: &Path) -> (Self, LoadStatus) {
        if !path.exists() {
            return (Self::default(), LoadStatus::NotFound);
        }

        match fs::read_to_string(path) {
            Ok(content) => match toml::from_str(&content) {
                Ok(settings) => (settings, LoadStatus::Loaded(path.to_path_buf())),
                Err(e) => (
                    Self::default(),
                    LoadStatus::Invalid(format!("Failed to parse settings file: {}", e)),
                ),
            },
            Err(e) => (
                Self::default(),
                LoadStatus::Invalid(format!("Failed to read settings file: {}", e)),
            ),
        }
    }

    /// Save settings to the default location
    pub fn save(&self) -> anyhow::Result<()> {
        let Some(dir) = Self::config_dir() else {
            anyhow::bail!("Could not determine config directory");
        };
        self.save_to(&dir.join("settings.toml"))
    }

    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)?;
        }
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        info!("Saved settings to {:?}", path);
        Ok(())
    }
}

/// How the settings were obtained
#[derive(Debug, Clone, PartialEq)]
pub enum LoadStatus {
    Loaded(PathBuf),
    NotFound,
    NoConfigDir,
    /// File exists but could not be read or parsed
    Invalid(String),
}

impl LoadStatus {
    pub fn log(&self) {
        match self {
            LoadStatus::Loaded(path) => info!("Loaded settings from {:?}", path),
            LoadStatus::NotFound => info!("No settings file found, using defaults"),
            LoadStatus::NoConfigDir => warn!("Could not determine config directory"),
            LoadStatus::Invalid(reason) => warn!("{}, using defaults", reason),
        }
    }
}

/// Game-data provider settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiSettings {
    /// GraphQL endpoint
    pub endpoint: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout_secs: 30,
        }
    }
}

impl ApiSettings {
    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            endpoint: self.endpoint.clone(),
            timeout: Duration::from_secs(self.timeout_secs),
        }
    }
}

/// Saved-build storage settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    /// Explicit builds file; defaults to the user data directory
    pub builds_file: Option<PathBuf>,
}

impl StorageSettings {
    /// Resolved builds file path
    pub fn builds_path(&self) -> Option<PathBuf> {
        if let Some(path) = &self.builds_file {
            return Some(path.clone());
        }
        dirs::data_local_dir().map(|p| p.join("gunsmith").join(format!("{}.json", BUILDS_STORAGE_KEY)))
    }
}

/// Log output settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Default filter level when `RUST_LOG` is unset
    pub level: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.api.endpoint, "https://api.tarkov.dev/graphql");
        assert_eq!(settings.api.client_config().timeout, Duration::from_secs(30));
        assert_eq!(settings.logging.level, "info");
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::TempDir::new().unwrap();
        let (settings, status) = Settings::load_from(&dir.path().join("settings.toml"));
        assert_eq!(settings, Settings::default());
        assert_eq!(status, LoadStatus::NotFound);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("conf").join("settings.toml");

        let mut settings = Settings::default();
        settings.api.timeout_secs = 5;
        settings.storage.builds_file = Some(dir.path().join("builds.json"));
        settings.save_to(&path).unwrap();

        assert_eq!(Settings::load_from(&path), (settings, LoadStatus::Loaded(path.clone())));
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("settings.toml");
        fs::write(&path, "[logging]\nlevel = \"debug\"\n").unwrap();

        let (settings, _) = Settings::load_from(&path);
        assert_eq!(settings.logging.level, "debug");
        assert_eq!(settings.api, ApiSettings::default());
    }

    #[test]
    fn test_invalid_file_gives_defaults() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("settings.toml");
        fs::write(&path, "api = 12").unwrap();
        let (settings, status) = Settings::load_from(&path);
        assert_eq!(settings, Settings::default());
        assert!(matches!(status, LoadStatus::Invalid(reason) if reason.starts_with("Failed to parse")));
    }

    #[test]
    fn test_explicit_builds_file_wins() {
        let storage = StorageSettings {
            builds_file: Some(PathBuf::from("/tmp/builds.json")),
        };
        assert_eq!(storage.builds_path(), Some(PathBuf::from("/tmp/builds.json")));
    }
}
