use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use stowage_core::StorageRecord;

/// Configuration for stowage
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub storage: StorageRecord,

    #[serde(default)]
    pub dvc: DvcSettings,

    #[serde(default)]
    pub github: GitHubSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DvcSettings {
    #[serde(default = "default_executable")]
    pub executable: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GitHubSettings {
    #[serde(default = "default_raw_base_url")]
    pub raw_base_url: String,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for DvcSettings {
    fn default() -> Self {
        Self {
            executable: default_executable(),
        }
    }
}

impl Default for GitHubSettings {
    fn default() -> Self {
        Self {
            raw_base_url: default_raw_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_executable() -> String {
    "dvc".to_string()
}

fn default_raw_base_url() -> String {
    "https://raw.githubusercontent.com".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

impl Settings {
    /// Load settings from the default location, writing defaults if not found
    pub fn load() -> anyhow::Result<Self> {
        let path = Self::config_path();

        if path.exists() {
            Self::load_from(&path)
        } else {
            let settings = Settings::default();
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            let content = toml::to_string_pretty(&settings)?;
            std::fs::write(&path, content)?;
            Ok(settings)
        }
    }

    /// Load settings from an explicit file
    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let settings: Settings = toml::from_str(&content)?;
        Ok(settings)
    }

    /// Get config file path
    pub fn config_path() -> PathBuf {
        if let Some(dirs) = directories::ProjectDirs::from("com", "stowage", "stowage") {
            dirs.config_dir().join("config.toml")
        } else {
            PathBuf::from("~/.stowage/config.toml")
        }
    }
}
