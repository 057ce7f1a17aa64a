use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::core::calendar::{Locale, WeekStart};
use crate::error::{Error, Result};
use crate::storage::DEFAULT_STORAGE_KEY;

pub const CONFIG_VERSION: u64 = 1;

const APP_DIR: &str = "fazer";

fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("~/.local/share"))
        .join(APP_DIR)
}

fn default_storage_key() -> String {
    DEFAULT_STORAGE_KEY.to_string()
}

fn default_version() -> u64 {
    CONFIG_VERSION
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default)]
pub struct AgendaConfig {
    #[serde(default = "default_version")]
    pub version: u64,
    pub data_directory: PathBuf,
    #[serde(default = "default_storage_key")]
    pub storage_key: String,
    pub week_start: WeekStart,
    pub locale: Locale,
    pub debug_logging: bool,
}

impl Default for AgendaConfig {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            data_directory: default_data_dir(),
            storage_key: default_storage_key(),
            week_start: WeekStart::default(),
            locale: Locale::default(),
            debug_logging: false,
        }
    }
}

impl AgendaConfig {
    /// `<config dir>/fazer/config.json`
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("~/.config"))
            .join(APP_DIR)
            .join("config.json")
    }

    pub fn load() -> Self {
        Self::load_from(&Self::default_path())
    }

    /// Read the config at `path`, falling back to defaults when the file is
    /// missing or unreadable.
    pub fn load_from(path: &Path) -> Self {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) => {
                log::debug!("No config at {}: {}", path.display(), e);
                return Self::default();
            }
        };
        match serde_json::from_str::<Self>(&content) {
            Ok(config) => {
                if config.version != CONFIG_VERSION {
                    log::warn!(
                        "Config version {} differs from {}, reading what is understood",
                        config.version,
                        CONFIG_VERSION
                    );
                }
                config
            }
            Err(e) => {
                log::warn!("Ignoring malformed config {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self).map_err(Error::Serialization)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    pub fn tasks_path(&self) -> PathBuf {
        self.data_directory.join(format!("{}.json", self.storage_key))
    }

    pub fn notes_path(&self) -> PathBuf {
        self.data_directory.join(format!("{}_notes.json", self.storage_key))
    }

    pub fn alerts_path(&self) -> PathBuf {
        self.data_directory.join(format!("{}_alerts.json", self.storage_key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = AgendaConfig::load_from(&dir.path().join("absent.json"));
        assert_eq!(config, AgendaConfig::default());
        assert_eq!(config.storage_key, DEFAULT_STORAGE_KEY);
        assert_eq!(config.week_start, WeekStart::Sunday);
        assert_eq!(config.locale, Locale::Portuguese);
    }

    #[test]
    fn malformed_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{ week_start: ").unwrap();
        assert_eq!(AgendaConfig::load_from(&path), AgendaConfig::default());
    }

    #[test]
    fn partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"week_start": "monday", "locale": "english"}"#).unwrap();
        let config = AgendaConfig::load_from(&path);
        assert_eq!(config.week_start, WeekStart::Monday);
        assert_eq!(config.locale, Locale::English);
        assert_eq!(config.storage_key, DEFAULT_STORAGE_KEY);
        assert!(!config.debug_logging);
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");
        let config = AgendaConfig {
            data_directory: dir.path().join("data"),
            storage_key: "mine".into(),
            debug_logging: true,
            ..AgendaConfig::default()
        };
        config.save_to(&path).unwrap();
        assert_eq!(AgendaConfig::load_from(&path), config);
        assert_eq!(config.tasks_path(), dir.path().join("data").join("mine.json"));
        assert_eq!(config.notes_path(), dir.path().join("data").join("mine_notes.json"));
        assert_eq!(config.alerts_path(), dir.path().join("data").join("mine_alerts.json"));
    }
}
