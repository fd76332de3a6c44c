//! Inventory configuration
//!
//! Sizes and housekeeping settings, loaded once at startup from a TOML
//! file. Every field has a default so a partial (or missing) file works.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::save::SaveManager;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to access config file {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryConfig {
    /// Slots in the root container (available with no bags equipped)
    #[serde(default = "default_root_slots")]
    pub root_slots: usize,

    /// Number of bag equipment slots
    #[serde(default = "default_bag_slots")]
    pub bag_slots: usize,

    /// Default tracing filter, overridden by RUST_LOG
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Where saves go; falls back to the platform data directory
    #[serde(default)]
    pub save_directory: Option<PathBuf>,

    /// Autosaves kept per save slot
    #[serde(default = "default_autosave_keep")]
    pub autosave_keep: usize,
}

fn default_root_slots() -> usize {
    8
}

fn default_bag_slots() -> usize {
    16
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_autosave_keep() -> usize {
    3
}

impl Default for InventoryConfig {
    fn default() -> Self {
        InventoryConfig {
            root_slots: default_root_slots(),
            bag_slots: default_bag_slots(),
            log_level: default_log_level(),
            save_directory: None,
            autosave_keep: default_autosave_keep(),
        }
    }
}

impl InventoryConfig {
    /// Loads the config, using defaults when the file doesn't exist
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();

        if !path.exists() {
            info!("Config file {:?} not found, using defaults", path);
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: InventoryConfig = toml::from_str(&contents)?;

        info!("Loaded configuration from {:?}", path);
        Ok(config)
    }

    /// Writes the config as TOML, creating parent directories as needed
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let io_err = |source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        };

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(io_err)?;
        }

        let contents = toml::to_string_pretty(self)?;
        fs::write(path, contents).map_err(io_err)?;

        info!("Saved configuration to {:?}", path);
        Ok(())
    }

    /// The configured save directory, or the save manager's default
    pub fn save_directory(&self) -> PathBuf {
        self.save_directory
            .clone()
            .unwrap_or_else(SaveManager::default_directory)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = InventoryConfig::default();
        assert_eq!(config.root_slots, 8);
        assert_eq!(config.bag_slots, 16);
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let config: InventoryConfig = toml::from_str("root_slots = 12").unwrap();
        assert_eq!(config.root_slots, 12);
        assert_eq!(config.bag_slots, 16);
        assert_eq!(config.autosave_keep, 3);
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let path = std::env::temp_dir().join("satchel_config_does_not_exist.toml");
        let config = InventoryConfig::load(&path).unwrap();
        assert_eq!(config, InventoryConfig::default());
    }

    #[test]
    fn test_save_and_load() {
        let dir = std::env::temp_dir().join(format!("satchel_config_{}", std::process::id()));
        let path = dir.join("config.toml");
        let config = InventoryConfig {
            root_slots: 4,
            save_directory: Some(dir.join("saves")),
            ..InventoryConfig::default()
        };

        config.save(&path).unwrap();
        let loaded = InventoryConfig::load(&path).unwrap();

        assert_eq!(loaded, config);
        assert_eq!(loaded.save_directory(), dir.join("saves"));
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_invalid_file_is_an_error() {
        let dir = std::env::temp_dir().join(format!("satchel_bad_config_{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.toml");
        fs::write(&path, "root_slots = \"many\"").unwrap();

        assert!(matches!(InventoryConfig::load(&path), Err(ConfigError::Parse(_))));
        let _ = fs::remove_dir_all(&dir);
    }
}
