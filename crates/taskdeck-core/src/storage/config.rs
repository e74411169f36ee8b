//! TOML-based application configuration.
//!
//! Stores CLI-level preferences, currently the owner id commands fall
//! back to when `--owner` is absent.
//!
//! Configuration is stored at `~/.config/taskdeck/config.toml`.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::resolve_data_dir;
use crate::error::ConfigError;

const CONFIG_FILE: &str = "config.toml";

fn default_owner() -> String {
    "local".to_string()
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/taskdeck/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Owner id used when a command does not name one.
    #[serde(default = "default_owner")]
    pub default_owner: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_owner: default_owner(),
        }
    }
}

impl Config {
    fn path() -> PathBuf {
        resolve_data_dir().join(CONFIG_FILE)
    }

    /// Load from disk or return default.
    ///
    /// A missing file is not an error: the defaults are written out and
    /// returned.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::path();
        match std::fs::read_to_string(&path) {
            Ok(content) => toml::from_str(&content).map_err(|err| ConfigError::LoadFailed {
                path,
                message: err.to_string(),
            }),
            Err(_) => {
                let cfg = Self::default();
                cfg.save()?;
                Ok(cfg)
            }
        }
    }

    /// Persist to disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written to
    /// disk.
    pub fn save(&self) -> Result<(), ConfigError> {
        let path = Self::path();
        let content = toml::to_string_pretty(self).map_err(|err| ConfigError::SaveFailed {
            path: path.clone(),
            message: err.to_string(),
        })?;
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir).map_err(|err| ConfigError::SaveFailed {
                path: path.clone(),
                message: err.to_string(),
            })?;
        }
        std::fs::write(&path, content).map_err(|err| ConfigError::SaveFailed {
            path,
            message: err.to_string(),
        })?;
        Ok(())
    }

    /// Get a config value as string by key.
    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "default_owner" => Some(self.default_owner.clone()),
            _ => None,
        }
    }

    /// Set a config value by key and persist it.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown or the config cannot be
    /// saved.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        match key {
            "default_owner" => self.default_owner = value.to_string(),
            _ => return Err(ConfigError::UnknownKey(key.to_string())),
        }
        self.save()
    }

    /// Load from disk, returning default on error.
    /// This is a convenience method that never fails.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_default()
    }
}
