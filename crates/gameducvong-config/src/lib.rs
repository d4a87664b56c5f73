//! Configuration management for GAMEDUCVONG
//!
//! Handles the catalog source, query constants, UI defaults, and the
//! per-user preference store. TOML-based config files, layered so that the
//! user file overrides the system file key by key.

mod catalog_config;
mod preferences;

pub use catalog_config::{CatalogConfig, QueryConfig, UiConfig};
pub use preferences::{PREFERENCES_FILE, PreferenceStore, Preferences};

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    NotFound(PathBuf),

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
}

/// System-wide configuration directory
pub const CONFIG_DIR: &str = "/etc/gameducvong";

/// Name of the config file in either directory
pub const CONFIG_FILE: &str = "config.toml";

/// Per-user configuration directory, e.g. `~/.config/gameducvong`
pub fn user_config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("gameducvong"))
}

/// Main GAMEDUCVONG configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GameducvongConfig {
    #[serde(default)]
    pub catalog: CatalogConfig,

    #[serde(default)]
    pub query: QueryConfig,

    #[serde(default)]
    pub ui: UiConfig,
}

impl GameducvongConfig {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }
        let contents = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Load the system config with the user config layered over it
    pub fn load_default() -> Result<Self, ConfigError> {
        let system_config = Path::new(CONFIG_DIR).join(CONFIG_FILE);
        let user_config = user_config_dir().map(|dir| dir.join(CONFIG_FILE));
        Self::load_layered(&system_config, user_config.as_deref())
    }

    /// Merge `user` over `system`; either may be missing
    pub fn load_layered(system: &Path, user: Option<&Path>) -> Result<Self, ConfigError> {
        let mut merged: Option<toml::Value> = None;

        for path in std::iter::once(system).chain(user) {
            if !path.exists() {
                continue;
            }
            let contents = std::fs::read_to_string(path)?;
            let layer: toml::Value = toml::from_str(&contents)?;
            tracing::debug!("Read configuration layer {}", path.display());

            match merged.as_mut() {
                Some(base) => merge_toml(base, layer),
                None => merged = Some(layer),
            }
        }

        match merged {
            Some(value) => Ok(value.try_into()?),
            None => {
                // Return default config if no file exists
                tracing::warn!("No configuration file found, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Save configuration to a file
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let contents = toml::to_string_pretty(self)?;

        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, contents)?;
        tracing::info!("Configuration saved to {}", path.display());
        Ok(())
    }

    /// Check values the type system can't
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.catalog.source.trim().is_empty() {
            return Err(ConfigError::Invalid("catalog.source is empty".to_string()));
        }
        if self.query.new_release_days < 0 {
            return Err(ConfigError::Invalid(format!(
                "query.new_release_days must not be negative, got {}",
                self.query.new_release_days
            )));
        }
        Ok(())
    }
}

/// Helper function to merge TOML values
pub fn merge_toml(base: &mut toml::Value, overlay: toml::Value) {
    match (base, overlay) {
        (toml::Value::Table(base_table), toml::Value::Table(overlay_table)) => {
            for (key, value) in overlay_table {
                if let Some(base_value) = base_table.get_mut(&key) {
                    merge_toml(base_value, value);
                } else {
                    base_table.insert(key, value);
                }
            }
        }
        (base, overlay) => *base = overlay,
    }
}
