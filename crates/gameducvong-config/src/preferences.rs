//! Remembered UI preferences
//!
//! A small local key-value file for choices worth keeping between runs:
//! theme, platform filter, view mode, sort order. It holds no identity or
//! credentials.

use crate::{ConfigError, user_config_dir};
use gameducvong_catalog::{SortKey, ViewMode};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// File name of the preference store
pub const PREFERENCES_FILE: &str = "preferences.toml";

/// Remembered choices; unset fields fall back to config defaults
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preferences {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platform: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub view: Option<ViewMode>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort: Option<SortKey>,
}

impl Preferences {
    /// Keys accepted by [`Preferences::set`]
    pub const KEYS: [&'static str; 4] = ["theme", "platform", "view", "sort"];

    /// Set a preference from its textual form
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let value = value.trim();
        match key {
            "theme" => self.theme = Some(value.to_string()),
            "platform" => self.platform = Some(value.to_string()),
            "view" => {
                let view = value
                    .parse::<ViewMode>()
                    .map_err(|e| ConfigError::Invalid(e.to_string()))?;
                self.view = Some(view);
            }
            "sort" => {
                let sort = value
                    .parse::<SortKey>()
                    .map_err(|e| ConfigError::Invalid(e.to_string()))?;
                self.sort = Some(sort);
            }
            _ => {
                return Err(ConfigError::Invalid(format!(
                    "Unknown preference '{}', expected one of: {}",
                    key,
                    Self::KEYS.join(", ")
                )));
            }
        }
        Ok(())
    }

    /// Clear one preference
    pub fn unset(&mut self, key: &str) -> Result<(), ConfigError> {
        match key {
            "theme" => self.theme = None,
            "platform" => self.platform = None,
            "view" => self.view = None,
            "sort" => self.sort = None,
            _ => {
                return Err(ConfigError::Invalid(format!(
                    "Unknown preference '{}'",
                    key
                )));
            }
        }
        Ok(())
    }
}

/// Preference file on disk
#[derive(Debug, Clone)]
pub struct PreferenceStore {
    path: PathBuf,
}

impl PreferenceStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store in the per-user config directory
    pub fn open_default() -> Result<Self, ConfigError> {
        let dir = user_config_dir().ok_or_else(|| {
            ConfigError::Invalid("No user configuration directory available".to_string())
        })?;
        Ok(Self::new(dir.join(PREFERENCES_FILE)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read preferences; a missing file means nothing is remembered yet
    pub fn load(&self) -> Result<Preferences, ConfigError> {
        if !self.path.exists() {
            return Ok(Preferences::default());
        }
        let contents = std::fs::read_to_string(&self.path)?;
        Ok(toml::from_str(&contents)?)
    }

    pub fn save(&self, preferences: &Preferences) -> Result<(), ConfigError> {
        let contents = toml::to_string_pretty(preferences)?;

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(&self.path, contents)?;
        tracing::info!("Preferences saved to {}", self.path.display());
        Ok(())
    }

    /// Forget everything
    pub fn reset(&self) -> Result<(), ConfigError> {
        if self.path.exists() {
            std::fs::remove_file(&self.path)?;
            tracing::info!("Preferences cleared at {}", self.path.display());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_set_validates_values() {
        let mut prefs = Preferences::default();

        prefs.set("view", "list").unwrap();
        prefs.set("sort", "newest").unwrap();
        prefs.set("platform", " PS5 ").unwrap();
        assert_eq!(prefs.view, Some(ViewMode::List));
        assert_eq!(prefs.sort, Some(SortKey::Newest));
        assert_eq!(prefs.platform.as_deref(), Some("PS5"));

        assert!(matches!(
            prefs.set("sort", "bogus"),
            Err(ConfigError::Invalid(_))
        ));
        assert!(prefs.set("password", "hunter2").is_err());
    }

    #[test]
    fn test_unset() {
        let mut prefs = Preferences::default();
        prefs.set("theme", "light").unwrap();
        prefs.unset("theme").unwrap();
        assert_eq!(prefs.theme, None);
        assert!(prefs.unset("nope").is_err());
    }

    #[test]
    fn test_store_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let store = PreferenceStore::new(temp_dir.path().join("sub").join(PREFERENCES_FILE));

        assert_eq!(store.load().unwrap(), Preferences::default());

        let mut prefs = Preferences::default();
        prefs.set("theme", "light").unwrap();
        prefs.set("view", "compact").unwrap();
        store.save(&prefs).unwrap();

        assert_eq!(store.load().unwrap(), prefs);

        store.reset().unwrap();
        assert!(!store.path().exists());
        assert_eq!(store.load().unwrap(), Preferences::default());
    }
}
