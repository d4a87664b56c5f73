//! Catalog, query, and UI sections of the config file

use chrono::NaiveDate;
use gameducvong_catalog::{
    NEW_RELEASE_WINDOW_DAYS, POPULAR_DOWNLOADS_THRESHOLD, QueryOptions, SortKey, ViewMode,
};
use serde::{Deserialize, Serialize};

/// Where the game list comes from and how it is prepared
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Path or http(s) URL of `games.json`
    #[serde(default = "default_source")]
    pub source: String,

    /// Fill in missing platform/engine values right after load
    #[serde(default = "default_true")]
    pub backfill_defaults: bool,

    /// Engine name given to games that don't declare one
    #[serde(default = "default_engine")]
    pub default_engine: String,
}

fn default_source() -> String {
    "games.json".to_string()
}

fn default_true() -> bool {
    true
}

fn default_engine() -> String {
    "Unknown".to_string()
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            source: default_source(),
            backfill_defaults: true,
            default_engine: default_engine(),
        }
    }
}

/// Constants behind the tag filters and the initial sort
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryConfig {
    /// Downloads above which a game is popular
    #[serde(default = "default_popular_threshold")]
    pub popular_threshold: u64,

    /// Days after release during which a game is new
    #[serde(default = "default_new_release_days")]
    pub new_release_days: i64,

    #[serde(default)]
    pub default_sort: SortKey,
}

fn default_popular_threshold() -> u64 {
    POPULAR_DOWNLOADS_THRESHOLD
}

fn default_new_release_days() -> i64 {
    NEW_RELEASE_WINDOW_DAYS
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            popular_threshold: default_popular_threshold(),
            new_release_days: default_new_release_days(),
            default_sort: SortKey::default(),
        }
    }
}

impl QueryConfig {
    /// Query options evaluated at `today`
    pub fn options(&self, today: NaiveDate) -> QueryOptions {
        QueryOptions {
            today,
            popular_threshold: self.popular_threshold,
            new_release_window_days: self.new_release_days,
        }
    }
}

/// Presentation defaults
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UiConfig {
    #[serde(default)]
    pub default_view: ViewMode,

    #[serde(default = "default_theme")]
    pub theme: String,
}

fn default_theme() -> String {
    "dark".to_string()
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            default_view: ViewMode::default(),
            theme: default_theme(),
        }
    }
}
