//! Browse session state
//!
//! A session owns the loaded catalog together with the current filter
//! selections and view mode. Mutators only touch the filter state; the
//! visible list is always recomputed from scratch by [`BrowseSession::visible`].

use crate::query::{QueryOptions, query_with};
use crate::{Catalog, CatalogError, FilterState, GameRecord, TagPredicate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How result cards are laid out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    #[default]
    Grid,
    List,
    Compact,
}

impl ViewMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ViewMode::Grid => "grid",
            ViewMode::List => "list",
            ViewMode::Compact => "compact",
        }
    }
}

impl fmt::Display for ViewMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ViewMode {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "grid" => Ok(ViewMode::Grid),
            "list" => Ok(ViewMode::List),
            "compact" => Ok(ViewMode::Compact),
            _ => Err(CatalogError::InvalidViewMode(s.to_string())),
        }
    }
}

/// Per-session browse state over one catalog
pub struct BrowseSession {
    catalog: Catalog,
    filters: FilterState,
    view: ViewMode,
    options: QueryOptions,
}

impl BrowseSession {
    /// Start a session with empty filters and name ordering
    pub fn new(catalog: Catalog) -> Self {
        Self::with_options(catalog, QueryOptions::default())
    }

    /// Start a session with explicit query constants
    pub fn with_options(catalog: Catalog, options: QueryOptions) -> Self {
        Self {
            catalog,
            filters: FilterState::default(),
            view: ViewMode::default(),
            options,
        }
    }

    /// The records to display for the current selections
    pub fn visible(&self) -> Vec<&GameRecord> {
        query_with(self.catalog.records(), &self.filters, &self.options)
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn filters(&self) -> &FilterState {
        &self.filters
    }

    pub fn view_mode(&self) -> ViewMode {
        self.view
    }

    pub fn options(&self) -> &QueryOptions {
        &self.options
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.filters.query = query.into();
    }

    pub fn clear_search(&mut self) {
        self.filters.query.clear();
    }

    pub fn set_platform(&mut self, platform: Option<String>) {
        self.filters.platform = platform;
    }

    pub fn set_language(&mut self, language: Option<String>) {
        self.filters.language = language;
    }

    pub fn set_engine(&mut self, engine: Option<String>) {
        self.filters.engine = engine;
    }

    pub fn set_genre(&mut self, genre: Option<String>) {
        self.filters.genre = genre;
    }

    /// Toggle a tag chip by name, returning whether it is now active
    pub fn toggle_tag(&mut self, name: &str) -> Result<bool, CatalogError> {
        let tag = name.parse::<TagPredicate>().inspect_err(|e| {
            tracing::warn!("Ignoring tag toggle: {}", e);
        })?;
        Ok(self.filters.toggle_tag(tag))
    }

    /// Store the raw sort selector value
    pub fn set_sort_key(&mut self, sort_key: impl Into<String>) {
        self.filters.sort_key = sort_key.into();
    }

    pub fn set_view_mode(&mut self, view: ViewMode) {
        self.view = view;
    }

    /// Drop every search and facet selection, keeping the sort order
    pub fn reset_filters(&mut self) {
        let sort_key = std::mem::take(&mut self.filters.sort_key);
        self.filters = FilterState {
            sort_key,
            ..FilterState::default()
        };
    }
}
