//! Game catalog engine for GAMEDUCVONG
//!
//! Loads the static game list, and answers browse queries over it:
//! free-text search, faceted filtering, and sorting.
//! The query engine is stateless; [`BrowseSession`] holds the per-session
//! filter selections and projects them into the visible list.

mod catalog;
mod collation;
mod display;
mod filter;
mod lenient;
mod query;
mod record;
mod session;

pub use catalog::{Catalog, CatalogSource};
pub use display::{CardView, CatalogStats, DEFAULT_LANGUAGE_LABEL, format_downloads};
pub use filter::{FilterState, SortKey, TagPredicate, language_synonyms};
pub use query::{
    NEW_RELEASE_WINDOW_DAYS, POPULAR_DOWNLOADS_THRESHOLD, QueryOptions, apply_facets, query,
    query_with, search, sort, sort_by,
};
pub use record::{AlternativeLink, DEFAULT_RELEASE_DATE, GameRecord};
pub use session::{BrowseSession, ViewMode};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Catalog load failed: {0}")]
    LoadFailed(String),

    #[error("Invalid sort key: {0}")]
    InvalidSortKey(String),

    #[error("Unknown tag filter: {0}")]
    UnknownTag(String),

    #[error("Invalid view mode: {0}")]
    InvalidViewMode(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}
