//! Catalog loading from disk or over HTTP

use crate::{CatalogError, GameRecord};
use serde_json::Value;
use std::collections::BTreeSet;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Where the catalog JSON comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogSource {
    /// Local `games.json`
    File(PathBuf),
    /// Remote `games.json`
    Url(String),
}

impl CatalogSource {
    /// Interpret a location string: http(s) URLs are remote, anything else a path
    pub fn from_location(location: &str) -> Self {
        let trimmed = location.trim();
        if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
            CatalogSource::Url(trimmed.to_string())
        } else {
            CatalogSource::File(PathBuf::from(trimmed))
        }
    }
}

impl fmt::Display for CatalogSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogSource::File(path) => write!(f, "{}", path.display()),
            CatalogSource::Url(url) => f.write_str(url),
        }
    }
}

/// The full game list for a session
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    records: Vec<GameRecord>,
}

impl Catalog {
    pub fn from_records(records: Vec<GameRecord>) -> Self {
        Self { records }
    }

    /// Parse a JSON array of game objects
    pub fn from_json_str(json: &str) -> Result<Self, CatalogError> {
        let value: Value = serde_json::from_str(json)?;
        Self::from_json_value(value)
    }

    fn from_json_value(value: Value) -> Result<Self, CatalogError> {
        let Value::Array(items) = value else {
            return Err(CatalogError::LoadFailed(
                "catalog must be a JSON array of games".to_string(),
            ));
        };

        let records = items
            .into_iter()
            .enumerate()
            .map(|(index, item)| -> Result<GameRecord, CatalogError> {
                if !item.is_object() {
                    return Err(CatalogError::LoadFailed(format!(
                        "catalog entry {} is not an object",
                        index
                    )));
                }
                Ok(serde_json::from_value(item)?)
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { records })
    }

    /// Load from a local file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        let catalog = Self::from_json_str(&contents)?;
        tracing::info!("Loaded {} games from {}", catalog.len(), path.display());
        Ok(catalog)
    }

    /// Fetch over HTTP
    pub async fn fetch(url: &str) -> Result<Self, CatalogError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent(format!("gameducvong/{}", env!("CARGO_PKG_VERSION")))
            .build()?;

        tracing::debug!("Fetching catalog from {}", url);

        let response = client.get(url).send().await?;
        if !response.status().is_success() {
            return Err(CatalogError::LoadFailed(format!(
                "Server returned {}",
                response.status()
            )));
        }

        let value: Value = response.json().await?;
        let catalog = Self::from_json_value(value)?;
        tracing::info!("Fetched {} games from {}", catalog.len(), url);
        Ok(catalog)
    }

    /// Load from whichever source is configured
    pub async fn load_source(source: &CatalogSource) -> Result<Self, CatalogError> {
        match source {
            CatalogSource::File(path) => Self::load(path),
            CatalogSource::Url(url) => Self::fetch(url).await,
        }
    }

    /// One-time demo backfill after load: empty platform lists become
    /// `["PC"]` and missing engines get `default_engine`.
    ///
    /// Returns the number of records touched.
    pub fn backfill_defaults(&mut self, default_engine: &str) -> usize {
        let mut touched = 0;

        for record in &mut self.records {
            let mut changed = false;
            if record.platform.is_empty() {
                record.platform = vec!["PC".to_string()];
                changed = true;
            }
            if record.engine.is_none() && !default_engine.trim().is_empty() {
                record.engine = Some(default_engine.to_string());
                changed = true;
            }
            if changed {
                touched += 1;
            }
        }

        tracing::debug!("Backfilled defaults on {} of {} games", touched, self.len());
        touched
    }

    pub fn records(&self) -> &[GameRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Find a game by id
    pub fn get(&self, id: &str) -> Option<&GameRecord> {
        self.records.iter().find(|record| record.id == id)
    }

    /// Distinct genre labels, for populating the genre selector
    pub fn genres(&self) -> BTreeSet<&str> {
        self.records
            .iter()
            .flat_map(|record| record.genre.iter().map(String::as_str))
            .collect()
    }

    /// Distinct platform labels
    pub fn platforms(&self) -> BTreeSet<&str> {
        self.records
            .iter()
            .flat_map(|record| record.platform.iter().map(String::as_str))
            .collect()
    }

    /// Distinct engine names
    pub fn engines(&self) -> BTreeSet<&str> {
        self.records
            .iter()
            .filter_map(|record| record.engine.as_deref())
            .collect()
    }
}
