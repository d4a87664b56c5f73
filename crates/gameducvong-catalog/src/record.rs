//! Game records as they appear in `games.json`

use crate::filter::fold;
use crate::lenient;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Release date assumed for records without one when ordering by date
pub const DEFAULT_RELEASE_DATE: &str = "2000-01-01";

pub(crate) fn default_platform() -> Vec<String> {
    vec!["PC".to_string()]
}

/// A game in the catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameRecord {
    #[serde(default, deserialize_with = "lenient::id")]
    pub id: String,

    #[serde(default, deserialize_with = "lenient::text")]
    pub title: String,

    #[serde(default, deserialize_with = "lenient::text")]
    pub description: String,

    #[serde(default, deserialize_with = "lenient::string_list")]
    pub genre: Vec<String>,

    #[serde(default, deserialize_with = "lenient::string_list")]
    pub tags: Vec<String>,

    #[serde(default = "default_platform", deserialize_with = "lenient::platform_list")]
    pub platform: Vec<String>,

    #[serde(default, deserialize_with = "lenient::opt_string", skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,

    #[serde(default, deserialize_with = "lenient::opt_string", skip_serializing_if = "Option::is_none")]
    pub engine: Option<String>,

    #[serde(default, deserialize_with = "lenient::opt_string", skip_serializing_if = "Option::is_none")]
    pub developer: Option<String>,

    #[serde(default, deserialize_with = "lenient::opt_f64", skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,

    #[serde(default, deserialize_with = "lenient::opt_u64", skip_serializing_if = "Option::is_none")]
    pub downloads: Option<u64>,

    /// Display size such as "1.2 GB"
    #[serde(default, deserialize_with = "lenient::opt_string", skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,

    #[serde(default, deserialize_with = "lenient::opt_string", skip_serializing_if = "Option::is_none")]
    pub release_date: Option<String>,

    #[serde(default, deserialize_with = "lenient::opt_bool", skip_serializing_if = "Option::is_none")]
    pub featured: Option<bool>,

    #[serde(default, deserialize_with = "lenient::opt_f64", skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,

    #[serde(default, deserialize_with = "lenient::opt_string", skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,

    /// Primary download link
    #[serde(default, deserialize_with = "lenient::opt_string", skip_serializing_if = "Option::is_none")]
    pub download: Option<String>,

    #[serde(default, deserialize_with = "lenient::opt_string", skip_serializing_if = "Option::is_none")]
    pub trailer: Option<String>,

    #[serde(default, deserialize_with = "lenient::links", skip_serializing_if = "Vec::is_empty")]
    pub alternative_links: Vec<AlternativeLink>,
}

/// Mirror download link
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlternativeLink {
    pub name: String,
    pub url: String,
}

impl GameRecord {
    /// Create a record with only a title set
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: String::new(),
            title: title.into(),
            description: String::new(),
            genre: Vec::new(),
            tags: Vec::new(),
            platform: default_platform(),
            language: None,
            engine: None,
            developer: None,
            rating: None,
            downloads: None,
            size: None,
            release_date: None,
            featured: None,
            price: None,
            image: None,
            download: None,
            trailer: None,
            alternative_links: Vec::new(),
        }
    }

    pub fn rating_or_zero(&self) -> f64 {
        self.rating.unwrap_or(0.0)
    }

    pub fn downloads_or_zero(&self) -> u64 {
        self.downloads.unwrap_or(0)
    }

    pub fn is_featured(&self) -> bool {
        self.featured.unwrap_or(false)
    }

    /// Absent price and price 0 both mean free
    pub fn is_free(&self) -> bool {
        self.price.is_none_or(|price| price == 0.0)
    }

    /// Parsed release date, if present and readable
    pub fn parsed_release_date(&self) -> Option<NaiveDate> {
        self.release_date.as_deref().and_then(parse_date)
    }

    /// Release date used for ordering
    pub fn release_date_or_default(&self) -> NaiveDate {
        self.parsed_release_date().unwrap_or_else(default_release_date)
    }

    /// Composed, lower-cased text the free-text search runs against
    pub fn searchable_text(&self) -> String {
        let mut parts: Vec<&str> = vec![self.title.as_str(), self.description.as_str()];
        parts.extend(self.genre.iter().map(String::as_str));
        parts.extend(self.tags.iter().map(String::as_str));
        if let Some(developer) = &self.developer {
            parts.push(developer.as_str());
        }
        fold(&parts.join(" "))
    }
}

fn default_release_date() -> NaiveDate {
    parse_date(DEFAULT_RELEASE_DATE).unwrap_or(NaiveDate::MIN)
}

/// Accepts `YYYY-MM-DD`, optionally followed by a time part
fn parse_date(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .or_else(|| {
            trimmed
                .get(..10)
                .and_then(|prefix| NaiveDate::parse_from_str(prefix, "%Y-%m-%d").ok())
        })
}
