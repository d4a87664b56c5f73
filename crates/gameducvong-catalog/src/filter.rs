//! Filter selections, sort keys, and tag predicates

use crate::query::QueryOptions;
use crate::{CatalogError, GameRecord, lenient};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use unicode_normalization::UnicodeNormalization;

/// Sort orders offered by the catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum SortKey {
    /// Title A to Z
    #[default]
    Name,
    /// Title Z to A
    NameDesc,
    /// Highest rating first
    Rating,
    /// Lowest rating first
    RatingAsc,
    /// Most recent release first
    Newest,
    /// Most downloaded first
    Downloads,
}

impl SortKey {
    pub const ALL: [SortKey; 6] = [
        SortKey::Name,
        SortKey::NameDesc,
        SortKey::Rating,
        SortKey::RatingAsc,
        SortKey::Newest,
        SortKey::Downloads,
    ];

    /// Key as used by the sort selector
    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::Name => "name",
            SortKey::NameDesc => "name-desc",
            SortKey::Rating => "rating",
            SortKey::RatingAsc => "rating-asc",
            SortKey::Newest => "newest",
            SortKey::Downloads => "downloads",
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortKey {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SortKey::ALL
            .into_iter()
            .find(|key| key.as_str() == s.trim())
            .ok_or_else(|| CatalogError::InvalidSortKey(s.to_string()))
    }
}

/// Named per-record checks behind the toggleable filter chips
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TagPredicate {
    Featured,
    New,
    Popular,
    Small,
    Free,
    Multiplayer,
    Singleplayer,
}

impl TagPredicate {
    pub const ALL: [TagPredicate; 7] = [
        TagPredicate::Featured,
        TagPredicate::New,
        TagPredicate::Popular,
        TagPredicate::Small,
        TagPredicate::Free,
        TagPredicate::Multiplayer,
        TagPredicate::Singleplayer,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TagPredicate::Featured => "featured",
            TagPredicate::New => "new",
            TagPredicate::Popular => "popular",
            TagPredicate::Small => "small",
            TagPredicate::Free => "free",
            TagPredicate::Multiplayer => "multiplayer",
            TagPredicate::Singleplayer => "singleplayer",
        }
    }

    /// Evaluate the predicate against one record
    pub fn matches(&self, record: &GameRecord, options: &QueryOptions) -> bool {
        match self {
            TagPredicate::Featured => record.is_featured(),
            TagPredicate::New => record.parsed_release_date().is_some_and(|released| {
                (options.today - released).num_days() <= options.new_release_window_days
            }),
            TagPredicate::Popular => record.downloads_or_zero() > options.popular_threshold,
            TagPredicate::Small => record.size.as_deref().is_some_and(is_small_size),
            TagPredicate::Free => record.is_free(),
            TagPredicate::Multiplayer => has_multiplayer_tag(record),
            TagPredicate::Singleplayer => !has_multiplayer_tag(record),
        }
    }
}

impl fmt::Display for TagPredicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TagPredicate {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        TagPredicate::ALL
            .into_iter()
            .find(|tag| tag.as_str() == wanted)
            .ok_or_else(|| CatalogError::UnknownTag(s.to_string()))
    }
}

fn has_multiplayer_tag(record: &GameRecord) -> bool {
    record
        .tags
        .iter()
        .any(|tag| fold(tag).contains("multiplayer"))
}

/// Size unit recognised by the `small` predicate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SizeUnit {
    Megabytes,
    Gigabytes,
}

/// Loose parse of display sizes such as "500MB", "1.2 GB" or "3,5 GB"
fn parse_size(raw: &str) -> Option<(f64, SizeUnit)> {
    let upper = raw.trim().to_uppercase();
    let unit = if upper.contains("GB") {
        SizeUnit::Gigabytes
    } else if upper.contains("MB") {
        SizeUnit::Megabytes
    } else {
        return None;
    };

    let number: String = upper
        .chars()
        .take_while(|c| c.is_ascii_digit() || *c == '.' || *c == ',')
        .map(|c| if c == ',' { '.' } else { c })
        .collect();

    number.parse::<f64>().ok().map(|value| (value, unit))
}

fn is_small_size(raw: &str) -> bool {
    match parse_size(raw) {
        Some((value, SizeUnit::Megabytes)) => value < 1000.0,
        Some((value, SizeUnit::Gigabytes)) => value < 5.0,
        None => false,
    }
}

/// Substrings a record's language must contain for a language filter value
pub fn language_synonyms(value: &str) -> Vec<String> {
    let wanted = fold(value.trim());
    let synonyms: &[&str] = match wanted.as_str() {
        "vietnamese" | "vi" => &["việt", "vietnam"],
        "english" | "en" => &["english", "tiếng anh"],
        "japanese" | "ja" => &["japanese", "nhật"],
        "chinese" | "zh" => &["chinese", "trung"],
        "korean" | "ko" => &["korean", "hàn"],
        _ => return vec![wanted],
    };
    synonyms.iter().map(|s| s.to_string()).collect()
}

/// Current search, facet, and sort selections
///
/// Decoding is as forgiving as for records: a wrongly-shaped field is
/// treated as unset and unknown tag names are dropped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FilterState {
    /// Free-text search
    #[serde(deserialize_with = "lenient::text")]
    pub query: String,

    #[serde(deserialize_with = "lenient::opt_string")]
    pub platform: Option<String>,

    #[serde(deserialize_with = "lenient::opt_string")]
    pub language: Option<String>,

    #[serde(deserialize_with = "lenient::opt_string")]
    pub engine: Option<String>,

    /// Exact genre label
    #[serde(deserialize_with = "lenient::opt_string")]
    pub genre: Option<String>,

    /// Toggled tag predicates, all of which must hold
    #[serde(deserialize_with = "lenient::tag_set")]
    pub tags: BTreeSet<TagPredicate>,

    /// Raw sort selector value; unknown keys leave the order untouched
    #[serde(deserialize_with = "lenient::sort_key")]
    pub sort_key: String,
}

impl Default for FilterState {
    fn default() -> Self {
        Self {
            query: String::new(),
            platform: None,
            language: None,
            engine: None,
            genre: None,
            tags: BTreeSet::new(),
            sort_key: SortKey::default().as_str().to_string(),
        }
    }
}

impl FilterState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style sort selection
    pub fn with_sort(mut self, sort_key: impl Into<String>) -> Self {
        self.sort_key = sort_key.into();
        self
    }

    /// Builder-style tag selection
    pub fn with_tag(mut self, tag: TagPredicate) -> Self {
        self.tags.insert(tag);
        self
    }

    /// Builder-style search text
    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = query.into();
        self
    }

    /// Flip a tag predicate on or off, returning whether it is now active
    pub fn toggle_tag(&mut self, tag: TagPredicate) -> bool {
        if self.tags.remove(&tag) {
            false
        } else {
            self.tags.insert(tag);
            true
        }
    }

    /// True when no search text and no facet narrows the catalog
    pub fn is_unfiltered(&self) -> bool {
        self.query.trim().is_empty()
            && blank(&self.platform)
            && blank(&self.language)
            && blank(&self.engine)
            && blank(&self.genre)
            && self.tags.is_empty()
    }
}

/// A facet value that is missing or whitespace does not filter
pub(crate) fn blank(value: &Option<String>) -> bool {
    value.as_deref().is_none_or(|v| v.trim().is_empty())
}

/// Composed, lower-cased form used by every case-insensitive match
pub(crate) fn fold(text: &str) -> String {
    text.nfc().collect::<String>().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn options() -> QueryOptions {
        QueryOptions::at(NaiveDate::from_ymd_opt(2025, 6, 30).unwrap())
    }

    #[test]
    fn test_sort_key_round_trip_names() {
        for key in SortKey::ALL {
            assert_eq!(key.as_str().parse::<SortKey>().unwrap(), key);
        }
        assert!(matches!(
            "bogus".parse::<SortKey>(),
            Err(CatalogError::InvalidSortKey(_))
        ));
    }

    #[test]
    fn test_tag_parse_is_case_insensitive() {
        assert_eq!("Free".parse::<TagPredicate>().unwrap(), TagPredicate::Free);
        assert!(matches!(
            "shiny".parse::<TagPredicate>(),
            Err(CatalogError::UnknownTag(_))
        ));
    }

    #[test]
    fn test_parse_size() {
        assert_eq!(parse_size("500MB"), Some((500.0, SizeUnit::Megabytes)));
        assert_eq!(parse_size("1.2 GB"), Some((1.2, SizeUnit::Gigabytes)));
        assert_eq!(parse_size("3,5 gb"), Some((3.5, SizeUnit::Gigabytes)));
        assert_eq!(parse_size("800 KB"), None);
        assert_eq!(parse_size("huge GB"), None);
    }

    #[test]
    fn test_small_predicate() {
        let opts = options();
        let mut record = GameRecord::new("Tiny");

        record.size = Some("999 MB".to_string());
        assert!(TagPredicate::Small.matches(&record, &opts));

        record.size = Some("1000 MB".to_string());
        assert!(!TagPredicate::Small.matches(&record, &opts));

        record.size = Some("4.9 GB".to_string());
        assert!(TagPredicate::Small.matches(&record, &opts));

        record.size = Some("10GB".to_string());
        assert!(!TagPredicate::Small.matches(&record, &opts));

        record.size = None;
        assert!(!TagPredicate::Small.matches(&record, &opts));
    }

    #[test]
    fn test_new_predicate_window() {
        let opts = options();
        let mut record = GameRecord::new("Fresh");

        // 2025-04-01 is exactly 90 days before 2025-06-30
        record.release_date = Some("2025-04-01".to_string());
        assert!(TagPredicate::New.matches(&record, &opts));

        record.release_date = Some("2025-03-31".to_string());
        assert!(!TagPredicate::New.matches(&record, &opts));

        record.release_date = Some("2025-12-01".to_string());
        assert!(TagPredicate::New.matches(&record, &opts));

        record.release_date = None;
        assert!(!TagPredicate::New.matches(&record, &opts));
    }

    #[test]
    fn test_popular_predicate_uses_threshold() {
        let mut opts = options();
        let mut record = GameRecord::new("Hit");
        record.downloads = Some(40_000);

        assert!(TagPredicate::Popular.matches(&record, &opts));

        opts.popular_threshold = 50_000;
        assert!(!TagPredicate::Popular.matches(&record, &opts));

        record.downloads = Some(50_000);
        assert!(!TagPredicate::Popular.matches(&record, &opts));
    }

    #[test]
    fn test_multiplayer_predicates() {
        let opts = options();
        let mut record = GameRecord::new("Party");
        record.tags = vec!["Online Multiplayer".to_string()];

        assert!(TagPredicate::Multiplayer.matches(&record, &opts));
        assert!(!TagPredicate::Singleplayer.matches(&record, &opts));

        record.tags.clear();
        assert!(!TagPredicate::Multiplayer.matches(&record, &opts));
        assert!(TagPredicate::Singleplayer.matches(&record, &opts));
    }

    #[test]
    fn test_language_synonyms() {
        assert_eq!(language_synonyms("Vietnamese"), vec!["việt", "vietnam"]);
        assert_eq!(language_synonyms("Thai"), vec!["thai"]);
    }

    #[test]
    fn test_filter_state_defaults_and_toggle() {
        let mut filters = FilterState::new();
        assert_eq!(filters.sort_key, "name");
        assert!(filters.is_unfiltered());

        assert!(filters.toggle_tag(TagPredicate::Free));
        assert!(!filters.is_unfiltered());
        assert!(!filters.toggle_tag(TagPredicate::Free));
        assert!(filters.is_unfiltered());

        filters.platform = Some("   ".to_string());
        assert!(filters.is_unfiltered());
    }

    #[test]
    fn test_filter_state_from_ui_json() {
        let filters: FilterState =
            serde_json::from_str(r#"{"query": "rpg", "tags": ["free", "new"], "sortKey": "rating"}"#)
                .unwrap();
        assert_eq!(filters.query, "rpg");
        assert!(filters.tags.contains(&TagPredicate::New));
        assert_eq!(filters.sort_key, "rating");
        assert_eq!(filters.platform, None);
    }

    #[test]
    fn test_filter_state_tolerates_bad_ui_json() {
        let filters: FilterState = serde_json::from_str(
            r#"{"query": 3, "platform": ["PC"], "tags": ["free", "sparkly", 7], "sortKey": 5}"#,
        )
        .unwrap();
        assert_eq!(filters.query, "");
        assert_eq!(filters.platform, None);
        assert_eq!(filters.tags, BTreeSet::from([TagPredicate::Free]));
        assert_eq!(filters.sort_key, "name");

        let filters: FilterState =
            serde_json::from_str(r#"{"tags": "free", "sortKey": "bogus"}"#).unwrap();
        assert!(filters.tags.is_empty());
        // Unknown keys survive decoding and are handled by the sort stage
        assert_eq!(filters.sort_key, "bogus");
    }

    #[test]
    fn test_fold_composes_and_lowercases() {
        // "Việt" typed as base letters plus combining marks
        let decomposed = "Vie\u{0323}\u{0302}t";
        assert_eq!(fold(decomposed), "việt");
        assert_eq!(fold("TIẾNG VIỆT"), "tiếng việt");
    }
}
