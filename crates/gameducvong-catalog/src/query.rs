//! Catalog query engine
//!
//! A query runs three stages in a fixed order: free-text search, facet
//! filtering, then sorting. Every stage returns a new list of references
//! into the catalog and leaves the catalog itself untouched.

use crate::collation::compare_titles;
use crate::filter::{FilterState, SortKey, blank, fold, language_synonyms};
use crate::GameRecord;
use chrono::{Local, NaiveDate};
use std::cmp::Ordering;

/// Downloads above which a game counts as popular.
///
/// The original front-end used 50000 for its catalog-wide highlight and
/// 30000 for the filter chip; the filter value is the one kept here.
pub const POPULAR_DOWNLOADS_THRESHOLD: u64 = 30_000;

/// Age in days up to which a release counts as new
pub const NEW_RELEASE_WINDOW_DAYS: i64 = 90;

/// Clock and constants the tag predicates evaluate against
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryOptions {
    /// Reference date for the `new` predicate
    pub today: NaiveDate,
    pub popular_threshold: u64,
    pub new_release_window_days: i64,
}

impl QueryOptions {
    /// Default constants evaluated at a fixed date
    pub fn at(today: NaiveDate) -> Self {
        Self {
            today,
            popular_threshold: POPULAR_DOWNLOADS_THRESHOLD,
            new_release_window_days: NEW_RELEASE_WINDOW_DAYS,
        }
    }
}

impl Default for QueryOptions {
    fn default() -> Self {
        Self::at(Local::now().date_naive())
    }
}

/// Case-insensitive substring search over title, description, genres,
/// tags, and developer. Blank queries return the whole catalog.
pub fn search<'a>(catalog: &'a [GameRecord], query: &str) -> Vec<&'a GameRecord> {
    let needle = fold(query.trim());
    if needle.is_empty() {
        return catalog.iter().collect();
    }

    catalog
        .iter()
        .filter(|record| record.searchable_text().contains(&needle))
        .collect()
}

/// Keep the records passing every active facet
pub fn apply_facets<'a>(
    records: Vec<&'a GameRecord>,
    filters: &FilterState,
    options: &QueryOptions,
) -> Vec<&'a GameRecord> {
    let platform = active(&filters.platform).map(fold);
    let languages = active(&filters.language).map(language_synonyms);
    let engine = active(&filters.engine).map(fold);
    // Genre is matched verbatim, surrounding spaces included
    let genre = filters.genre.as_deref().filter(|_| !blank(&filters.genre));

    records
        .into_iter()
        .filter(|record| {
            platform.as_ref().is_none_or(|wanted| {
                record
                    .platform
                    .iter()
                    .any(|p| fold(p).contains(wanted.as_str()))
            })
        })
        .filter(|record| {
            languages.as_ref().is_none_or(|synonyms| {
                record.language.as_deref().is_some_and(|language| {
                    let language = fold(language);
                    synonyms.iter().any(|s| language.contains(s.as_str()))
                })
            })
        })
        .filter(|record| {
            engine.as_ref().is_none_or(|wanted| {
                record
                    .engine
                    .as_deref()
                    .is_some_and(|e| fold(e).contains(wanted.as_str()))
            })
        })
        .filter(|record| genre.is_none_or(|wanted| record.genre.iter().any(|g| g == wanted)))
        .filter(|record| filters.tags.iter().all(|tag| tag.matches(record, options)))
        .collect()
}

fn active(value: &Option<String>) -> Option<&str> {
    if blank(value) {
        None
    } else {
        value.as_deref().map(str::trim)
    }
}

/// Order records by a sort selector value.
///
/// An unrecognised key is logged and leaves the input order unchanged.
pub fn sort<'a>(records: Vec<&'a GameRecord>, sort_key: &str) -> Vec<&'a GameRecord> {
    match sort_key.parse::<SortKey>() {
        Ok(key) => sort_by(records, key),
        Err(e) => {
            tracing::warn!("{}, keeping current order", e);
            records
        }
    }
}

/// Stable sort by a known key
pub fn sort_by(mut records: Vec<&GameRecord>, key: SortKey) -> Vec<&GameRecord> {
    let compare: fn(&GameRecord, &GameRecord) -> Ordering = match key {
        SortKey::Name => |a, b| compare_titles(&a.title, &b.title),
        SortKey::NameDesc => |a, b| compare_titles(&b.title, &a.title),
        SortKey::Rating => |a, b| compare_ratings(b.rating_or_zero(), a.rating_or_zero()),
        SortKey::RatingAsc => |a, b| compare_ratings(a.rating_or_zero(), b.rating_or_zero()),
        SortKey::Newest => |a, b| b.release_date_or_default().cmp(&a.release_date_or_default()),
        SortKey::Downloads => |a, b| b.downloads_or_zero().cmp(&a.downloads_or_zero()),
    };

    records.sort_by(|a, b| compare(a, b));
    records
}

/// Numeric comparison; 0.0 and -0.0 are the same rating
fn compare_ratings(a: f64, b: f64) -> Ordering {
    a.partial_cmp(&b).unwrap_or(Ordering::Equal)
}

/// Run the full pipeline with today's date and default constants
pub fn query<'a>(catalog: &'a [GameRecord], filters: &FilterState) -> Vec<&'a GameRecord> {
    query_with(catalog, filters, &QueryOptions::default())
}

/// Run the full pipeline: search, then facets, then sort
pub fn query_with<'a>(
    catalog: &'a [GameRecord],
    filters: &FilterState,
    options: &QueryOptions,
) -> Vec<&'a GameRecord> {
    let matched = search(catalog, &filters.query);
    let searched = matched.len();

    let filtered = apply_facets(matched, filters, options);
    tracing::debug!(
        total = catalog.len(),
        searched,
        filtered = filtered.len(),
        sort_key = %filters.sort_key,
        "Catalog query"
    );

    sort(filtered, &filters.sort_key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TagPredicate;

    fn game(title: &str) -> GameRecord {
        GameRecord::new(title)
    }

    fn titles(records: &[&GameRecord]) -> Vec<String> {
        records.iter().map(|r| r.title.clone()).collect()
    }

    fn options() -> QueryOptions {
        QueryOptions::at(NaiveDate::from_ymd_opt(2025, 1, 1).unwrap())
    }

    #[test]
    fn test_blank_search_returns_everything() {
        let catalog = vec![game("A"), game("B")];
        assert_eq!(search(&catalog, "   ").len(), 2);
        assert_eq!(search(&catalog, "").len(), 2);
    }

    #[test]
    fn test_search_matches_description_case_insensitive() {
        let mut hit = game("Quest");
        hit.description = "A great ADVENTURE awaits".to_string();
        let catalog = vec![game("Other"), hit];

        let results = search(&catalog, "  adventure ");
        assert_eq!(titles(&results), vec!["Quest"]);
    }

    #[test]
    fn test_search_matches_developer_and_tags() {
        let mut a = game("A");
        a.developer = Some("Studio Ghibli".to_string());
        let mut b = game("B");
        b.tags = vec!["Roguelike".to_string()];
        let catalog = vec![a, b];

        assert_eq!(titles(&search(&catalog, "ghibli")), vec!["A"]);
        assert_eq!(titles(&search(&catalog, "ROGUE")), vec!["B"]);
    }

    #[test]
    fn test_platform_facet_substring() {
        let mut a = game("A");
        a.platform = vec!["Windows PC".to_string(), "PS5".to_string()];
        let mut b = game("B");
        b.platform = vec!["Switch".to_string()];
        let catalog = vec![a, b];

        let filters = FilterState {
            platform: Some("ps".to_string()),
            ..FilterState::default()
        };
        let result = apply_facets(catalog.iter().collect(), &filters, &options());
        assert_eq!(titles(&result), vec!["A"]);
    }

    #[test]
    fn test_language_facet_uses_synonyms() {
        let mut a = game("A");
        a.language = Some("Tiếng Việt (100%)".to_string());
        let mut b = game("B");
        b.language = Some("English".to_string());
        let c = game("C");
        let catalog = vec![a, b, c];

        let filters = FilterState {
            language: Some("vietnamese".to_string()),
            ..FilterState::default()
        };
        let result = apply_facets(catalog.iter().collect(), &filters, &options());
        assert_eq!(titles(&result), vec!["A"]);
    }

    #[test]
    fn test_engine_and_genre_facets() {
        let mut a = game("A");
        a.engine = Some("Unreal Engine 5".to_string());
        a.genre = vec!["RPG".to_string()];
        let mut b = game("B");
        b.engine = Some("Unity".to_string());
        b.genre = vec!["Action RPG".to_string()];
        let catalog = vec![a, b];

        let filters = FilterState {
            engine: Some("UNREAL".to_string()),
            ..FilterState::default()
        };
        assert_eq!(
            titles(&apply_facets(catalog.iter().collect(), &filters, &options())),
            vec!["A"]
        );

        // Genre is exact membership, not substring
        let filters = FilterState {
            genre: Some("RPG".to_string()),
            ..FilterState::default()
        };
        assert_eq!(
            titles(&apply_facets(catalog.iter().collect(), &filters, &options())),
            vec!["A"]
        );
    }

    #[test]
    fn test_sort_by_downloads_descending() {
        let mut alpha = game("Alpha");
        alpha.rating = Some(4.5);
        alpha.downloads = Some(100);
        let mut beta = game("Beta");
        beta.rating = Some(4.5);
        beta.downloads = Some(50_000);
        let catalog = vec![alpha, beta];

        let result = sort(catalog.iter().collect(), "downloads");
        assert_eq!(titles(&result), vec!["Beta", "Alpha"]);
    }

    #[test]
    fn test_sort_rating_missing_as_zero() {
        let mut a = game("A");
        a.rating = Some(3.0);
        let b = game("B");
        let mut c = game("C");
        c.rating = Some(4.8);
        let catalog = vec![a, b, c];

        assert_eq!(
            titles(&sort(catalog.iter().collect(), "rating")),
            vec!["C", "A", "B"]
        );
        assert_eq!(
            titles(&sort(catalog.iter().collect(), "rating-asc")),
            vec!["B", "A", "C"]
        );
    }

    #[test]
    fn test_sort_newest_missing_date_is_oldest() {
        let mut a = game("A");
        a.release_date = Some("2023-05-01".to_string());
        let b = game("B");
        let mut c = game("C");
        c.release_date = Some("2024-11-20".to_string());
        let mut d = game("D");
        d.release_date = Some("1998-01-01".to_string());
        let catalog = vec![a, b, c, d];

        assert_eq!(
            titles(&sort(catalog.iter().collect(), "newest")),
            vec!["C", "A", "B", "D"]
        );
    }

    #[test]
    fn test_sort_name_desc() {
        let catalog = vec![game("beta"), game("Alpha"), game("Gamma")];
        assert_eq!(
            titles(&sort(catalog.iter().collect(), "name-desc")),
            vec!["Gamma", "beta", "Alpha"]
        );
    }

    #[test]
    fn test_unknown_sort_key_keeps_order() {
        let catalog = vec![game("Zeta"), game("Alpha"), game("Mu")];
        let result = sort(catalog.iter().collect(), "bogus");
        assert_eq!(titles(&result), vec!["Zeta", "Alpha", "Mu"]);
    }

    #[test]
    fn test_query_pipeline_order() {
        let mut a = game("Space Trader");
        a.price = Some(0.0);
        a.downloads = Some(10);
        let mut b = game("Space Race");
        b.downloads = Some(90_000);
        let mut c = game("Space Paid");
        c.price = Some(19.0);
        let catalog = vec![a, b, c, game("Farm Life")];

        let filters = FilterState::new()
            .with_query("space")
            .with_tag(TagPredicate::Free)
            .with_sort("downloads");
        let result = query_with(&catalog, &filters, &options());
        assert_eq!(titles(&result), vec!["Space Race", "Space Trader"]);
    }

    #[test]
    fn test_negative_zero_rating_ties_with_missing() {
        let mut a = game("A");
        a.rating = Some(-0.0);
        let b = game("B");
        let catalog = vec![a, b];

        assert_eq!(
            titles(&sort(catalog.iter().collect(), "rating")),
            vec!["A", "B"]
        );
        assert_eq!(
            titles(&sort(catalog.iter().collect(), "rating-asc")),
            vec!["A", "B"]
        );
    }

    #[test]
    fn test_genre_facet_is_verbatim() {
        let mut a = game("A");
        a.genre = vec!["RPG".to_string()];
        let catalog = vec![a];

        let filters = FilterState {
            genre: Some("RPG ".to_string()),
            ..FilterState::default()
        };
        assert!(apply_facets(catalog.iter().collect(), &filters, &options()).is_empty());

        let filters = FilterState {
            genre: Some("  ".to_string()),
            ..FilterState::default()
        };
        assert_eq!(
            apply_facets(catalog.iter().collect(), &filters, &options()).len(),
            1
        );
    }

    #[test]
    fn test_decomposed_text_matches_search_and_language() {
        // Same words as below, saved as base letters plus combining marks
        let mut a = game("Ho\u{0302}\u{0300}n Vie\u{0323}\u{0302}t");
        a.language = Some("Tie\u{0302}\u{0301}ng Vie\u{0323}\u{0302}t".to_string());
        let catalog = vec![a, game("Other")];

        assert_eq!(search(&catalog, "hồn việt").len(), 1);
        assert_eq!(search(&catalog, "HỒN").len(), 1);

        let filters = FilterState {
            language: Some("vi".to_string()),
            ..FilterState::default()
        };
        assert_eq!(
            apply_facets(catalog.iter().collect(), &filters, &options()).len(),
            1
        );
    }
}
