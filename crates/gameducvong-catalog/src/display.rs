//! Display projections for game cards and catalog statistics

use crate::GameRecord;
use serde::Serialize;

/// Language shown on cards that don't declare one
pub const DEFAULT_LANGUAGE_LABEL: &str = "Tiếng Việt (100%)";

const NOT_AVAILABLE: &str = "N/A";
const MAX_BADGES: usize = 3;

/// Text a game card shows, derived from one record
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CardView {
    pub id: String,
    pub title: String,
    pub rating: String,
    pub size: String,
    pub downloads: String,
    pub genre_badges: Vec<String>,
    pub platforms: String,
    pub language: String,
    pub featured: bool,
}

impl CardView {
    pub fn from_record(record: &GameRecord) -> Self {
        // A rating of 0 reads as unrated
        let rating = match record.rating {
            Some(rating) if rating != 0.0 => format!("{:.1}", rating),
            _ => NOT_AVAILABLE.to_string(),
        };

        let platforms = if record.platform.is_empty() {
            "PC".to_string()
        } else {
            record
                .platform
                .iter()
                .take(MAX_BADGES)
                .cloned()
                .collect::<Vec<_>>()
                .join(", ")
        };

        Self {
            id: record.id.clone(),
            title: record.title.clone(),
            rating,
            size: record
                .size
                .clone()
                .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
            downloads: format_downloads(record.downloads_or_zero()),
            genre_badges: record.genre.iter().take(MAX_BADGES).cloned().collect(),
            platforms,
            language: record
                .language
                .clone()
                .unwrap_or_else(|| DEFAULT_LANGUAGE_LABEL.to_string()),
            featured: record.is_featured(),
        }
    }
}

/// Compact download counter: 1.5M, 12.3K, 999
pub fn format_downloads(downloads: u64) -> String {
    if downloads >= 1_000_000 {
        format!("{:.1}M", downloads as f64 / 1_000_000.0)
    } else if downloads >= 1_000 {
        format!("{:.1}K", downloads as f64 / 1_000.0)
    } else {
        downloads.to_string()
    }
}

/// Header statistics for the catalog
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CatalogStats {
    pub game_count: usize,
    /// Mean rating, counting unrated games as 0
    pub average_rating: f64,
    pub featured_count: usize,
    pub total_downloads: u64,
}

impl CatalogStats {
    pub fn compute(records: &[GameRecord]) -> Self {
        if records.is_empty() {
            return Self::default();
        }

        let rating_sum: f64 = records.iter().map(GameRecord::rating_or_zero).sum();

        Self {
            game_count: records.len(),
            average_rating: rating_sum / records.len() as f64,
            featured_count: records.iter().filter(|r| r.is_featured()).count(),
            total_downloads: records
                .iter()
                .map(GameRecord::downloads_or_zero)
                .fold(0u64, u64::saturating_add),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_downloads() {
        assert_eq!(format_downloads(0), "0");
        assert_eq!(format_downloads(999), "999");
        assert_eq!(format_downloads(1_000), "1.0K");
        assert_eq!(format_downloads(45_600), "45.6K");
        assert_eq!(format_downloads(2_500_000), "2.5M");
    }

    #[test]
    fn test_card_defaults() {
        let mut record = GameRecord::new("Plain");
        record.platform.clear();
        let card = CardView::from_record(&record);

        assert_eq!(card.rating, "N/A");
        assert_eq!(card.size, "N/A");
        assert_eq!(card.downloads, "0");
        assert_eq!(card.platforms, "PC");
        assert_eq!(card.language, DEFAULT_LANGUAGE_LABEL);
        assert!(!card.featured);
    }

    #[test]
    fn test_card_truncates_lists() {
        let mut record = GameRecord::new("Busy");
        record.rating = Some(4.26);
        record.genre = ["A", "B", "C", "D"].iter().map(|s| s.to_string()).collect();
        record.platform = ["PC", "PS5", "Xbox", "Switch"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let card = CardView::from_record(&record);

        assert_eq!(card.genre_badges, vec!["A", "B", "C"]);
        assert_eq!(card.platforms, "PC, PS5, Xbox");
        assert_eq!(card.rating, "4.3");
    }

    #[test]
    fn test_zero_rating_reads_unrated() {
        let mut record = GameRecord::new("Zero");
        record.rating = Some(0.0);
        assert_eq!(CardView::from_record(&record).rating, "N/A");
    }

    #[test]
    fn test_stats() {
        let mut a = GameRecord::new("A");
        a.rating = Some(4.0);
        a.downloads = Some(100);
        a.featured = Some(true);
        let b = GameRecord::new("B");

        let stats = CatalogStats::compute(&[a, b]);
        assert_eq!(stats.game_count, 2);
        assert_eq!(stats.average_rating, 2.0);
        assert_eq!(stats.featured_count, 1);
        assert_eq!(stats.total_downloads, 100);

        assert_eq!(CatalogStats::compute(&[]), CatalogStats::default());
    }
}
