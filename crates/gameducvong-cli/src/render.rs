//! Terminal output for query results, stats, and preferences

use gameducvong_catalog::{CardView, Catalog, CatalogStats, GameRecord, ViewMode, format_downloads};
use gameducvong_config::{GameducvongConfig, Preferences};
use std::path::Path;

const TITLE_WIDTH: usize = 36;

pub fn card(record: &GameRecord) -> CardView {
    CardView::from_record(record)
}

pub fn print_results(records: &[&GameRecord], view: ViewMode) {
    if records.is_empty() {
        println!("No games match the current filters.");
        return;
    }

    match view {
        ViewMode::Grid => print_grid(records),
        ViewMode::List => print_list(records),
        ViewMode::Compact => {
            for record in records {
                println!("{}", record.title);
            }
        }
    }
}

fn print_grid(records: &[&GameRecord]) {
    println!(
        "{:<width$}  {:>6}  {:>10}  {:>9}  PLATFORMS",
        "TITLE",
        "RATING",
        "SIZE",
        "DOWNLOADS",
        width = TITLE_WIDTH
    );

    for record in records {
        let card = card(record);
        let marker = if card.featured { "*" } else { " " };
        println!(
            "{}{:<width$}  {:>6}  {:>10}  {:>9}  {}",
            marker,
            truncate(&card.title, TITLE_WIDTH - 1),
            card.rating,
            card.size,
            card.downloads,
            card.platforms,
            width = TITLE_WIDTH - 1
        );
    }
}

fn print_list(records: &[&GameRecord]) {
    for record in records {
        let card = card(record);
        let featured = if card.featured { "  [featured]" } else { "" };

        println!("{}{}", card.title, featured);
        if !record.description.is_empty() {
            println!("  {}", record.description);
        }
        if !card.genre_badges.is_empty() {
            println!("  Genres:    {}", card.genre_badges.join(", "));
        }
        println!("  Rating:    {}", card.rating);
        println!("  Size:      {}", card.size);
        println!("  Downloads: {}", card.downloads);
        println!("  Platforms: {}", card.platforms);
        println!("  Language:  {}", card.language);
        if let Some(link) = &record.download {
            println!("  Download:  {}", link);
        }
        for link in &record.alternative_links {
            println!("  Mirror:    {} ({})", link.name, link.url);
        }
        println!();
    }
}

pub fn print_stats(stats: &CatalogStats, catalog: &Catalog) {
    println!("Games:           {}", stats.game_count);
    println!("Average rating:  {:.1}", stats.average_rating);
    println!("Featured:        {}", stats.featured_count);
    println!("Total downloads: {}", format_downloads(stats.total_downloads));
    println!();
    println!("Genres:    {}", join_set(catalog.genres()));
    println!("Platforms: {}", join_set(catalog.platforms()));
    println!("Engines:   {}", join_set(catalog.engines()));
}

/// Remembered preferences, with the configured default for unset ones
pub fn print_preferences(prefs: &Preferences, config: &GameducvongConfig, path: &Path) {
    println!("Preferences ({})", path.display());
    println!(
        "  theme:    {}",
        setting(prefs.theme.as_deref(), &config.ui.theme)
    );
    println!(
        "  platform: {}",
        setting(prefs.platform.as_deref(), "all")
    );
    println!(
        "  view:     {}",
        setting(prefs.view.map(|v| v.as_str()), config.ui.default_view.as_str())
    );
    println!(
        "  sort:     {}",
        setting(prefs.sort.map(|s| s.as_str()), config.query.default_sort.as_str())
    );
}

fn setting(remembered: Option<&str>, default: &str) -> String {
    match remembered {
        Some(value) => value.to_string(),
        None => format!("{} (default)", default),
    }
}

fn join_set<'a>(values: impl IntoIterator<Item = &'a str>) -> String {
    let joined = values.into_iter().collect::<Vec<_>>().join(", ");
    if joined.is_empty() {
        "-".to_string()
    } else {
        joined
    }
}

/// Cut to `max` characters, marking the cut with an ellipsis
fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(max.saturating_sub(1)).collect();
    cut.push('…');
    cut
}
