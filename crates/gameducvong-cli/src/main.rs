//! GAMEDUCVONG catalog browser
//!
//! Loads the game catalog and answers search, filter, and sort queries
//! from the command line. Also manages the remembered UI preferences.

mod render;

use anyhow::{Context, Result};
use chrono::Local;
use clap::{Args, Parser, Subcommand};
use std::collections::BTreeSet;
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use gameducvong_catalog::{BrowseSession, Catalog, CatalogSource, CatalogStats, ViewMode};
use gameducvong_config::{
    CONFIG_FILE, GameducvongConfig, PreferenceStore, Preferences, user_config_dir,
};

#[derive(Parser)]
#[command(name = "gameducvong")]
#[command(about = "Browse, search, and filter the GAMEDUCVONG game catalog", long_about = None)]
struct Cli {
    /// Config file (defaults to the system config layered with the user config)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Catalog path or URL, overriding the configured source
    #[arg(long, global = true)]
    catalog: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

/// Search, facet, and sort selections for a query
#[derive(Args, Clone, Default)]
struct QueryArgs {
    /// Free-text search over title, description, genres, tags, developer
    #[arg(short, long)]
    search: Option<String>,

    /// Platform substring (e.g. pc, ps5)
    #[arg(short, long)]
    platform: Option<String>,

    /// Language (e.g. vietnamese, english)
    #[arg(short, long)]
    language: Option<String>,

    /// Engine substring (e.g. unity, unreal)
    #[arg(short, long)]
    engine: Option<String>,

    /// Exact genre label
    #[arg(short, long)]
    genre: Option<String>,

    /// Tag filters, all must hold (featured, new, popular, small, free, multiplayer, singleplayer)
    #[arg(short, long = "tag", value_delimiter = ',')]
    tags: Vec<String>,

    /// Sort order (name, name-desc, rating, rating-asc, newest, downloads)
    #[arg(long)]
    sort: Option<String>,

    /// Layout (grid, list, compact)
    #[arg(long)]
    view: Option<ViewMode>,

    /// Print the result cards as JSON
    #[arg(long)]
    json: bool,

    /// Remember platform, sort, and view for next time
    #[arg(long)]
    remember: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Search and filter the catalog
    Query(QueryArgs),

    /// Show catalog statistics and available facet values
    Stats,

    /// Manage remembered preferences
    Prefs {
        #[command(subcommand)]
        action: PrefsAction,
    },

    /// Write a default config file
    Init {
        /// Destination (defaults to the user config directory)
        path: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
enum PrefsAction {
    /// Print remembered preferences
    Show,
    /// Remember a preference (theme, platform, view, sort)
    Set { key: String, value: String },
    /// Forget one preference
    Unset { key: String },
    /// Forget all preferences
    Reset,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Setup logging; stdout is reserved for results
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => GameducvongConfig::load(path)?,
        None => GameducvongConfig::load_default()?,
    };
    config.validate()?;

    match cli.command {
        Commands::Query(args) => {
            let catalog = load_catalog(&config, cli.catalog.as_deref()).await?;
            run_query(&config, catalog, args)
        }
        Commands::Stats => {
            let catalog = load_catalog(&config, cli.catalog.as_deref()).await?;
            run_stats(&catalog);
            Ok(())
        }
        Commands::Prefs { action } => run_prefs(&config, action),
        Commands::Init { path } => run_init(path),
    }
}

/// Load the catalog and apply the one-time backfill
async fn load_catalog(config: &GameducvongConfig, location: Option<&str>) -> Result<Catalog> {
    let source = CatalogSource::from_location(location.unwrap_or(&config.catalog.source));

    let mut catalog = Catalog::load_source(&source)
        .await
        .with_context(|| format!("Failed to load game catalog from {}", source))?;

    if config.catalog.backfill_defaults {
        catalog.backfill_defaults(&config.catalog.default_engine);
    }

    Ok(catalog)
}

fn run_query(config: &GameducvongConfig, catalog: Catalog, args: QueryArgs) -> Result<()> {
    let store = PreferenceStore::open_default();
    let mut prefs = match &store {
        Ok(store) => load_preferences(store),
        Err(e) => {
            warn!("Preferences unavailable, using defaults: {}", e);
            Preferences::default()
        }
    };

    let options = config.query.options(Local::now().date_naive());
    let mut session = BrowseSession::with_options(catalog, options);
    configure_session(&mut session, config, &prefs, &args)?;

    let visible = session.visible();
    info!(
        "Showing {} of {} games",
        visible.len(),
        session.catalog().len()
    );

    if args.json {
        let cards: Vec<_> = visible.iter().map(|r| render::card(r)).collect();
        println!("{}", serde_json::to_string_pretty(&cards)?);
    } else {
        render::print_results(&visible, session.view_mode());
    }

    if args.remember {
        let store = store?;
        remember(&mut prefs, &args)?;
        store.save(&prefs)?;
    }

    Ok(())
}

/// Remembered preferences; an unreadable file counts as nothing remembered
fn load_preferences(store: &PreferenceStore) -> Preferences {
    match store.load() {
        Ok(prefs) => prefs,
        Err(e) => {
            warn!(
                "Ignoring unreadable preferences at {}: {}",
                store.path().display(),
                e
            );
            Preferences::default()
        }
    }
}

/// Config defaults, then remembered preferences, then explicit arguments
fn configure_session(
    session: &mut BrowseSession,
    config: &GameducvongConfig,
    prefs: &Preferences,
    args: &QueryArgs,
) -> Result<()> {
    session.set_sort_key(config.query.default_sort.as_str());
    session.set_view_mode(config.ui.default_view);
    if let Some(sort) = prefs.sort {
        session.set_sort_key(sort.as_str());
    }
    if let Some(view) = prefs.view {
        session.set_view_mode(view);
    }
    session.set_platform(prefs.platform.clone());

    if let Some(search) = &args.search {
        session.set_query(search.as_str());
    }
    if let Some(platform) = &args.platform {
        session.set_platform(Some(platform.clone()));
    }
    session.set_language(args.language.clone());
    session.set_engine(args.engine.clone());
    session.set_genre(args.genre.clone());

    // Repeated names toggle once
    let tags: BTreeSet<String> = args.tags.iter().map(|t| t.trim().to_lowercase()).collect();
    for tag in &tags {
        session
            .toggle_tag(tag)
            .with_context(|| format!("Invalid --tag value '{}'", tag))?;
    }

    if let Some(sort) = &args.sort {
        session.set_sort_key(sort.as_str());
    }
    if let Some(view) = args.view {
        session.set_view_mode(view);
    }
    Ok(())
}

fn remember(prefs: &mut Preferences, args: &QueryArgs) -> Result<()> {
    if let Some(platform) = &args.platform {
        prefs.set("platform", platform)?;
    }
    if let Some(sort) = &args.sort {
        prefs.set("sort", sort)?;
    }
    if let Some(view) = args.view {
        prefs.view = Some(view);
    }
    Ok(())
}

fn run_stats(catalog: &Catalog) {
    let stats = CatalogStats::compute(catalog.records());
    render::print_stats(&stats, catalog);
}

fn run_prefs(config: &GameducvongConfig, action: PrefsAction) -> Result<()> {
    let store = PreferenceStore::open_default()?;

    match action {
        PrefsAction::Show => {
            let prefs = store.load()?;
            render::print_preferences(&prefs, config, store.path());
        }
        PrefsAction::Set { key, value } => {
            let mut prefs = store.load()?;
            prefs.set(&key, &value)?;
            store.save(&prefs)?;
        }
        PrefsAction::Unset { key } => {
            let mut prefs = store.load()?;
            prefs.unset(&key)?;
            store.save(&prefs)?;
        }
        PrefsAction::Reset => store.reset()?,
    }

    Ok(())
}

fn run_init(path: Option<PathBuf>) -> Result<()> {
    let path = match path {
        Some(path) => path,
        None => user_config_dir()
            .context("No user configuration directory available")?
            .join(CONFIG_FILE),
    };

    if path.exists() {
        anyhow::bail!("{} already exists", path.display());
    }

    GameducvongConfig::default().save(&path)?;
    println!("Wrote {}", path.display());
    Ok(())
}
