use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use showcase_api::github::MAX_PER_PAGE;
use showcase_api::{AssetProbe, DiscogsClient, GitHubClient};
use showcase_cache::{CollectionCache, KeyValueStore, SqliteStore};
use showcase_core::{
    CollectionKind, Config, DiscogsSource, FilterState, GitHubEnricher, GitHubSource,
    NoEnrichment, Pipeline, PipelineOptions, ShowcaseView, SortKey, Theme,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod view;

use view::TerminalView;

#[derive(Parser)]
#[command(name = "showcase")]
#[command(version, about = "GitHub projects and vinyl collection, straight from the APIs", long_about = None)]
struct Cli {
    /// Ignore the local cache for this run
    #[arg(long, global = true)]
    no_cache: bool,

    /// Print the page as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Show the project showcase
    Repos {
        /// GitHub user (defaults to the configured one)
        #[arg(long)]
        owner: Option<String>,

        #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
        token: Option<String>,

        /// Substring of the owner or repository name
        #[arg(short, long, default_value = "")]
        search: String,

        /// source, title, recent, popularity or featured
        #[arg(long, default_value = "source")]
        sort: String,

        /// all, recent or pinned
        #[arg(long, default_value = "pinned")]
        view: String,

        #[arg(long, default_value_t = 1)]
        page: usize,
    },
    /// Browse the record collection
    Vinyl {
        /// Discogs user (defaults to the configured one)
        #[arg(long)]
        owner: Option<String>,

        #[arg(long, env = "DISCOGS_TOKEN", hide_env_values = true)]
        token: Option<String>,

        /// Substring of the artist or title
        #[arg(short, long, default_value = "")]
        search: String,

        /// Exact genre, e.g. "Rock"
        #[arg(short, long)]
        genre: Option<String>,

        #[arg(short, long)]
        year: Option<i32>,

        /// source, artist, title, year or date_added
        #[arg(long, default_value = "source")]
        sort: String,

        #[arg(long, default_value_t = 1)]
        page: usize,

        #[arg(long)]
        page_size: Option<usize>,
    },
    /// Manage the local cache
    Cache {
        #[command(subcommand)]
        action: CacheCommand,
    },
    /// Show or change the colour theme preference
    Theme {
        /// dark, light or toggle
        value: Option<String>,
    },
}

#[derive(clap::Subcommand)]
enum CacheCommand {
    /// Drop the cached copy of a collection
    Clear {
        #[arg(value_enum)]
        collection: CollectionArg,

        #[arg(long)]
        owner: Option<String>,
    },
}

#[derive(Clone, Copy, clap::ValueEnum)]
enum CollectionArg {
    Repos,
    Vinyl,
}

impl From<CollectionArg> for CollectionKind {
    fn from(arg: CollectionArg) -> Self {
        match arg {
            CollectionArg::Repos => CollectionKind::Repositories,
            CollectionArg::Vinyl => CollectionKind::Vinyl,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr so --json output stays clean
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "showcase=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = Config::load().context("Failed to load config")?;

    match cli.command {
        Some(Commands::Repos {
            owner,
            token,
            search,
            sort,
            view,
            page,
        }) => {
            let owner = owner.unwrap_or_else(|| config.github.username.clone());
            let token = token.or_else(|| config.github.token.clone());
            tracing::info!("Showing repositories of {}", owner);

            let client = GitHubClient::with_base_url(token, config.github.api_url.clone())?;
            let source = GitHubSource::new(client.clone())
                .with_sort(config.github.sort.clone())
                .with_selection(config.github.selection());

            let mut enricher = GitHubEnricher::new(client);
            if let Some(base) = &config.github.screenshot_base {
                enricher = enricher.with_screenshots(AssetProbe::new(base.clone())?);
            }

            let view: ShowcaseView = view.parse()?;
            let options = PipelineOptions::new(owner)
                // one API page of repos fits on one screen page
                .page_size(MAX_PER_PAGE as usize)
                .view(view, config.github.pinned.clone())
                .start_page(page);

            let mut pipeline = Pipeline::new(
                Box::new(source),
                Box::new(enricher),
                TerminalView::new(),
                options,
            );
            if let Some(cache) = open_cache(&config, cli.no_cache)? {
                pipeline = pipeline.with_cache(cache);
            }

            let filter = FilterState::new().search(search).sort(sort.parse::<SortKey>()?);
            run(&mut pipeline, filter).await;
            print(pipeline.view(), cli.json)?;
        }
        Some(Commands::Vinyl {
            owner,
            token,
            search,
            genre,
            year,
            sort,
            page,
            page_size,
        }) => {
            let owner = owner.unwrap_or_else(|| config.discogs.username.clone());
            let token = token.or_else(|| config.discogs.token.clone());
            tracing::info!("Showing the record collection of {}", owner);

            let client = DiscogsClient::with_base_url(token, config.discogs.api_url.clone())?;
            let source = DiscogsSource::new(client).with_overrides(config.discogs.overrides());

            let options = PipelineOptions::new(owner)
                .page_size(page_size.unwrap_or(config.discogs.page_size))
                .start_page(page);

            let mut pipeline = Pipeline::new(
                Box::new(source),
                Box::new(NoEnrichment),
                TerminalView::new(),
                options,
            );
            if let Some(cache) = open_cache(&config, cli.no_cache)? {
                pipeline = pipeline.with_cache(cache);
            }

            let mut filter = FilterState::new().search(search).sort(sort.parse::<SortKey>()?);
            if let Some(genre) = genre {
                filter = filter.category(genre);
            }
            if let Some(year) = year {
                filter = filter.year(year);
            }

            run(&mut pipeline, filter).await;

            if !cli.json {
                let stats = pipeline.stats();
                if let (Some(oldest), Some(newest)) = (stats.oldest_year, stats.newest_year) {
                    println!("{} records, {} to {}", stats.total, oldest, newest);
                }
            }
            print(pipeline.view(), cli.json)?;
        }
        Some(Commands::Cache { action }) => match action {
            CacheCommand::Clear { collection, owner } => {
                let kind = CollectionKind::from(collection);
                let owner = owner.unwrap_or_else(|| match kind {
                    CollectionKind::Repositories => config.github.username.clone(),
                    CollectionKind::Vinyl => config.discogs.username.clone(),
                });

                let cache = CollectionCache::new(open_store(&config)?);
                cache.clear(kind.cache_collection(), &owner)?;
                println!("Cleared cached {} for {}", kind, owner);
            }
        },
        Some(Commands::Theme { value }) => {
            let store = open_store(&config)?;
            let theme = match value.as_deref() {
                None => Theme::load(store.as_ref())?,
                Some("toggle") => Theme::toggle(store.as_ref())?,
                Some(other) => {
                    let theme: Theme = other.parse()?;
                    theme.save(store.as_ref())?;
                    theme
                }
            };
            println!("{}", theme);
        }
        None => {
            println!("No command specified. Try --help");
        }
    }

    Ok(())
}

/// The filter is set before loading so the load renders straight into it,
/// on the start page from the options. Only that page gets enriched.
async fn run(pipeline: &mut Pipeline<TerminalView>, filter: FilterState) {
    pipeline.set_filter(filter).await;
    pipeline.load().await;
}

fn print(view: &TerminalView, json: bool) -> anyhow::Result<()> {
    if json {
        view.print_json()
    } else {
        view.print()
    }
}

fn open_store(config: &Config) -> anyhow::Result<Arc<dyn KeyValueStore>> {
    let path = config.cache_db_path()?;
    let store = SqliteStore::open(&path)
        .with_context(|| format!("Failed to open storage at {}", path.display()))?;
    Ok(Arc::new(store))
}

fn open_cache(config: &Config, no_cache: bool) -> anyhow::Result<Option<CollectionCache>> {
    if no_cache || !config.cache.enabled {
        return Ok(None);
    }
    Ok(Some(CollectionCache::new(open_store(config)?)))
}
