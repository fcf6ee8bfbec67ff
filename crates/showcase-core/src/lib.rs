// Core showcase logic: normalise, filter, page, render, enrich
pub mod config;
pub mod engine;
pub mod enrich;
pub mod error;
pub mod fetch;
pub mod languages;
pub mod models;
pub mod normalize;
pub mod pager;
pub mod pipeline;
pub mod providers;
pub mod render;
pub mod source;
pub mod theme;

pub use config::Config;
pub use engine::{CollectionStats, Facets, ShowcaseView};
pub use enrich::{Enricher, GitHubEnricher, NoEnrichment};
pub use error::Error;
pub use fetch::{fetch_with_cache, FetchOutcome, Origin};
pub use models::{
    CollectionKind, DisplayItem, Enrichment, EnrichmentState, FilterState, LanguageBadge, Media,
    Page, SortKey, SourceItem,
};
pub use pipeline::{CollectionView, LoadTicket, Pipeline, PipelineOptions, PipelineState};
pub use providers::{DiscogsSource, GitHubSource};
pub use render::Renderer;
pub use source::CollectionSource;
pub use theme::Theme;

/// Result type alias because typing Result<T, Error> everywhere is tedious
pub type Result<T> = std::result::Result<T, Error>;
