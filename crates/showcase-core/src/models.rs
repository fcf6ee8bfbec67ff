use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Weights of the popularity score: two points per star, one per fork
pub const STARS_WEIGHT: u64 = 2;
pub const FORKS_WEIGHT: u64 = 1;

/// Which of the two collections an item belongs to
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum CollectionKind {
    Repositories,
    Vinyl,
}

impl CollectionKind {
    /// Prefix of this collection's cache keys
    pub fn cache_collection(&self) -> &'static str {
        match self {
            CollectionKind::Repositories => "github_repos",
            CollectionKind::Vinyl => "discogs_releases",
        }
    }
}

impl std::fmt::Display for CollectionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CollectionKind::Repositories => write!(f, "Repositories"),
            CollectionKind::Vinyl => write!(f, "Vinyl"),
        }
    }
}

/// A repository or a release, normalised once at the API boundary.
/// Every optional wire field has already been defaulted here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceItem {
    pub id: u64,
    /// Repository name or release title
    pub title: String,
    /// Repository owner or primary artist
    pub creator: String,
    #[serde(default)]
    pub creator_id: Option<u64>,
    /// `owner/name` for repositories
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    pub url: String,
    #[serde(default)]
    pub homepage: Option<String>,
    /// Topics for repositories, genres for releases (primary first)
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub languages_url: Option<String>,
    #[serde(default)]
    pub stars: Option<u32>,
    #[serde(default)]
    pub forks: Option<u32>,
    #[serde(default)]
    pub watchers: Option<u32>,
    #[serde(default)]
    pub year: Option<i32>,
    /// Last update for repositories, date added for releases
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
    /// Cover image; repositories never carry one from the API
    #[serde(default)]
    pub media_url: Option<String>,
    /// e.g. `Album 12"`
    #[serde(default)]
    pub format: Option<String>,
}

impl SourceItem {
    /// `2 x stars + forks`, missing counts treated as zero
    pub fn popularity(&self) -> u64 {
        STARS_WEIGHT * self.stars.unwrap_or(0) as u64 + FORKS_WEIGHT * self.forks.unwrap_or(0) as u64
    }

    /// Three-factor score used to pick featured repositories. The timestamp
    /// term is tiny and only separates otherwise equal repos.
    pub fn featured_score(&self) -> f64 {
        let stars = self.stars.unwrap_or(0) as f64;
        let forks = self.forks.unwrap_or(0) as f64;
        let watchers = self.watchers.unwrap_or(0) as f64;
        let recency = self
            .timestamp
            .map(|t| t.timestamp_millis() as f64 / 1_000_000_000.0)
            .unwrap_or(0.0);

        stars * 3.0 + forks * 2.0 + watchers + recency
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }
}

/// How the filtered list is ordered
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortKey {
    /// Keep the provider's order
    #[default]
    Source,
    Creator,
    Title,
    /// Newest year first
    Year,
    /// Most recently updated/added first
    Recent,
    /// Highest `2 x stars + forks` first
    Popularity,
    /// Highest three-factor score first
    Featured,
}

impl SortKey {
    pub fn all() -> &'static [SortKey] {
        &[
            SortKey::Source,
            SortKey::Creator,
            SortKey::Title,
            SortKey::Year,
            SortKey::Recent,
            SortKey::Popularity,
            SortKey::Featured,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::Source => "source",
            SortKey::Creator => "creator",
            SortKey::Title => "title",
            SortKey::Year => "year",
            SortKey::Recent => "recent",
            SortKey::Popularity => "popularity",
            SortKey::Featured => "featured",
        }
    }
}

impl std::fmt::Display for SortKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for SortKey {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // Accept the old dropdown values too
        match s.trim().to_lowercase().as_str() {
            "" | "source" | "default" => Ok(SortKey::Source),
            "creator" | "artist" | "owner" => Ok(SortKey::Creator),
            "title" | "name" => Ok(SortKey::Title),
            "year" => Ok(SortKey::Year),
            "recent" | "updated" | "date_added" => Ok(SortKey::Recent),
            "popularity" | "stars" => Ok(SortKey::Popularity),
            "featured" => Ok(SortKey::Featured),
            other => Err(crate::Error::InvalidInput(format!(
                "unknown sort key '{}'",
                other
            ))),
        }
    }
}

/// What the user has currently selected. The engine only ever reads it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterState {
    pub search: String,
    pub category: Option<String>,
    pub year: Option<i32>,
    pub sort: SortKey,
}

impl FilterState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search = term.into();
        self
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn year(mut self, year: i32) -> Self {
        self.year = Some(year);
        self
    }

    pub fn sort(mut self, sort: SortKey) -> Self {
        self.sort = sort;
        self
    }
}

/// Image shown for an item, best first
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Media {
    /// Cover art or a hosted screenshot
    Direct(String),
    /// Preview image the provider renders for us
    Generated(String),
    Placeholder,
}

impl Media {
    pub fn url(&self) -> Option<&str> {
        match self {
            Media::Direct(url) | Media::Generated(url) => Some(url),
            Media::Placeholder => None,
        }
    }
}

/// One language chip of a repository card
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanguageBadge {
    pub name: String,
    pub symbol: String,
    pub color: String,
    pub percent: u8,
}

impl LanguageBadge {
    /// Hover text; small shares don't get a percentage
    pub fn title(&self) -> String {
        if self.percent > 5 {
            format!("{} ({}%)", self.name, self.percent)
        } else {
            self.name.clone()
        }
    }
}

/// Result of the lazy per-item lookups
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Enrichment {
    pub languages: Vec<LanguageBadge>,
    /// Set when a better image was found
    pub media: Option<Media>,
}

impl Enrichment {
    pub fn is_empty(&self) -> bool {
        self.languages.is_empty() && self.media.is_none()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnrichmentState {
    /// Lookup in flight, show "Loading languages..."
    Pending,
    Done,
    /// Nothing to look up, or the lookup came back empty
    Cleared,
}

/// What actually gets drawn for one item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplayItem {
    pub id: u64,
    pub kind: CollectionKind,
    pub title: String,
    pub creator: String,
    pub creator_url: Option<String>,
    pub description: String,
    pub url: String,
    pub homepage: Option<String>,
    pub tags: Vec<String>,
    pub primary_tag: Option<String>,
    pub stars: Option<u32>,
    pub forks: Option<u32>,
    pub popularity: Option<u64>,
    pub year: Option<i32>,
    pub date: Option<String>,
    pub format: Option<String>,
    pub media: Media,
    pub languages: Vec<LanguageBadge>,
    pub enrichment: EnrichmentState,
}

impl DisplayItem {
    /// Upgrade the item in place with whatever the lookup found
    pub fn apply_enrichment(&mut self, enrichment: Option<Enrichment>) {
        match enrichment {
            Some(found) if !found.is_empty() => {
                if let Some(media) = found.media {
                    self.media = media;
                }
                self.languages = found.languages;
                self.enrichment = EnrichmentState::Done;
            }
            _ => self.enrichment = EnrichmentState::Cleared,
        }
    }
}

/// One page of a filtered list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// 1-based
    pub page_number: usize,
    pub page_size: usize,
    pub total_pages: usize,
    pub total_items: usize,
}

impl<T> Page<T> {
    pub fn has_prev(&self) -> bool {
        self.page_number > 1
    }

    pub fn has_next(&self) -> bool {
        self.page_number < self.total_pages
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            page_number: self.page_number,
            page_size: self.page_size,
            total_pages: self.total_pages,
            total_items: self.total_items,
        }
    }
}
