// SourceItem -> DisplayItem projection
use crate::models::{CollectionKind, DisplayItem, EnrichmentState, Media, Page, SourceItem};

/// GitHub renders a social preview card for every public repository
pub const OPENGRAPH_BASE: &str = "https://opengraph.githubassets.com/1";
pub const NO_DESCRIPTION: &str = "No description available.";
pub const UNKNOWN_ARTIST: &str = "Unknown Artist";
pub const UNKNOWN_TITLE: &str = "Unknown Title";
/// Cards only have room for a few topics
pub const MAX_TOPICS: usize = 3;

const DATE_FORMAT: &str = "%d.%m.%Y";

/// Builds display records. Never does I/O: anything that needs the network
/// is left to the enrichers and patched in afterwards.
#[derive(Debug, Clone, Copy)]
pub struct Renderer {
    kind: CollectionKind,
}

impl Renderer {
    pub fn new(kind: CollectionKind) -> Self {
        Self { kind }
    }

    pub fn kind(&self) -> CollectionKind {
        self.kind
    }

    pub fn render(&self, page: Page<&SourceItem>) -> Page<DisplayItem> {
        page.map(|item| self.display_item(item))
    }

    pub fn display_item(&self, item: &SourceItem) -> DisplayItem {
        match self.kind {
            CollectionKind::Repositories => self.repository(item),
            CollectionKind::Vinyl => self.release(item),
        }
    }

    /// Best image we can name without a network round trip:
    /// explicit media, then the provider preview, then a placeholder.
    pub fn resolve_media(&self, item: &SourceItem) -> Media {
        if let Some(url) = &item.media_url {
            return Media::Direct(url.clone());
        }

        match (self.kind, &item.full_name) {
            (CollectionKind::Repositories, Some(full_name)) => {
                Media::Generated(format!("{}/{}", OPENGRAPH_BASE, full_name))
            }
            _ => Media::Placeholder,
        }
    }

    fn repository(&self, item: &SourceItem) -> DisplayItem {
        DisplayItem {
            id: item.id,
            kind: self.kind,
            title: item.title.clone(),
            creator: item.creator.clone(),
            creator_url: Some(format!("https://github.com/{}", item.creator)),
            description: item
                .description
                .clone()
                .unwrap_or_else(|| NO_DESCRIPTION.to_string()),
            url: item.url.clone(),
            homepage: item.homepage.clone(),
            tags: item.tags.iter().take(MAX_TOPICS).cloned().collect(),
            primary_tag: item.language.clone(),
            stars: item.stars,
            forks: item.forks,
            popularity: Some(item.popularity()),
            year: item.year,
            date: item.timestamp.map(|t| t.format(DATE_FORMAT).to_string()),
            format: None,
            media: self.resolve_media(item),
            languages: Vec::new(),
            enrichment: EnrichmentState::Cleared,
        }
    }

    fn release(&self, item: &SourceItem) -> DisplayItem {
        DisplayItem {
            id: item.id,
            kind: self.kind,
            title: label_or(&item.title, UNKNOWN_TITLE),
            creator: label_or(&item.creator, UNKNOWN_ARTIST),
            creator_url: item
                .creator_id
                .map(|id| format!("https://www.discogs.com/artist/{}", id)),
            description: item.description.clone().unwrap_or_default(),
            url: item.url.clone(),
            homepage: None,
            tags: item.tags.clone(),
            primary_tag: item.tags.first().cloned(),
            stars: None,
            forks: None,
            popularity: None,
            year: item.year,
            date: item.timestamp.map(|t| t.format(DATE_FORMAT).to_string()),
            format: item.format.clone(),
            media: self.resolve_media(item),
            languages: Vec::new(),
            enrichment: EnrichmentState::Cleared,
        }
    }
}

fn label_or(value: &str, fallback: &str) -> String {
    if value.is_empty() {
        fallback.to_string()
    } else {
        value.to_string()
    }
}
