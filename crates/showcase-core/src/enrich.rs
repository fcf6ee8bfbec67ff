// Lazy per-item lookups that run after a page is on screen
use async_trait::async_trait;
use showcase_api::{AssetProbe, GitHubClient};
use tracing::debug;

use crate::languages::badges;
use crate::models::{Enrichment, Media, SourceItem};

/// Best-effort extra data for one item
///
/// Failures never surface: an enricher that can't find anything returns
/// `None` and the item just drops its loading marker.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Enricher: Send + Sync {
    /// Whether `enrich` would do anything for this item
    fn applies_to(&self, item: &SourceItem) -> bool;

    async fn enrich(&self, item: &SourceItem) -> Option<Enrichment>;
}

/// Language breakdown plus the hosted-screenshot check for repositories
pub struct GitHubEnricher {
    client: GitHubClient,
    probe: Option<AssetProbe>,
}

impl GitHubEnricher {
    pub fn new(client: GitHubClient) -> Self {
        Self { client, probe: None }
    }

    pub fn with_screenshots(mut self, probe: AssetProbe) -> Self {
        self.probe = Some(probe);
        self
    }

    async fn languages(&self, item: &SourceItem) -> Vec<crate::models::LanguageBadge> {
        let Some(url) = &item.languages_url else {
            return Vec::new();
        };

        match self.client.get_languages(url).await {
            Ok(breakdown) => badges(&breakdown),
            Err(e) => {
                debug!("Language lookup for {} failed: {}", item.title, e);
                Vec::new()
            }
        }
    }

    async fn screenshot(&self, item: &SourceItem) -> Option<Media> {
        let probe = self.probe.as_ref()?;
        let url = probe.screenshot_url(&item.title);

        match probe.exists(&url).await {
            Ok(true) => Some(Media::Direct(url)),
            Ok(false) => None,
            Err(e) => {
                debug!("Screenshot check for {} failed: {}", item.title, e);
                None
            }
        }
    }
}

#[async_trait]
impl Enricher for GitHubEnricher {
    fn applies_to(&self, item: &SourceItem) -> bool {
        item.languages_url.is_some() || (self.probe.is_some() && item.media_url.is_none())
    }

    async fn enrich(&self, item: &SourceItem) -> Option<Enrichment> {
        let (languages, media) = futures::join!(self.languages(item), self.screenshot(item));

        let enrichment = Enrichment { languages, media };
        if enrichment.is_empty() {
            None
        } else {
            Some(enrichment)
        }
    }
}

/// For collections with nothing to look up (the vinyl grid)
#[derive(Debug, Default, Clone, Copy)]
pub struct NoEnrichment;

#[async_trait]
impl Enricher for NoEnrichment {
    fn applies_to(&self, _item: &SourceItem) -> bool {
        false
    }

    async fn enrich(&self, _item: &SourceItem) -> Option<Enrichment> {
        None
    }
}
