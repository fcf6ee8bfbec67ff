// Discogs source - the record collection behind the vinyl grid
use async_trait::async_trait;
use showcase_api::DiscogsClient;
use tracing::debug;

use crate::{
    models::{CollectionKind, SourceItem},
    normalize::{releases_to_items, GenreOverrides},
    source::CollectionSource,
    Result,
};

pub struct DiscogsSource {
    client: DiscogsClient,
    overrides: GenreOverrides,
}

impl DiscogsSource {
    pub fn new(client: DiscogsClient) -> Self {
        Self {
            client,
            overrides: GenreOverrides::default(),
        }
    }

    pub fn with_overrides(mut self, overrides: GenreOverrides) -> Self {
        self.overrides = overrides;
        self
    }
}

#[async_trait]
impl CollectionSource for DiscogsSource {
    fn kind(&self) -> CollectionKind {
        CollectionKind::Vinyl
    }

    async fn fetch(&self, owner: &str) -> Result<Vec<SourceItem>> {
        let releases = self.client.list_collection(owner).await?;
        debug!("{} releases in {}'s collection", releases.len(), owner);

        Ok(releases_to_items(releases, &self.overrides))
    }
}
