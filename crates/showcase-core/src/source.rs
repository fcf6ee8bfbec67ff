use crate::{models::CollectionKind, models::SourceItem, Result};

/// Where a collection comes from
///
/// One implementation per provider (GitHub repos, Discogs records). The
/// pipeline only ever talks to this trait, so tests can swap in a mock
/// and never touch the network.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait CollectionSource: Send + Sync {
    fn kind(&self) -> CollectionKind;

    /// Fetch and normalise the whole collection of `owner`.
    /// Items come back in the provider's order.
    async fn fetch(&self, owner: &str) -> Result<Vec<SourceItem>>;
}
