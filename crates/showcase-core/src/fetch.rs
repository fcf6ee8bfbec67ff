// Cache-first collection fetch with stale fallback
use showcase_cache::{CacheLookup, CollectionCache};
use tracing::{debug, info, warn};

use crate::{models::SourceItem, source::CollectionSource, Result};

/// Where a loaded collection came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    Network,
    /// Fresh cache hit, the network was never touched
    Cache,
    /// The live fetch failed and an expired entry was used instead
    StaleFallback,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FetchOutcome {
    pub items: Vec<SourceItem>,
    pub origin: Origin,
}

/// Load `owner`'s collection from `source`, going through `cache` when given
///
/// A fresh entry short-circuits the network. A stale one is only returned
/// if the live fetch fails. Cache errors are logged and otherwise ignored.
pub async fn fetch_with_cache(
    source: &dyn CollectionSource,
    cache: Option<&CollectionCache>,
    owner: &str,
) -> Result<FetchOutcome> {
    let collection = source.kind().cache_collection();

    let mut stale = None;
    if let Some(cache) = cache {
        match cache.get::<Vec<SourceItem>>(collection, owner) {
            Ok(CacheLookup::Fresh { payload, age_ms }) => {
                info!(
                    "Cache hit for {} of {} ({} items, {}s old)",
                    collection,
                    owner,
                    payload.len(),
                    age_ms / 1000
                );
                return Ok(FetchOutcome {
                    items: payload,
                    origin: Origin::Cache,
                });
            }
            Ok(CacheLookup::Stale { payload, .. }) => {
                debug!("Holding on to stale {} for {}", collection, owner);
                stale = Some(payload);
            }
            Ok(CacheLookup::Miss) => {}
            Err(e) => warn!("Cache read failed for {}: {}", collection, e),
        }
    }

    info!("Fetching {} for {}", collection, owner);
    match source.fetch(owner).await {
        Ok(items) => {
            if let Some(cache) = cache {
                match cache.put(collection, owner, &items) {
                    Ok(()) => debug!("Cached {} {} items", items.len(), collection),
                    Err(e) => warn!("Failed to cache {}: {}", collection, e),
                }
            }

            Ok(FetchOutcome {
                items,
                origin: Origin::Network,
            })
        }
        Err(e) => match stale {
            Some(items) if e.is_fetch_failure() => {
                warn!("Fetch failed ({}), falling back to stale cache", e);
                Ok(FetchOutcome {
                    items,
                    origin: Origin::StaleFallback,
                })
            }
            _ => Err(e),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CollectionKind;
    use crate::source::MockCollectionSource;
    use crate::Error;
    use showcase_cache::{MemoryStore, DEFAULT_TTL_MS};
    use std::sync::Arc;

    fn item(id: u64) -> SourceItem {
        SourceItem {
            id,
            title: format!("Record {}", id),
            creator: "Daughter".into(),
            creator_id: None,
            full_name: None,
            description: None,
            url: format!("https://www.discogs.com/release/{}", id),
            homepage: None,
            tags: vec!["Rock".into()],
            language: None,
            languages_url: None,
            stars: None,
            forks: None,
            watchers: None,
            year: Some(2023),
            timestamp: None,
            media_url: None,
            format: None,
        }
    }

    fn cache() -> CollectionCache {
        CollectionCache::new(Arc::new(MemoryStore::default()))
    }

    fn source() -> MockCollectionSource {
        let mut source = MockCollectionSource::new();
        source.expect_kind().return_const(CollectionKind::Vinyl);
        source
    }

    #[tokio::test]
    async fn test_fresh_cache_skips_network() {
        let cache = cache();
        cache.put("discogs_releases", "mattytr", &vec![item(1)]).unwrap();

        let mut source = source();
        source.expect_fetch().times(0);

        let outcome = fetch_with_cache(&source, Some(&cache), "mattytr").await.unwrap();
        assert_eq!(outcome.origin, Origin::Cache);
        assert_eq!(outcome.items, vec![item(1)]);
    }

    #[tokio::test]
    async fn test_fresh_entry_is_served_until_cleared() {
        let cache = cache();
        cache.put("discogs_releases", "mattytr", &vec![item(1), item(2)]).unwrap();

        // The source now yields a narrower list, e.g. after a config change
        let mut source = source();
        source
            .expect_fetch()
            .times(1)
            .returning(|_| Ok(vec![item(1)]));

        let outcome = fetch_with_cache(&source, Some(&cache), "mattytr").await.unwrap();
        assert_eq!(outcome.origin, Origin::Cache);
        assert_eq!(outcome.items.len(), 2);

        cache.clear("discogs_releases", "mattytr").unwrap();
        let outcome = fetch_with_cache(&source, Some(&cache), "mattytr").await.unwrap();
        assert_eq!(outcome.origin, Origin::Network);
        assert_eq!(outcome.items, vec![item(1)]);
    }

    #[tokio::test]
    async fn test_network_result_is_cached() {
        let cache = cache();
        let mut source = source();
        source
            .expect_fetch()
            .times(1)
            .returning(|_| Ok(vec![item(1), item(2)]));

        let outcome = fetch_with_cache(&source, Some(&cache), "mattytr").await.unwrap();
        assert_eq!(outcome.origin, Origin::Network);

        let lookup = cache
            .get::<Vec<SourceItem>>("discogs_releases", "mattytr")
            .unwrap();
        assert!(lookup.is_fresh());
        assert_eq!(lookup.into_payload().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_network_error_falls_back_to_stale() {
        let cache = cache();
        let expired = chrono::Utc::now().timestamp_millis() - DEFAULT_TTL_MS - 1;
        cache
            .put_at("discogs_releases", "mattytr", &vec![item(7)], expired)
            .unwrap();

        let mut source = source();
        source
            .expect_fetch()
            .times(1)
            .returning(|_| Err(Error::NetworkError("offline".into())));

        let outcome = fetch_with_cache(&source, Some(&cache), "mattytr").await.unwrap();
        assert_eq!(outcome.origin, Origin::StaleFallback);
        assert_eq!(outcome.items, vec![item(7)]);
    }

    #[tokio::test]
    async fn test_stale_entry_is_refreshed_when_network_works() {
        let cache = cache();
        cache
            .put_at("discogs_releases", "mattytr", &vec![item(7)], 0)
            .unwrap();

        let mut source = source();
        source
            .expect_fetch()
            .times(1)
            .returning(|_| Ok(vec![item(8)]));

        let outcome = fetch_with_cache(&source, Some(&cache), "mattytr").await.unwrap();
        assert_eq!(outcome.origin, Origin::Network);
        assert_eq!(outcome.items, vec![item(8)]);
    }

    #[tokio::test]
    async fn test_error_without_stale_entry_propagates() {
        let cache = cache();
        let mut source = source();
        source
            .expect_fetch()
            .returning(|_| Err(Error::DecodeError("bad json".into())));

        let err = fetch_with_cache(&source, Some(&cache), "mattytr")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::DecodeError(_)));
    }

    #[tokio::test]
    async fn test_without_cache_goes_straight_to_network() {
        let mut source = source();
        source.expect_fetch().times(1).returning(|_| Ok(vec![]));

        let outcome = fetch_with_cache(&source, None, "mattytr").await.unwrap();
        assert_eq!(outcome.origin, Origin::Network);
        assert!(outcome.items.is_empty());
    }
}
