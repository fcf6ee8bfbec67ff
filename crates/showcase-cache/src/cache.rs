use std::sync::Arc;

use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, warn};

use crate::error::Result;
use crate::store::KeyValueStore;

/// One hour. Long enough to be polite to the APIs, short enough that a new
/// repo or record shows up the same afternoon.
pub const DEFAULT_TTL_MS: i64 = 60 * 60 * 1000;

/// Result of a cache read
///
/// A `Stale` payload must not be shown on its own; it exists so the caller
/// has something to fall back to when the live fetch fails.
#[derive(Debug, Clone, PartialEq)]
pub enum CacheLookup<T> {
    Fresh { payload: T, age_ms: i64 },
    Stale { payload: T, age_ms: Option<i64> },
    Miss,
}

impl<T> CacheLookup<T> {
    pub fn is_fresh(&self) -> bool {
        matches!(self, CacheLookup::Fresh { .. })
    }

    pub fn is_stale(&self) -> bool {
        matches!(self, CacheLookup::Stale { .. })
    }

    /// The payload regardless of age
    pub fn into_payload(self) -> Option<T> {
        match self {
            CacheLookup::Fresh { payload, .. } | CacheLookup::Stale { payload, .. } => {
                Some(payload)
            }
            CacheLookup::Miss => None,
        }
    }
}

/// Per-owner collection cache with a fixed time-to-live
///
/// Each entry is two keys, `{collection}_{owner}` holding the JSON payload and
/// `{collection}_time_{owner}` holding the epoch-millis write time.
pub struct CollectionCache {
    store: Arc<dyn KeyValueStore>,
    ttl_ms: i64,
}

impl CollectionCache {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            store,
            ttl_ms: DEFAULT_TTL_MS,
        }
    }

    pub fn ttl_ms(&self) -> i64 {
        self.ttl_ms
    }

    pub fn payload_key(collection: &str, owner: &str) -> String {
        format!("{}_{}", collection, owner)
    }

    pub fn time_key(collection: &str, owner: &str) -> String {
        format!("{}_time_{}", collection, owner)
    }

    pub fn get<T: DeserializeOwned>(&self, collection: &str, owner: &str) -> Result<CacheLookup<T>> {
        self.get_at(collection, owner, chrono::Utc::now().timestamp_millis())
    }

    /// Same as `get`, with the clock supplied by the caller
    pub fn get_at<T: DeserializeOwned>(
        &self,
        collection: &str,
        owner: &str,
        now_ms: i64,
    ) -> Result<CacheLookup<T>> {
        let payload_key = Self::payload_key(collection, owner);

        let Some(raw) = self.store.get_item(&payload_key)? else {
            debug!("Cache miss for {}", payload_key);
            return Ok(CacheLookup::Miss);
        };

        let payload: T = match serde_json::from_str(&raw) {
            Ok(payload) => payload,
            Err(e) => {
                warn!("Ignoring unreadable cache entry {}: {}", payload_key, e);
                return Ok(CacheLookup::Miss);
            }
        };

        // No usable timestamp means we can't prove freshness
        let stored_at = self
            .store
            .get_item(&Self::time_key(collection, owner))?
            .and_then(|raw| raw.trim().parse::<i64>().ok());

        let Some(stored_at) = stored_at else {
            debug!("Cache entry {} has no timestamp, treating as stale", payload_key);
            return Ok(CacheLookup::Stale {
                payload,
                age_ms: None,
            });
        };

        let age_ms = (now_ms - stored_at).max(0);
        if age_ms < self.ttl_ms {
            debug!("Cache hit for {} (age {}ms)", payload_key, age_ms);
            Ok(CacheLookup::Fresh { payload, age_ms })
        } else {
            debug!("Cache entry {} expired (age {}ms)", payload_key, age_ms);
            Ok(CacheLookup::Stale {
                payload,
                age_ms: Some(age_ms),
            })
        }
    }

    pub fn put<T: Serialize + ?Sized>(&self, collection: &str, owner: &str, payload: &T) -> Result<()> {
        self.put_at(
            collection,
            owner,
            payload,
            chrono::Utc::now().timestamp_millis(),
        )
    }

    pub fn put_at<T: Serialize + ?Sized>(
        &self,
        collection: &str,
        owner: &str,
        payload: &T,
        stored_at_ms: i64,
    ) -> Result<()> {
        let raw = serde_json::to_string(payload)?;
        self.store
            .set_item(&Self::payload_key(collection, owner), &raw)?;
        self.store
            .set_item(&Self::time_key(collection, owner), &stored_at_ms.to_string())?;
        Ok(())
    }

    /// Drop both keys of an entry
    pub fn clear(&self, collection: &str, owner: &str) -> Result<()> {
        self.store
            .remove_item(&Self::payload_key(collection, owner))?;
        self.store.remove_item(&Self::time_key(collection, owner))?;
        debug!("Cleared cache for {}_{}", collection, owner);
        Ok(())
    }
}
