// Persistent key/value storage and the TTL collection cache built on it.
// Keeps API calls down and keeps the page usable when GitHub or Discogs is down.

pub mod cache;
pub mod error;
pub mod store;

pub use cache::{CacheLookup, CollectionCache, DEFAULT_TTL_MS};
pub use error::{CacheError, Result};
pub use store::{KeyValueStore, MemoryStore, SqliteStore};
