use async_trait::async_trait;
use cdshelf_core::cache::Result;
use cdshelf_core::{cache_key, AccountId, CollectionCache, CollectionEntry, DiscRecord};
use moka::future::Cache;
use moka::Expiry;
use std::time::{Duration, Instant};
use tracing::{debug, trace};

/// A cached entry together with the exact TTL it was stored with.
///
/// `CollectionEntry::ttl_seconds` is whole seconds; the store keeps the
/// precise duration so sub-second TTLs behave.
#[derive(Debug, Clone)]
struct Stored {
    entry: CollectionEntry,
    ttl: Duration,
}

/// Expires every entry after the TTL passed to `put`, restarting the
/// window when the entry is replaced.
struct PutTtl;

impl Expiry<String, Stored> for PutTtl {
    fn expire_after_create(
        &self,
        _key: &String,
        value: &Stored,
        _created_at: Instant,
    ) -> Option<Duration> {
        Some(value.ttl)
    }

    fn expire_after_update(
        &self,
        _key: &String,
        value: &Stored,
        _updated_at: Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        Some(value.ttl)
    }
}

/// An in-memory collection cache using Moka.
///
/// Entries expire on their own TTL; an expired entry is never returned even
/// if it has not been evicted yet.
#[derive(Debug, Clone)]
pub struct MokaCollectionCache {
    cache: Cache<String, Stored>,
}

impl MokaCollectionCache {
    /// Creates a new Moka collection cache with default settings.
    ///
    /// The cache holds at most 10,000 collections.
    pub fn new() -> Self {
        Self::with_capacity(10_000)
    }

    /// Creates a new Moka collection cache with a custom maximum capacity.
    ///
    /// # Arguments
    ///
    /// * `max_capacity` - Maximum number of collections the cache can hold
    pub fn with_capacity(max_capacity: u64) -> Self {
        let cache = Cache::builder()
            .max_capacity(max_capacity)
            .expire_after(PutTtl)
            .build();
        Self { cache }
    }
}

impl Default for MokaCollectionCache {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CollectionCache for MokaCollectionCache {
    async fn get(&self, account: &AccountId) -> Result<Option<CollectionEntry>> {
        trace!(account = %account, "Fetching collection from Moka cache");

        match self.cache.get(&cache_key(account)).await {
            Some(stored) => {
                debug!(account = %account, "Cache hit in Moka");
                Ok(Some(stored.entry))
            }
            None => {
                trace!(account = %account, "Cache miss in Moka");
                Ok(None)
            }
        }
    }

    async fn put(&self, account: &AccountId, discs: &[DiscRecord], ttl: Duration) -> Result<()> {
        trace!(account = %account, discs = discs.len(), "Storing collection in Moka cache");

        let stored = Stored {
            entry: CollectionEntry::new(*account, discs.to_vec(), ttl),
            ttl,
        };
        self.cache.insert(cache_key(account), stored).await;
        debug!(account = %account, ttl_ms = ttl.as_millis() as u64, "Cached collection in Moka");
        Ok(())
    }
}
