use async_trait::async_trait;
use cdshelf_core::cache::Result;
use cdshelf_core::{
    cache_key, AccountId, CacheError, CollectionCache, CollectionEntry, DiscRecord,
    DEFAULT_CACHE_TTL,
};
use jiff::{SignedDuration, Timestamp};
use std::time::Duration;
use tracing::{debug, trace, warn};

/// A Redis-based implementation of [`CollectionCache`].
///
/// Each collection is stored as the JSON array of its discs under
/// `discs_data_{account}` with a native Redis expiry, so Redis alone
/// decides when an entry stops existing.
///
/// Next to each collection a `{key}:ttl` key records the TTL the entry was
/// written with. Both keys are set in one transaction with the same
/// expiry. On read, `ttl_seconds` comes from that record and `fetched_at`
/// is derived from it and the key's remaining lifetime. Entries written
/// without the record fall back to the cache's default TTL.
#[derive(Debug, Clone)]
pub struct RedisCollectionCache {
    conn: redis::aio::MultiplexedConnection,
    namespace: String,
    default_ttl: Duration,
}

fn map_redis_error(operation: &str, err: redis::RedisError) -> CacheError {
    let message = format!("{operation}: {err}");
    let lowered = message.to_ascii_lowercase();
    if lowered.contains("timed out") {
        CacheError::Timeout(message)
    } else if lowered.contains("connection refused")
        || lowered.contains("broken pipe")
        || lowered.contains("connection reset")
        || lowered.contains("connection closed")
    {
        CacheError::Unavailable(message)
    } else {
        CacheError::Operation(message)
    }
}

impl RedisCollectionCache {
    /// Creates a new Redis collection cache.
    ///
    /// # Arguments
    ///
    /// * `conn` - A multiplexed Redis connection
    pub fn new(conn: redis::aio::MultiplexedConnection) -> Self {
        Self {
            conn,
            namespace: String::new(),
            default_ttl: DEFAULT_CACHE_TTL,
        }
    }

    /// Creates a new Redis collection cache whose keys live under a
    /// namespace, e.g. `"staging:"` gives `staging:discs_data_42`.
    ///
    /// # Arguments
    ///
    /// * `conn` - A multiplexed Redis connection
    /// * `namespace` - Prefix placed before every collection key
    pub fn with_namespace(
        conn: redis::aio::MultiplexedConnection,
        namespace: impl Into<String>,
    ) -> Self {
        Self {
            namespace: namespace.into(),
            ..Self::new(conn)
        }
    }

    /// Sets the TTL assumed for entries that carry no TTL record.
    pub fn default_ttl(mut self, ttl: Duration) -> Self {
        self.default_ttl = ttl;
        self
    }

    /// Generates the full Redis key for an account.
    fn key(&self, account: &AccountId) -> String {
        format!("{}{}", self.namespace, cache_key(account))
    }
}

fn ttl_key(key: &str) -> String {
    format!("{key}:ttl")
}

/// Reconstructs the write time from the TTL an entry was written with and
/// its remaining lifetime in milliseconds.
fn fetched_at(ttl_seconds: u64, remaining_millis: i64) -> Timestamp {
    let now = Timestamp::now();
    if remaining_millis < 0 {
        return now;
    }

    let total = i64::try_from(ttl_seconds)
        .unwrap_or(i64::MAX)
        .saturating_mul(1000);
    let elapsed = total.saturating_sub(remaining_millis).max(0);
    now.checked_sub(SignedDuration::from_millis(elapsed))
        .unwrap_or(now)
}

#[async_trait]
impl CollectionCache for RedisCollectionCache {
    async fn get(&self, account: &AccountId) -> Result<Option<CollectionEntry>> {
        let key = self.key(account);
        trace!(account = %account, key = %key, "Fetching collection from Redis cache");

        let mut conn = self.conn.clone();
        let (cached, remaining_millis, recorded_ttl): (Option<String>, i64, Option<u64>) =
            redis::pipe()
                .atomic()
                .get(&key)
                .pttl(&key)
                .get(ttl_key(&key))
                .query_async(&mut conn)
                .await
                .map_err(|e| {
                    warn!(account = %account, error = %e, "Redis error on get");
                    map_redis_error("failed to fetch collection from Redis", e)
                })?;

        let Some(cached) = cached else {
            trace!(account = %account, "Cache miss in Redis");
            return Ok(None);
        };

        debug!(account = %account, remaining_millis, "Cache hit in Redis");
        let discs = serde_json::from_str::<Vec<DiscRecord>>(&cached).map_err(|e| {
            warn!(account = %account, error = %e, "Failed to deserialize cached collection");
            CacheError::InvalidData(format!("invalid cached value for key '{key}': {e}"))
        })?;

        let ttl_seconds = recorded_ttl.unwrap_or_else(|| self.default_ttl.as_secs());
        Ok(Some(CollectionEntry {
            account_id: *account,
            discs,
            fetched_at: fetched_at(ttl_seconds, remaining_millis),
            ttl_seconds,
        }))
    }

    async fn put(&self, account: &AccountId, discs: &[DiscRecord], ttl: Duration) -> Result<()> {
        let key = self.key(account);
        trace!(account = %account, key = %key, "Storing collection in Redis cache");

        let json = serde_json::to_string(discs).map_err(|e| {
            warn!(account = %account, error = %e, "Failed to serialize collection for caching");
            CacheError::Serialization(format!("failed to serialize cache value: {e}"))
        })?;

        // EX rejects zero, so sub-second TTLs round up to one second
        let seconds = ttl.as_secs().max(1);

        let mut conn = self.conn.clone();
        let written = redis::pipe()
            .atomic()
            .set_ex(&key, json, seconds)
            .ignore()
            .set_ex(ttl_key(&key), seconds, seconds)
            .ignore()
            .query_async::<()>(&mut conn)
            .await;
        match written {
            Ok(()) => {
                debug!(account = %account, ttl_secs = seconds, "Cached collection in Redis");
                Ok(())
            }
            Err(e) => {
                warn!(account = %account, error = %e, "Failed to cache collection in Redis");
                Err(map_redis_error("failed to write collection to Redis", e))
            }
        }
    }
}
