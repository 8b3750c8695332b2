use crate::disc::{CollectionEntry, DiscRecord};
use crate::error::CacheError;
use crate::ids::AccountId;
use async_trait::async_trait;
use std::time::Duration;

pub type Result<T> = std::result::Result<T, CacheError>;

/// Prefix of every collection key, keeping disc listings apart from any
/// other entity sharing the same store.
pub const CACHE_KEY_PREFIX: &str = "discs_data_";

/// Lifetime of a cached collection.
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(60 * 60 * 24);

/// Generates the store key for an account's collection.
pub fn cache_key(account: &AccountId) -> String {
    format!("{CACHE_KEY_PREFIX}{account}")
}

/// A cache of disc collections keyed by account.
///
/// Expiry is owned by the store: an entry is returned unchanged until its
/// TTL elapses and is absent afterwards. Callers never check freshness
/// themselves.
#[async_trait]
pub trait CollectionCache: Send + Sync + 'static {
    /// Get the collection for `account`.
    ///
    /// Returns `Ok(None)` if the key is missing or expired.
    async fn get(&self, account: &AccountId) -> Result<Option<CollectionEntry>>;

    /// Store the collection for `account`, replacing any previous entry and
    /// restarting its TTL window.
    async fn put(&self, account: &AccountId, discs: &[DiscRecord], ttl: Duration) -> Result<()>;
}
