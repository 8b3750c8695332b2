//! Collection cache backends.
//!
//! Both backends implement [`cdshelf_core::CollectionCache`] and enforce
//! expiry at read time through the store itself:
//!
//! - [`RedisCollectionCache`] writes `SET discs_data_{account} <json> EX <ttl>`
//!   and is the shared, multi-instance backend.
//! - [`MokaCollectionCache`] keeps entries in process with a per-entry
//!   expiry and serves single-node deployments and tests.

pub mod moka;
pub mod redis;

pub use self::moka::MokaCollectionCache;
pub use self::redis::RedisCollectionCache;
