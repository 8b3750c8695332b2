//! Core types and traits for cdshelf.
//!
//! This crate provides the disc data model, validated identifiers and the
//! traits shared by the cache backends, the upstream client, the disc
//! service and the HTTP gateway.

pub mod cache;
pub mod catalog;
pub mod disc;
pub mod error;
pub mod ids;
pub mod upstream;

pub use cache::{cache_key, CollectionCache, CACHE_KEY_PREFIX, DEFAULT_CACHE_TTL};
pub use catalog::DiscCatalog;
pub use disc::{CollectionEntry, DiscRecord};
pub use error::{CacheError, ServiceError, UpstreamError};
pub use ids::{AccountId, ItemId};
pub use upstream::{Upstream, DEFAULT_PAGE_SIZE};
