use cdshelf_core::{DEFAULT_CACHE_TTL, DEFAULT_PAGE_SIZE};
use std::time::Duration;
use typed_builder::TypedBuilder;

/// Tunables of a [`crate::DiscService`].
#[derive(Debug, Clone, TypedBuilder)]
pub struct ServiceConfig {
    /// Items requested per bulk listing call.
    #[builder(default = DEFAULT_PAGE_SIZE)]
    pub page_size: u32,

    /// Lifetime of a cached collection. One day unless overridden.
    #[builder(default = DEFAULT_CACHE_TTL)]
    pub cache_ttl: Duration,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}
