use std::sync::Arc;

use cdshelf_core::DiscCatalog;

#[derive(Clone)]
pub struct AppState {
    catalog: Arc<dyn DiscCatalog>,
    upstream_base_url: String,
}

impl AppState {
    /// `upstream_base_url` is where rendered disc links point when a disc
    /// has no promo link of its own.
    pub fn new(catalog: Arc<dyn DiscCatalog>, upstream_base_url: impl Into<String>) -> Self {
        Self {
            catalog,
            upstream_base_url: upstream_base_url.into(),
        }
    }

    pub fn catalog(&self) -> &dyn DiscCatalog {
        self.catalog.as_ref()
    }

    pub fn upstream_base_url(&self) -> &str {
        &self.upstream_base_url
    }
}
