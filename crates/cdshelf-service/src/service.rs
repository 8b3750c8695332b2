use std::sync::Arc;

use crate::config::ServiceConfig;
use crate::normalize::normalize_collection;
use async_trait::async_trait;
use cdshelf_core::{
    AccountId, CollectionCache, DiscCatalog, DiscRecord, ItemId, ServiceError, Upstream,
};
use cdshelf_extractor::DiscExtractor;
use tracing::{debug, trace, warn};

type Result<T> = std::result::Result<T, ServiceError>;

/// Serves disc listings through a read-through cache and single discs
/// straight from their detail pages.
///
/// Identifiers are validated before any cache or upstream access. Cache
/// faults never fail a request: a failed read counts as a miss and a
/// failed write is logged and dropped.
#[derive(Debug)]
pub struct DiscService<C, U> {
    cache: Arc<C>,
    upstream: Arc<U>,
    extractor: Arc<DiscExtractor>,
    config: ServiceConfig,
}

impl<C, U> Clone for DiscService<C, U> {
    fn clone(&self) -> Self {
        Self {
            cache: Arc::clone(&self.cache),
            upstream: Arc::clone(&self.upstream),
            extractor: Arc::clone(&self.extractor),
            config: self.config.clone(),
        }
    }
}

impl<C: CollectionCache, U: Upstream> DiscService<C, U> {
    /// Creates a new DiscService with the default configuration.
    ///
    /// # Arguments
    ///
    /// * `cache` - Store for bulk listings
    /// * `upstream` - Client for the catalog service
    /// * `extractor` - Reads detail pages
    pub fn new(cache: C, upstream: U, extractor: DiscExtractor) -> Self {
        Self {
            cache: Arc::new(cache),
            upstream: Arc::new(upstream),
            extractor: Arc::new(extractor),
            config: ServiceConfig::default(),
        }
    }

    pub fn with_config(mut self, config: ServiceConfig) -> Self {
        self.config = config;
        self
    }

    async fn cached(&self, account: &AccountId) -> Option<Vec<DiscRecord>> {
        match self.cache.get(account).await {
            Ok(Some(entry)) => {
                debug!(account = %account, discs = entry.discs.len(), "Serving collection from cache");
                Some(entry.into_discs())
            }
            Ok(None) => {
                trace!(account = %account, "Collection not cached");
                None
            }
            Err(e) => {
                warn!(account = %account, error = %e, "Cache read failed, treating as miss");
                None
            }
        }
    }
}

#[async_trait]
impl<C: CollectionCache, U: Upstream> DiscCatalog for DiscService<C, U> {
    async fn list_discs(&self, account_id: &str) -> Result<Vec<DiscRecord>> {
        let account = AccountId::parse(account_id)?;
        trace!(account = %account, "Listing discs");

        if let Some(discs) = self.cached(&account).await {
            return Ok(discs);
        }

        let payload = self
            .upstream
            .fetch_collection(&account, self.config.page_size)
            .await?;
        let discs = normalize_collection(payload)?;
        debug!(account = %account, discs = discs.len(), "Fetched collection from upstream");

        if let Err(e) = self
            .cache
            .put(&account, &discs, self.config.cache_ttl)
            .await
        {
            warn!(account = %account, error = %e, "Failed to cache collection");
        }

        Ok(discs)
    }

    async fn get_disc(&self, item_id: &str) -> Result<DiscRecord> {
        let item = ItemId::parse(item_id)?;
        trace!(item = %item, "Looking up disc");

        let html = self.upstream.fetch_detail_page(&item).await?;
        let mut disc = self.extractor.extract(&html);
        disc.id = item.to_string();

        debug!(item = %item, title = %disc.title, "Extracted disc from detail page");
        Ok(disc)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cdshelf_cache::MokaCollectionCache;
    use cdshelf_core::{CacheError, CollectionEntry, UpstreamError};
    use serde_json::{json, Value};
    use std::ops::Deref;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use std::time::Duration;

    #[derive(Default)]
    struct UpstreamState {
        collection: Mutex<Option<std::result::Result<Value, UpstreamError>>>,
        detail: Mutex<Option<std::result::Result<String, UpstreamError>>>,
        collection_calls: AtomicUsize,
        detail_calls: AtomicUsize,
        last_page_size: Mutex<Option<u32>>,
    }

    /// Upstream double that counts calls and answers with canned data.
    /// Clones share their state.
    #[derive(Clone, Default)]
    struct FakeUpstream(Arc<UpstreamState>);

    impl Deref for FakeUpstream {
        type Target = UpstreamState;

        fn deref(&self) -> &Self::Target {
            &self.0
        }
    }

    impl FakeUpstream {
        fn with_collection(payload: Value) -> Self {
            let fake = Self::default();
            fake.set_collection(Ok(payload));
            fake
        }

        fn with_detail(html: &str) -> Self {
            let fake = Self::default();
            *fake.detail.lock().unwrap() = Some(Ok(html.to_string()));
            fake
        }

        fn set_collection(&self, result: std::result::Result<Value, UpstreamError>) {
            *self.collection.lock().unwrap() = Some(result);
        }

        fn calls(&self) -> usize {
            self.collection_calls.load(Ordering::SeqCst) + self.detail_calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl Upstream for FakeUpstream {
        async fn fetch_collection(
            &self,
            _account: &AccountId,
            page_size: u32,
        ) -> std::result::Result<Value, UpstreamError> {
            self.collection_calls.fetch_add(1, Ordering::SeqCst);
            *self.last_page_size.lock().unwrap() = Some(page_size);
            self.collection
                .lock()
                .unwrap()
                .clone()
                .unwrap_or(Err(UpstreamError::Http { status: 404 }))
        }

        async fn fetch_detail_page(
            &self,
            _item: &ItemId,
        ) -> std::result::Result<String, UpstreamError> {
            self.detail_calls.fetch_add(1, Ordering::SeqCst);
            self.detail
                .lock()
                .unwrap()
                .clone()
                .unwrap_or(Err(UpstreamError::Http { status: 404 }))
        }
    }

    #[derive(Default)]
    struct CacheState {
        inner: MokaCollectionCache,
        fail_get: bool,
        fail_put: bool,
        gets: AtomicUsize,
        puts: AtomicUsize,
    }

    /// Cache double that counts calls and optionally fails them.
    /// Clones share their state.
    #[derive(Clone, Default)]
    struct CountingCache(Arc<CacheState>);

    impl Deref for CountingCache {
        type Target = CacheState;

        fn deref(&self) -> &Self::Target {
            &self.0
        }
    }

    impl CountingCache {
        fn failing(fail_get: bool, fail_put: bool) -> Self {
            Self(Arc::new(CacheState {
                fail_get,
                fail_put,
                ..Default::default()
            }))
        }
    }

    #[async_trait]
    impl CollectionCache for CountingCache {
        async fn get(
            &self,
            account: &AccountId,
        ) -> cdshelf_core::cache::Result<Option<CollectionEntry>> {
            self.gets.fetch_add(1, Ordering::SeqCst);
            if self.fail_get {
                return Err(CacheError::Unavailable("connection refused".to_string()));
            }
            self.inner.get(account).await
        }

        async fn put(
            &self,
            account: &AccountId,
            discs: &[DiscRecord],
            ttl: Duration,
        ) -> cdshelf_core::cache::Result<()> {
            self.puts.fetch_add(1, Ordering::SeqCst);
            if self.fail_put {
                return Err(CacheError::Timeout("put".to_string()));
            }
            self.inner.put(account, discs, ttl).await
        }
    }

    fn sample_payload() -> Value {
        json!({
            "discs": [{
                "id": "1",
                "title": "Album A",
                "cover": "http://x/a.jpg",
                "label": "Label A",
                "labelid": 5,
                "labelcover": "",
                "boost": null,
                "comment": "",
                "onlyhavegift": false
            }]
        })
    }

    fn album_a() -> DiscRecord {
        DiscRecord {
            id: "1".to_string(),
            title: "Album A".to_string(),
            cover: "http://x/a.jpg".to_string(),
            label: "Label A".to_string(),
            label_id: 5,
            ..Default::default()
        }
    }

    fn service(
        cache: &CountingCache,
        upstream: &FakeUpstream,
    ) -> DiscService<CountingCache, FakeUpstream> {
        DiscService::new(cache.clone(), upstream.clone(), DiscExtractor::new().unwrap())
    }

    #[tokio::test]
    async fn list_discs_fetches_then_serves_from_cache() {
        let cache = CountingCache::default();
        let upstream = FakeUpstream::with_collection(sample_payload());
        let service = service(&cache, &upstream);

        let first = service.list_discs("42").await.unwrap();
        assert_eq!(first, vec![album_a()]);
        assert_eq!(upstream.collection_calls.load(Ordering::SeqCst), 1);
        assert_eq!(cache.puts.load(Ordering::SeqCst), 1);

        let second = service.list_discs("42").await.unwrap();
        assert_eq!(second, first);
        assert_eq!(upstream.collection_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn list_discs_uses_configured_page_size() {
        let cache = CountingCache::default();
        let upstream = FakeUpstream::with_collection(sample_payload());

        service(&cache, &upstream).list_discs("42").await.unwrap();
        assert_eq!(*upstream.last_page_size.lock().unwrap(), Some(100));

        let custom = service(&cache, &upstream)
            .with_config(ServiceConfig::builder().page_size(20).build());
        custom.list_discs("43").await.unwrap();
        assert_eq!(*upstream.last_page_size.lock().unwrap(), Some(20));
    }

    #[tokio::test]
    async fn list_discs_refetches_after_expiry() {
        let cache = CountingCache::default();
        let upstream = FakeUpstream::with_collection(sample_payload());
        let service = service(&cache, &upstream).with_config(
            ServiceConfig::builder()
                .cache_ttl(Duration::from_millis(50))
                .build(),
        );

        service.list_discs("42").await.unwrap();
        service.list_discs("42").await.unwrap();
        assert_eq!(upstream.collection_calls.load(Ordering::SeqCst), 1);

        tokio::time::sleep(Duration::from_millis(100)).await;

        service.list_discs("42").await.unwrap();
        assert_eq!(upstream.collection_calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn equivalent_account_ids_share_a_cache_entry() {
        let cache = CountingCache::default();
        let upstream = FakeUpstream::with_collection(sample_payload());
        let service = service(&cache, &upstream);

        service.list_discs("42").await.unwrap();
        service.list_discs("0042").await.unwrap();
        assert_eq!(upstream.collection_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn invalid_account_ids_touch_nothing() {
        let cache = CountingCache::default();
        let upstream = FakeUpstream::with_collection(sample_payload());
        let service = service(&cache, &upstream);

        for raw in ["", "abc", "-1", "0", "1.5", "18446744073709551616"] {
            let err = service.list_discs(raw).await.unwrap_err();
            assert!(
                matches!(err, ServiceError::InvalidArgument(_)),
                "expected '{raw}' to be rejected, got {err:?}"
            );
        }

        assert_eq!(cache.gets.load(Ordering::SeqCst), 0);
        assert_eq!(cache.puts.load(Ordering::SeqCst), 0);
        assert_eq!(upstream.calls(), 0);
    }

    #[tokio::test]
    async fn cache_read_failure_falls_back_to_upstream() {
        let cache = CountingCache::failing(true, false);
        let upstream = FakeUpstream::with_collection(sample_payload());
        let service = service(&cache, &upstream);

        assert_eq!(service.list_discs("42").await.unwrap(), vec![album_a()]);
        assert_eq!(service.list_discs("42").await.unwrap(), vec![album_a()]);
        assert_eq!(upstream.collection_calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn cache_write_failure_is_not_fatal() {
        let cache = CountingCache::failing(false, true);
        let upstream = FakeUpstream::with_collection(sample_payload());
        let service = service(&cache, &upstream);

        assert_eq!(service.list_discs("42").await.unwrap(), vec![album_a()]);
        assert_eq!(cache.puts.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn upstream_failure_propagates_and_is_not_cached() {
        let cache = CountingCache::default();
        let upstream = FakeUpstream::default();
        upstream.set_collection(Err(UpstreamError::Http { status: 503 }));
        let service = service(&cache, &upstream);

        let err = service.list_discs("42").await.unwrap_err();
        assert!(matches!(
            err,
            ServiceError::Upstream(UpstreamError::Http { status: 503 })
        ));
        assert_eq!(cache.puts.load(Ordering::SeqCst), 0);

        upstream.set_collection(Ok(sample_payload()));
        assert_eq!(service.list_discs("42").await.unwrap(), vec![album_a()]);
    }

    #[tokio::test]
    async fn malformed_payload_is_an_upstream_error() {
        let cache = CountingCache::default();
        let upstream = FakeUpstream::with_collection(json!({ "error": "no user" }));
        let service = service(&cache, &upstream);

        let err = service.list_discs("42").await.unwrap_err();
        assert!(matches!(
            err,
            ServiceError::Upstream(UpstreamError::MalformedResponse(_))
        ));
        assert_eq!(cache.puts.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn empty_collection_is_cached() {
        let cache = CountingCache::default();
        let upstream = FakeUpstream::with_collection(json!({ "discs": [] }));
        let service = service(&cache, &upstream);

        assert!(service.list_discs("42").await.unwrap().is_empty());
        assert!(service.list_discs("42").await.unwrap().is_empty());
        assert_eq!(upstream.collection_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn get_disc_extracts_detail_page() {
        let cache = CountingCache::default();
        let upstream = FakeUpstream::with_detail(
            r#"<h1>Album</h1><div id="cover"><img src="/c.jpg"></div>"#,
        );
        let service = service(&cache, &upstream);

        let disc = service.get_disc("999").await.unwrap();
        assert_eq!(disc.id, "999");
        assert_eq!(disc.title, "Album");
        assert_eq!(disc.cover, "/c.jpg");
    }

    #[tokio::test]
    async fn get_disc_without_h1_has_empty_title() {
        let cache = CountingCache::default();
        let upstream = FakeUpstream::with_detail("<html><body></body></html>");
        let service = service(&cache, &upstream);

        let disc = service.get_disc("999").await.unwrap();
        assert_eq!(disc.id, "999");
        assert_eq!(disc.title, "");
    }

    #[tokio::test]
    async fn get_disc_is_never_cached() {
        let cache = CountingCache::default();
        let upstream = FakeUpstream::with_detail("<h1>Album</h1>");
        let service = service(&cache, &upstream);

        service.get_disc("999").await.unwrap();
        service.get_disc("999").await.unwrap();

        assert_eq!(upstream.detail_calls.load(Ordering::SeqCst), 2);
        assert_eq!(cache.gets.load(Ordering::SeqCst), 0);
        assert_eq!(cache.puts.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn get_disc_rejects_invalid_ids() {
        let cache = CountingCache::default();
        let upstream = FakeUpstream::with_detail("<h1>Album</h1>");
        let service = service(&cache, &upstream);

        for raw in ["", "  ", "a/b", "x?y", "../etc"] {
            assert!(matches!(
                service.get_disc(raw).await,
                Err(ServiceError::InvalidArgument(_))
            ));
        }
        assert_eq!(upstream.calls(), 0);
    }

    #[tokio::test]
    async fn get_disc_propagates_upstream_errors() {
        let cache = CountingCache::default();
        let upstream = FakeUpstream::default();
        let service = service(&cache, &upstream);

        let err = service.get_disc("404").await.unwrap_err();
        assert!(matches!(
            err,
            ServiceError::Upstream(UpstreamError::Http { status: 404 })
        ));
    }
}
