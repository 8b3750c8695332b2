use crate::error::UpstreamError;
use crate::ids::{AccountId, ItemId};
use async_trait::async_trait;

pub type Result<T> = std::result::Result<T, UpstreamError>;

/// Items requested per bulk listing call.
pub const DEFAULT_PAGE_SIZE: u32 = 100;

/// The third-party catalog service.
///
/// Implementations classify failures but never retry.
#[async_trait]
pub trait Upstream: Send + Sync + 'static {
    /// Fetches the raw bulk listing payload for `account`, asking for at
    /// most `page_size` items.
    async fn fetch_collection(
        &self,
        account: &AccountId,
        page_size: u32,
    ) -> Result<serde_json::Value>;

    /// Fetches the HTML detail page of a single item.
    async fn fetch_detail_page(&self, item: &ItemId) -> Result<String>;
}
