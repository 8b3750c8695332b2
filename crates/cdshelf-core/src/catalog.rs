use crate::disc::DiscRecord;
use crate::error::ServiceError;
use async_trait::async_trait;

type Result<T> = std::result::Result<T, ServiceError>;

/// Read access to disc metadata, as consumed by the presentation layer.
///
/// Identifiers are passed in raw form; implementations validate them and
/// answer [`ServiceError::InvalidArgument`] before doing any I/O.
#[async_trait]
pub trait DiscCatalog: Send + Sync + 'static {
    /// Lists the discs collected by an account, in upstream order.
    async fn list_discs(&self, account_id: &str) -> Result<Vec<DiscRecord>>;

    /// Looks up a single disc from its detail page.
    async fn get_disc(&self, item_id: &str) -> Result<DiscRecord>;
}
