use std::time::Duration;
use typed_builder::TypedBuilder;

/// Public dizzylab site.
pub const DEFAULT_BASE_URL: &str = "https://www.dizzylab.net";

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

pub const DEFAULT_USER_AGENT: &str = concat!("cdshelf/", env!("CARGO_PKG_VERSION"));

/// Configuration for [`crate::DizzylabClient`].
#[derive(Debug, Clone, TypedBuilder)]
pub struct UpstreamConfig {
    /// Origin every request is resolved against.
    #[builder(default = DEFAULT_BASE_URL.to_string(), setter(into))]
    pub base_url: String,

    /// Total time allowed for one request, body included.
    #[builder(default = DEFAULT_TIMEOUT)]
    pub timeout: Duration,

    #[builder(default = DEFAULT_USER_AGENT.to_string(), setter(into))]
    pub user_agent: String,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}
