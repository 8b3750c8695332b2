use crate::config::UpstreamConfig;
use async_trait::async_trait;
use cdshelf_core::upstream::Result;
use cdshelf_core::{AccountId, ItemId, Upstream, UpstreamError};
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Response};
use thiserror::Error;
use tracing::{debug, trace, warn};
use url::Url;

/// Errors raised while building a [`DizzylabClient`].
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("invalid upstream base url '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },
    #[error("failed to build http client: {0}")]
    Build(#[from] reqwest::Error),
}

/// [`Upstream`] implementation talking to dizzylab over HTTP.
///
/// Every call is a single request: no retries, no caching. Failures are
/// classified into [`UpstreamError`] variants.
#[derive(Debug, Clone)]
pub struct DizzylabClient {
    http: Client,
    base_url: Url,
}

impl DizzylabClient {
    /// Creates a client from `config`.
    ///
    /// The base URL must be an absolute `http` or `https` URL.
    pub fn new(config: UpstreamConfig) -> std::result::Result<Self, ClientError> {
        let base_url = parse_base_url(&config.base_url)?;

        let http = Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent)
            .build()?;

        Ok(Self { http, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// `{base}/apis/getotheruserinfo/?r={page_size}&uid={account}`
    fn collection_url(&self, account: &AccountId, page_size: u32) -> Result<Url> {
        let mut url = self.join("apis/getotheruserinfo/")?;
        url.query_pairs_mut()
            .append_pair("r", &page_size.to_string())
            .append_pair("uid", &account.to_string());
        Ok(url)
    }

    /// `{base}/d/{item}/`
    fn detail_url(&self, item: &ItemId) -> Result<Url> {
        self.join(&format!("d/{item}/"))
    }

    fn join(&self, path: &str) -> Result<Url> {
        self.base_url
            .join(path)
            .map_err(|e| UpstreamError::Network(format!("cannot build request url: {e}")))
    }

    async fn send(&self, url: Url) -> Result<Response> {
        trace!(url = %url, "Sending upstream request");

        let response = self.http.get(url.clone()).send().await.map_err(|e| {
            warn!(url = %url, error = %e, timeout = e.is_timeout(), "Upstream request failed");
            UpstreamError::Network(e.to_string())
        })?;

        let status = response.status();
        if !status.is_success() {
            warn!(url = %url, status = status.as_u16(), "Upstream returned error status");
            return Err(UpstreamError::Http {
                status: status.as_u16(),
            });
        }

        debug!(url = %url, status = status.as_u16(), "Upstream responded");
        Ok(response)
    }
}

fn parse_base_url(raw: &str) -> std::result::Result<Url, ClientError> {
    let invalid = |reason: String| ClientError::InvalidBaseUrl {
        url: raw.to_string(),
        reason,
    };

    let mut url = Url::parse(raw).map_err(|e| invalid(e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid(format!("unsupported scheme '{}'", url.scheme())));
    }
    if url.cannot_be_a_base() {
        return Err(invalid("url cannot be a base".to_string()));
    }

    // Relative joins replace the last segment unless the path ends in '/'
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url.set_query(None);
    url.set_fragment(None);

    Ok(url)
}

/// Reads a body to a string, treating non-UTF-8 content as malformed.
async fn read_text(response: Response) -> Result<String> {
    let bytes = response
        .bytes()
        .await
        .map_err(|e| UpstreamError::Network(format!("failed to read response body: {e}")))?;

    String::from_utf8(bytes.to_vec())
        .map_err(|e| UpstreamError::MalformedResponse(format!("body is not valid UTF-8: {e}")))
}

/// Rejects bodies whose declared content type cannot be a web page.
///
/// A missing header is accepted.
fn ensure_textual(response: &Response) -> Result<()> {
    let Some(value) = response.headers().get(CONTENT_TYPE) else {
        return Ok(());
    };

    let content_type = value.to_str().unwrap_or_default().to_ascii_lowercase();
    let textual = content_type.starts_with("text/")
        || content_type.contains("html")
        || content_type.contains("xml");

    if textual {
        Ok(())
    } else {
        Err(UpstreamError::MalformedResponse(format!(
            "expected an HTML page, got content type '{content_type}'"
        )))
    }
}

#[async_trait]
impl Upstream for DizzylabClient {
    async fn fetch_collection(
        &self,
        account: &AccountId,
        page_size: u32,
    ) -> Result<serde_json::Value> {
        let url = self.collection_url(account, page_size)?;
        let response = self.send(url).await?;

        // The endpoint does not reliably label its JSON, so the body is
        // parsed regardless of content type.
        let body = read_text(response).await?;
        serde_json::from_str(&body).map_err(|e| {
            warn!(account = %account, error = %e, "Upstream collection is not JSON");
            UpstreamError::MalformedResponse(format!("collection body is not JSON: {e}"))
        })
    }

    async fn fetch_detail_page(&self, item: &ItemId) -> Result<String> {
        let url = self.detail_url(item)?;
        let response = self.send(url).await?;
        ensure_textual(&response)?;
        read_text(response).await
    }
}
