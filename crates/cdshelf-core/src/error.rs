use thiserror::Error;

/// Errors surfaced by a collection cache backend.
///
/// All variants describe a store fault. A missing key is not an error.
#[derive(Debug, Clone, Error)]
pub enum CacheError {
    #[error("cache backend unavailable: {0}")]
    Unavailable(String),
    #[error("cache operation timed out: {0}")]
    Timeout(String),
    #[error("cache serialization failed: {0}")]
    Serialization(String),
    #[error("cache value is invalid: {0}")]
    InvalidData(String),
    #[error("cache operation failed: {0}")]
    Operation(String),
}

/// Classified failures of a call to the upstream catalog service.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UpstreamError {
    /// No response was received (connect failure, timeout, reset).
    #[error("upstream unreachable: {0}")]
    Network(String),
    /// The upstream answered with a non-2xx status.
    #[error("upstream returned HTTP {status}")]
    Http { status: u16 },
    /// The body could not be read as the expected content type.
    #[error("upstream response is malformed: {0}")]
    MalformedResponse(String),
}

#[derive(Debug, Clone, Error)]
pub enum ServiceError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("upstream request failed: {0}")]
    Upstream(#[from] UpstreamError),
}
