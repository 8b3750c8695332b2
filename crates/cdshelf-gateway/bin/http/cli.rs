use clap::{Parser, ValueEnum};
use std::fmt::{Display, Formatter};
use std::net::SocketAddr;

pub const LISTEN_ADDR_ENV: &str = "CDSHELF_LISTEN_ADDR";
pub const CACHE_BACKEND_ENV: &str = "CDSHELF_CACHE_BACKEND";
pub const REDIS_URL_ENV: &str = "CDSHELF_REDIS_URL";
pub const REDIS_NAMESPACE_ENV: &str = "CDSHELF_REDIS_NAMESPACE";
pub const MOKA_CAPACITY_ENV: &str = "CDSHELF_MOKA_CAPACITY";
pub const UPSTREAM_BASE_URL_ENV: &str = "CDSHELF_UPSTREAM_BASE_URL";
pub const UPSTREAM_TIMEOUT_ENV: &str = "CDSHELF_UPSTREAM_TIMEOUT_SECS";
pub const USER_AGENT_ENV: &str = "CDSHELF_USER_AGENT";
pub const PAGE_SIZE_ENV: &str = "CDSHELF_PAGE_SIZE";
pub const CACHE_TTL_ENV: &str = "CDSHELF_CACHE_TTL_SECS";
pub const LOG_FORMAT_ENV: &str = "CDSHELF_LOG_FORMAT";

pub const DEFAULT_LISTEN_ADDR: &str = "127.0.0.1:8787";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CacheBackendArg {
    #[value(name = "in-memory")]
    InMemory,
    #[value(name = "redis")]
    Redis,
}

impl Display for CacheBackendArg {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            CacheBackendArg::InMemory => write!(f, "in-memory"),
            CacheBackendArg::Redis => write!(f, "redis"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormatArg {
    Text,
    Json,
}

#[derive(Debug, Parser)]
#[command(name = "cdshelf-gateway")]
pub struct CLI {
    #[arg(long, env = LISTEN_ADDR_ENV, default_value = DEFAULT_LISTEN_ADDR)]
    pub listen_addr: SocketAddr,

    #[arg(
        long,
        env = CACHE_BACKEND_ENV,
        value_enum,
        default_value_t = CacheBackendArg::InMemory
    )]
    pub cache: CacheBackendArg,

    #[arg(long, env = REDIS_URL_ENV, required_if_eq("cache", "redis"))]
    pub redis_url: Option<String>,

    /// Prefix placed before every Redis key.
    #[arg(long, env = REDIS_NAMESPACE_ENV, default_value = "")]
    pub redis_namespace: String,

    /// Maximum number of collections held by the in-memory cache.
    #[arg(long, env = MOKA_CAPACITY_ENV, default_value_t = 10_000)]
    pub moka_capacity: u64,

    #[arg(long, env = UPSTREAM_BASE_URL_ENV, default_value = cdshelf_upstream::config::DEFAULT_BASE_URL)]
    pub upstream_base_url: String,

    #[arg(long, env = UPSTREAM_TIMEOUT_ENV, default_value_t = 10)]
    pub upstream_timeout_secs: u64,

    #[arg(long, env = USER_AGENT_ENV, default_value = cdshelf_upstream::config::DEFAULT_USER_AGENT)]
    pub user_agent: String,

    /// Items requested per bulk listing call.
    #[arg(
        long,
        env = PAGE_SIZE_ENV,
        default_value_t = cdshelf_core::DEFAULT_PAGE_SIZE,
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    pub page_size: u32,

    #[arg(
        long,
        env = CACHE_TTL_ENV,
        default_value_t = cdshelf_core::DEFAULT_CACHE_TTL.as_secs(),
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub cache_ttl_secs: u64,

    #[arg(long, env = LOG_FORMAT_ENV, value_enum, default_value_t = LogFormatArg::Text)]
    pub log_format: LogFormatArg,
}
