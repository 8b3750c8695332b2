mod cli;

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use cdshelf_cache::{MokaCollectionCache, RedisCollectionCache};
use cdshelf_core::{CollectionCache, DiscCatalog};
use cdshelf_extractor::DiscExtractor;
use cdshelf_gateway::{App, AppState};
use cdshelf_service::{DiscService, ServiceConfig};
use cdshelf_upstream::{DizzylabClient, UpstreamConfig};
use clap::Parser;
use tracing::info;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use crate::cli::{CacheBackendArg, LogFormatArg, CLI};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = CLI::try_parse()?;
    init_tracing(config.log_format);

    info!(
        listen_addr = %config.listen_addr,
        cache_backend = %config.cache,
        upstream = %config.upstream_base_url,
        page_size = config.page_size,
        cache_ttl_secs = config.cache_ttl_secs,
        "starting cdshelf gateway"
    );

    let upstream = DizzylabClient::new(
        UpstreamConfig::builder()
            .base_url(config.upstream_base_url.clone())
            .timeout(Duration::from_secs(config.upstream_timeout_secs))
            .user_agent(config.user_agent.clone())
            .build(),
    )?;
    let service_config = ServiceConfig::builder()
        .page_size(config.page_size)
        .cache_ttl(Duration::from_secs(config.cache_ttl_secs))
        .build();

    let catalog: Arc<dyn DiscCatalog> = match config.cache {
        CacheBackendArg::InMemory => build_catalog(
            MokaCollectionCache::with_capacity(config.moka_capacity),
            upstream,
            service_config,
        )?,
        CacheBackendArg::Redis => {
            let redis_url = config
                .redis_url
                .as_deref()
                .context("redis url is required when cache backend is redis")?;
            let client = redis::Client::open(redis_url)?;
            let conn = client
                .get_multiplexed_async_connection()
                .await
                .context("failed to connect to redis")?;
            let cache = RedisCollectionCache::with_namespace(conn, config.redis_namespace.clone())
                .default_ttl(service_config.cache_ttl);
            build_catalog(cache, upstream, service_config)?
        }
    };

    let app = App::router(AppState::new(catalog, config.upstream_base_url));

    let listener = tokio::net::TcpListener::bind(config.listen_addr).await?;
    info!(listen_addr = %listener.local_addr()?, "listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("gateway stopped");
    Ok(())
}

fn build_catalog<C: CollectionCache>(
    cache: C,
    upstream: DizzylabClient,
    config: ServiceConfig,
) -> anyhow::Result<Arc<dyn DiscCatalog>> {
    let extractor = DiscExtractor::new()?;
    Ok(Arc::new(
        DiscService::new(cache, upstream, extractor).with_config(config),
    ))
}

fn init_tracing(format: LogFormatArg) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info,tower_http=debug".into());
    let registry = tracing_subscriber::registry().with(filter);

    match format {
        LogFormatArg::Text => registry.with(tracing_subscriber::fmt::layer()).init(),
        LogFormatArg::Json => registry
            .with(tracing_subscriber::fmt::layer().json())
            .init(),
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to listen for shutdown signal");
    }
}
