use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use magicstream_api::{
    config::Config,
    db::{create_pool, create_redis_client, run_migrations, Cache, CacheWriterHandle, CachedStore, PgStore},
    routes::create_router,
    services::OpenRouterClient,
    state::{AppState, Stores},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    let pool = create_pool(&config.database_url, config.storage_timeout()).await?;
    run_migrations(&pool).await?;
    let pg = PgStore::new(pool, config.storage_timeout());

    let mut stores = Stores::single(pg.clone());
    let mut cache_writer: Option<CacheWriterHandle> = None;

    if config.ranking_cache_ttl_secs > 0 {
        let client = create_redis_client(&config.redis_url)?;
        let (cache, writer) = Cache::connect(client).await?;
        let cached = Arc::new(CachedStore::new(pg, cache, config.ranking_cache_ttl_secs));
        stores.rankings = cached.clone();
        stores.genres = cached;
        cache_writer = Some(writer);
        tracing::info!(ttl_secs = config.ranking_cache_ttl_secs, "Vocabulary caching enabled");
    }

    let completion = Arc::new(OpenRouterClient::from_config(&config)?);
    if config.base_prompt_template.is_none() || config.openrouter_api_key.is_none() {
        tracing::warn!("Completion settings incomplete, review classification will fail until configured");
    }

    let addr = format!("{}:{}", config.host, config.port);
    let state = Arc::new(AppState::new(config, stores, completion));
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(%addr, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Some(writer) = cache_writer {
        writer.shutdown().await;
    }

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
    tracing::info!("Shutdown signal received");
}
