use std::sync::Arc;

use axum::http::{HeaderValue, Method};
use tower_http::cors::{Any, CorsLayer};
use tracing_subscriber::EnvFilter;

use watchai_api::{
    config::Config,
    db::{
        create_pool, create_redis_client, run_migrations, Cache, CacheWriterHandle, DocumentStore,
        InMemoryStore, PostgresStore, TrendingSource,
    },
    routes::{create_router, AppState},
    services::{
        providers::YouTubeProvider, CachedSimilarityGateway, SimilarityGateway,
        StoreSimilarityGateway,
    },
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("watchai_api=info,tower_http=info")),
        )
        .init();

    let config = Config::from_env()?;

    let (store, trending): (Arc<dyn DocumentStore>, Arc<dyn TrendingSource>) =
        match &config.database_url {
            Some(database_url) => {
                let pool = create_pool(database_url).await?;
                run_migrations(&pool).await?;
                tracing::info!("Connected to PostgreSQL");
                let store = Arc::new(PostgresStore::new(pool));
                (
                    store.clone() as Arc<dyn DocumentStore>,
                    store as Arc<dyn TrendingSource>,
                )
            }
            None => {
                tracing::warn!("DATABASE_URL not set, using an empty in-memory store");
                let store = Arc::new(InMemoryStore::new());
                (
                    store.clone() as Arc<dyn DocumentStore>,
                    store as Arc<dyn TrendingSource>,
                )
            }
        };

    let (cache, cache_handle): (Option<Cache>, Option<CacheWriterHandle>) =
        match &config.redis_url {
            Some(redis_url) => {
                let client = create_redis_client(redis_url)?;
                let (cache, handle) = Cache::connect(client).await?;
                tracing::info!("Connected to Redis");
                (Some(cache), Some(handle))
            }
            None => {
                tracing::info!("REDIS_URL not set, lookups are uncached");
                (None, None)
            }
        };

    let store_gateway: Arc<dyn SimilarityGateway> =
        Arc::new(StoreSimilarityGateway::new(store.clone()));
    let gateway: Arc<dyn SimilarityGateway> = match &cache {
        Some(cache) => Arc::new(CachedSimilarityGateway::new(
            store_gateway,
            cache.clone(),
            config.similarity_cache_ttl,
        )),
        None => store_gateway,
    };

    let mut state = AppState::new(store, trending, gateway, config.recommend_options());

    if let Some(api_key) = &config.youtube_api_key {
        state = state.with_metadata(Arc::new(YouTubeProvider::new(
            api_key.clone(),
            config.youtube_api_url.clone(),
            cache.clone(),
            config.metadata_cache_ttl,
        )));
    } else {
        tracing::info!("YOUTUBE_API_KEY not set, video details endpoint disabled");
    }

    let cors = CorsLayer::new()
        .allow_origin(config.cors_origin.parse::<HeaderValue>()?)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers(Any);

    let app = create_router(state).layer(cors);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Some(handle) = cache_handle {
        handle.shutdown().await;
    }

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
