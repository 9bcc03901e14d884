use std::net::SocketAddr;
use std::sync::Arc;
use anyhow::Context;
use pasaje_api::{app, AppState};
use pasaje_store::app_config::Config;
use pasaje_store::{RedisClient, Storage};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pasaje_api=debug,pasaje_catalog=debug,pasaje_order=info,tower_http=debug,axum::rejection=trace".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::load().context("Failed to load config")?;
    tracing::info!("Starting Pasaje API on port {}", config.server.port);

    let storage = Storage::connect(&config).await.context("Failed to initialise storage")?;
    let mut app_state = AppState::new(&storage, config.storage.timeout());

    // Redis Connection (optional, enables rate limiting)
    if let Some(url) = config.redis.url.as_deref() {
        let redis_client = RedisClient::new(url).await.context("Failed to configure Redis")?;
        if let Err(e) = redis_client.ping().await {
            tracing::warn!("Redis not reachable yet, rate limiting will fail open: {}", e);
        }
        app_state = app_state.with_rate_limit(Arc::new(redis_client), config.rate_limit.clone());
    }

    let app = app(app_state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await.context("Failed to bind listener")?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>()
    ).await.context("Server error")?;

    Ok(())
}
