use std::sync::Arc;

use anyhow::Context;
use url_shortener::{
    AppState,
    config::Config,
    db, jobs, routes,
    services::{LinkService, SystemClock},
    store::{LinkStore, MemoryStore, PgStore},
    telemetry,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env().context("invalid configuration")?;
    telemetry::init_tracing(config.json_logs);

    let store: Arc<dyn LinkStore> = match &config.database_url {
        Some(database_url) => {
            let pool = db::connect_db(database_url, config.max_connections)
                .await
                .context("failed to connect to database")?;
            Arc::new(PgStore::new(pool))
        }
        None => {
            tracing::warn!("DATABASE_URL not set, links are kept in memory only");
            Arc::new(MemoryStore::new())
        }
    };

    let links = LinkService::new(store, Arc::new(SystemClock));
    let _cleanup = jobs::spawn_cleanup(links.clone(), config.cleanup_interval);

    let app = routes::router(AppState::new(links, config.public_base_url.clone()));

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("failed to bind to {}", config.bind_addr))?;

    tracing::info!(addr = %config.bind_addr, "server running");

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
