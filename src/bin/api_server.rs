// src/bin/api_server.rs

use anyhow::Context;
use product_catalog::infra::config::{AppConfig, StoreKind};
use product_catalog::infra::logging;
use product_catalog::transport::http::{self, AppState};
use product_catalog::{InMemoryCatalogStore, PgCatalogStore};
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::from_env().context("invalid configuration")?;
    logging::init(config.log_format);

    let items_per_page = config.pagination.items_per_page;
    info!(items_per_page, store = ?config.store, "starting product catalog");

    // --- Store Initialization ---
    let app_state = match (config.store, &config.database) {
        (StoreKind::Postgres, Some(database)) => {
            let store = Arc::new(PgCatalogStore::connect(database).await?);
            info!(
                max_connections = database.max_connections,
                "connected to PostgreSQL, schema ready"
            );
            AppState::from_store(store, items_per_page)
        }
        (StoreKind::Postgres, None) => {
            anyhow::bail!("PostgreSQL store selected without database settings")
        }
        (StoreKind::Memory, _) => {
            info!("using in-memory store; data is lost on shutdown");
            AppState::from_store(Arc::new(InMemoryCatalogStore::new()), items_per_page)
        }
    };

    // --- API Server Initialization ---
    let app = http::create_app(app_state);
    let addr = format!("{}:{}", config.server.bind_address, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!(%addr, "API server listening");
    info!("Swagger UI available at http://{addr}/api");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            if tokio::signal::ctrl_c().await.is_ok() {
                info!("shutdown signal received");
            }
        })
        .await?;

    Ok(())
}
