use std::str::FromStr;
use std::sync::Arc;

use anyhow::Context;
use common::storage::FilesystemImageStore;
use tracing::{Level, info};

use listing_server::config::AppConfig;
use listing_server::state::AppState;
use listing_server::{build_router, repository, seed};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::load().context("failed to load configuration")?;

    let level = Level::from_str(&config.server.log_level).unwrap_or(Level::INFO);
    tracing_subscriber::fmt().with_max_level(level).init();

    let images = FilesystemImageStore::new(
        config.storage.images_dir.clone(),
        config.storage.max_image_size,
    )
    .await
    .context("failed to prepare image directory")?;
    seed::ensure_default_image(images.images_dir())
        .await
        .context("failed to seed placeholder image")?;

    let items = repository::connect(&config.database)
        .await
        .context("failed to open item repository")?;

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let state = AppState {
        config: Arc::new(config),
        items,
        images: Arc::new(images),
    };
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!("http server started on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
