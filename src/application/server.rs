use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tokio::net::TcpListener;
use tokio::signal;
use tracing::info;
use url::Url;

use crate::application::routes::app_router;
use crate::application::services::og_images::resolve_asset_url;
use crate::application::services::{OgImageService, RenderMode};
use crate::application::state::AppState;
use crate::domain::cards::SiteConfig;
use crate::infrastructure::cache::MemoryResponseCache;
use crate::infrastructure::renderer::SvgCardRenderer;

pub struct ServerConfig {
    pub bind_address: SocketAddr,
    pub public_url: Url,
    pub site: SiteConfig,
    pub assets_dir: PathBuf,
    pub background_path: String,
    pub mode: RenderMode,
    pub cache_capacity: usize,
    pub cache_ttl: Duration,
}

pub async fn serve(config: ServerConfig) -> anyhow::Result<()> {
    let background_url = resolve_asset_url(&config.public_url, &config.background_path)
        .with_context(|| format!("invalid background path {}", config.background_path))?;

    let http_client = reqwest::ClientBuilder::new()
        .timeout(Duration::from_secs(30))
        .build()
        .context("failed to build HTTP client")?;

    let renderer = tokio::task::spawn_blocking(move || SvgCardRenderer::new(http_client))
        .await
        .context("failed to load fonts")?;

    let mut og_images = OgImageService::new(
        Arc::new(renderer),
        config.site,
        background_url.clone(),
        config.mode,
    );
    if config.mode == RenderMode::Production {
        let cache = MemoryResponseCache::new(config.cache_capacity, config.cache_ttl);
        og_images = og_images.with_cache(Arc::new(cache), config.public_url.clone());
    }

    let state = AppState::new(og_images).with_assets_dir(&config.assets_dir);

    let listener = TcpListener::bind(config.bind_address)
        .await
        .with_context(|| format!("failed to bind to {}", config.bind_address))?;

    let app = app_router(state);

    info!(
        address = %config.bind_address,
        public_url = %config.public_url,
        background = %background_url,
        mode = ?config.mode,
        "starting HTTP server"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server terminated unexpectedly")?;

    info!("server shutdown complete");

    Ok(())
}

#[allow(clippy::expect_used)] // Startup: panicking is appropriate if signal handlers fail
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
}
