use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use ogcard::application::routes::app_router;
use ogcard::application::services::{OgImageService, RenderMode};
use ogcard::application::state::AppState;
use ogcard::domain::cards::{CardLayout, ImageSize, SiteConfig};
use ogcard::domain::errors::RenderError;
use ogcard::domain::images::RenderedImage;
use ogcard::domain::ports::CardRenderer;
use ogcard::infrastructure::cache::MemoryResponseCache;
use tokio::net::TcpListener;
use tokio::task::AbortHandle;
use url::Url;

pub const SITE_TITLE: &str = "Test Site";
pub const SITE_DESCRIPTION: &str = "A site used in tests";
pub const STUB_PNG_PREFIX: &[u8] = b"\x89PNG stub:";

/// Renderer stand-in that records calls and echoes the card text.
#[derive(Default)]
pub struct StubRenderer {
    pub calls: AtomicUsize,
    pub fail: bool,
}

impl StubRenderer {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CardRenderer for StubRenderer {
    async fn render(
        &self,
        layout: &CardLayout,
        size: ImageSize,
    ) -> Result<RenderedImage, RenderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(RenderError::Unavailable("stub renderer failure".to_string()));
        }
        let mut body = STUB_PNG_PREFIX.to_vec();
        body.extend_from_slice(
            format!(
                "{}x{}|{}|{}",
                size.width, size.height, layout.title.text, layout.description.text
            )
            .as_bytes(),
        );
        Ok(RenderedImage::png(body))
    }
}

pub struct TestApp {
    pub address: String,
    pub cache: Arc<MemoryResponseCache>,
    server_handle: AbortHandle,
}

impl TestApp {
    pub fn url(&self, path_and_query: &str) -> String {
        format!("{}{}", self.address, path_and_query)
    }

    pub async fn get(&self, path_and_query: &str) -> reqwest::Response {
        reqwest::Client::new()
            .get(self.url(path_and_query))
            .send()
            .await
            .expect("failed to send request")
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        self.server_handle.abort();
    }
}

pub fn site() -> SiteConfig {
    SiteConfig {
        title: SITE_TITLE.to_string(),
        description: SITE_DESCRIPTION.to_string(),
    }
}

pub async fn spawn_app(renderer: Arc<dyn CardRenderer>, mode: RenderMode) -> TestApp {
    spawn_app_inner(renderer, mode, None).await
}

/// Spawn an app that also serves `assets_dir` under `/assets`.
pub async fn spawn_app_with_assets(
    renderer: Arc<dyn CardRenderer>,
    mode: RenderMode,
    assets_dir: PathBuf,
) -> TestApp {
    spawn_app_inner(renderer, mode, Some(assets_dir)).await
}

async fn spawn_app_inner(
    renderer: Arc<dyn CardRenderer>,
    mode: RenderMode,
    assets_dir: Option<PathBuf>,
) -> TestApp {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind to random port");

    let local_addr = listener.local_addr().expect("Failed to get local address");
    let address = format!("http://{}", local_addr);
    let public_url = Url::parse(&address).expect("valid address");

    let cache = Arc::new(MemoryResponseCache::new(64, Duration::from_secs(60)));
    let og_images = OgImageService::new(
        renderer,
        site(),
        public_url
            .join("/assets/og-background.png")
            .expect("valid asset URL"),
        mode,
    )
    .with_cache(cache.clone(), public_url);

    let mut state = AppState::new(og_images);
    if let Some(dir) = assets_dir {
        state = state.with_assets_dir(dir);
    }
    let app = app_router(state);

    let server_handle = tokio::spawn(async move {
        axum::serve(listener, app)
            .await
            .expect("Server failed to start");
    })
    .abort_handle();

    TestApp {
        address,
        cache,
        server_handle,
    }
}

pub fn header<'a>(response: &'a reqwest::Response, name: &str) -> Option<&'a str> {
    response
        .headers()
        .get(name)
        .and_then(|value| value.to_str().ok())
}
