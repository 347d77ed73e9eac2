use std::sync::Arc;

use ogcard::application::services::RenderMode;

use crate::helpers::{
    SITE_DESCRIPTION, SITE_TITLE, STUB_PNG_PREFIX, StubRenderer, header, spawn_app,
};

// ===========================================================================
// Validation
// ===========================================================================

#[tokio::test]
async fn leading_slash_title_returns_400() {
    let renderer = Arc::new(StubRenderer::default());
    let app = spawn_app(renderer.clone(), RenderMode::Production).await;

    let response = app.get("/og-image?/title=x").await;

    assert_eq!(response.status(), 400);
    assert_eq!(header(&response, "cache-control"), Some("public, max-age=300"));
    let body = response.text().await.expect("failed to read body");
    assert_eq!(
        body,
        "Invalid OG query params. Use /og-image?title=...&description=..."
    );
    assert_eq!(renderer.calls(), 0);
}

#[tokio::test]
async fn leading_slash_description_and_subtitle_return_400() {
    let app = spawn_app(Arc::new(StubRenderer::default()), RenderMode::Production).await;

    for query in ["/description=x", "title=ok&/subtitle=x"] {
        let response = app.get(&format!("/og-image?{query}")).await;
        assert_eq!(response.status(), 400, "{query}");
    }
}

// ===========================================================================
// Production rendering and caching
// ===========================================================================

#[tokio::test]
async fn first_request_renders_with_long_lived_cache() {
    let renderer = Arc::new(StubRenderer::default());
    let app = spawn_app(renderer.clone(), RenderMode::Production).await;

    let response = app.get("/og-image?title=Hello&description=World").await;

    assert_eq!(response.status(), 200);
    assert_eq!(header(&response, "content-type"), Some("image/png"));
    assert_eq!(
        header(&response, "cache-control"),
        Some("public, max-age=86400")
    );
    assert_eq!(header(&response, "x-content-type-options"), Some("nosniff"));
    let body = response.bytes().await.expect("failed to read body");
    assert!(body.starts_with(STUB_PNG_PREFIX));
    assert!(body.ends_with(b"1200x630|Hello|World"));
    assert_eq!(renderer.calls(), 1);
    assert_eq!(app.cache.len(), 1);
}

#[tokio::test]
async fn identical_second_request_returns_cached_bytes() {
    let renderer = Arc::new(StubRenderer::default());
    let app = spawn_app(renderer.clone(), RenderMode::Production).await;

    let first = app.get("/og-image?title=Hello&description=World").await;
    let first_cache_control = header(&first, "cache-control").map(str::to_owned);
    let first_body = first.bytes().await.expect("failed to read body");

    let second = app.get("/og-image?title=Hello&description=World").await;
    assert_eq!(second.status(), 200);
    assert_eq!(
        header(&second, "cache-control").map(str::to_owned),
        first_cache_control
    );
    let second_body = second.bytes().await.expect("failed to read body");

    assert_eq!(first_body, second_body);
    assert_eq!(renderer.calls(), 1, "second request should be a cache hit");
}

#[tokio::test]
async fn requests_normalizing_to_same_text_share_cache_slot() {
    let renderer = Arc::new(StubRenderer::default());
    let app = spawn_app(renderer.clone(), RenderMode::Production).await;

    app.get("/og-image?title=Hello+World&description=Hi").await;
    app.get("/og-image?title=++Hello%0A%09World++&subtitle=Hi").await;

    assert_eq!(renderer.calls(), 1);
    assert_eq!(app.cache.len(), 1);
}

#[tokio::test]
async fn different_text_renders_separately() {
    let renderer = Arc::new(StubRenderer::default());
    let app = spawn_app(renderer.clone(), RenderMode::Production).await;

    app.get("/og-image?title=One").await;
    app.get("/og-image?title=Two").await;

    assert_eq!(renderer.calls(), 2);
    assert_eq!(app.cache.len(), 2);
}

#[tokio::test]
async fn missing_text_uses_site_defaults() {
    let app = spawn_app(Arc::new(StubRenderer::default()), RenderMode::Production).await;

    let response = app.get("/og-image").await;

    assert_eq!(response.status(), 200);
    let body = response.bytes().await.expect("failed to read body");
    let expected = format!("|{SITE_TITLE}|{SITE_DESCRIPTION}");
    assert!(body.ends_with(expected.as_bytes()));
}

#[tokio::test]
async fn subtitle_alias_fills_description() {
    let app = spawn_app(Arc::new(StubRenderer::default()), RenderMode::Production).await;

    let response = app.get("/og-image?title=T&subtitle=Legacy").await;

    let body = response.bytes().await.expect("failed to read body");
    assert!(body.ends_with(b"|T|Legacy"));
}

#[tokio::test]
async fn long_title_is_truncated_before_rendering() {
    let app = spawn_app(Arc::new(StubRenderer::default()), RenderMode::Production).await;
    let title = "a".repeat(300);

    let response = app.get(&format!("/og-image?title={title}")).await;

    let body = response.bytes().await.expect("failed to read body");
    let expected = format!("|{}...|", "a".repeat(117));
    let body = String::from_utf8_lossy(&body);
    assert!(body.contains(&expected), "{body}");
}

// ===========================================================================
// Fallback
// ===========================================================================

#[tokio::test]
async fn renderer_failure_serves_escaped_svg_fallback() {
    let renderer = Arc::new(StubRenderer::failing());
    let app = spawn_app(renderer.clone(), RenderMode::Production).await;

    let response = app
        .get("/og-image?title=%3Cb%3ETom+%26+Jerry%3C%2Fb%3E&description=%22it%27s%22")
        .await;

    assert_eq!(response.status(), 200);
    assert_eq!(
        header(&response, "content-type"),
        Some("image/svg+xml; charset=utf-8")
    );
    assert_eq!(header(&response, "cache-control"), Some("public, max-age=300"));
    let body = response.text().await.expect("failed to read body");
    assert!(body.starts_with("<svg"));
    assert!(body.contains("&lt;b&gt;Tom &amp; Jerry&lt;/b&gt;"));
    assert!(body.contains("&quot;it&apos;s&quot;"));
    assert!(!body.contains("<b>"));
    assert!(app.cache.is_empty(), "fallback must not be cached");
}

#[tokio::test]
async fn fallback_is_rendered_again_on_next_request() {
    let renderer = Arc::new(StubRenderer::failing());
    let app = spawn_app(renderer.clone(), RenderMode::Production).await;

    app.get("/og-image?title=Retry").await;
    app.get("/og-image?title=Retry").await;

    assert_eq!(renderer.calls(), 2);
}

// ===========================================================================
// Development mode
// ===========================================================================

#[tokio::test]
async fn development_mode_is_no_store_and_uncached() {
    let renderer = Arc::new(StubRenderer::default());
    let app = spawn_app(renderer.clone(), RenderMode::Development).await;

    let first = app.get("/og-image?title=Dev").await;
    assert_eq!(first.status(), 200);
    assert_eq!(header(&first, "cache-control"), Some("no-store"));

    app.get("/og-image?title=Dev").await;

    assert_eq!(renderer.calls(), 2);
    assert!(app.cache.is_empty());
}

#[tokio::test]
async fn development_fallback_is_no_store() {
    let app = spawn_app(Arc::new(StubRenderer::failing()), RenderMode::Development).await;

    let response = app.get("/og-image?title=Dev").await;

    assert_eq!(response.status(), 200);
    assert_eq!(header(&response, "cache-control"), Some("no-store"));
    assert_eq!(
        header(&response, "content-type"),
        Some("image/svg+xml; charset=utf-8")
    );
}
