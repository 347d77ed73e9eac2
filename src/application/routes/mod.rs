pub mod og_image;

use axum::http::{HeaderValue, Request};
use axum::routing::get;
use tower::ServiceBuilder;
use tower_http::services::ServeDir;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::{DefaultOnResponse, MakeSpan, TraceLayer};
use tracing::{Level, Span};

use crate::application::state::AppState;

pub fn app_router(state: AppState) -> axum::Router {
    let mut router = axum::Router::new().route("/og-image", get(og_image::og_image));

    if let Some(dir) = &state.assets_dir {
        router = router.nest_service("/assets", ServeDir::new(dir));
    }

    router
        .layer(
            ServiceBuilder::new()
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(OgCardMakeSpan)
                        .on_response(DefaultOnResponse::new().level(Level::INFO)),
                )
                .layer(SetResponseHeaderLayer::overriding(
                    axum::http::header::X_CONTENT_TYPE_OPTIONS,
                    HeaderValue::from_static("nosniff"),
                )),
        )
        .with_state(state)
}

#[derive(Clone)]
struct OgCardMakeSpan;

impl<B> MakeSpan<B> for OgCardMakeSpan {
    fn make_span(&mut self, request: &Request<B>) -> Span {
        tracing::info_span!(
            "request",
            method = %request.method(),
            uri = %request.uri(),
            version = ?request.version(),
            og.source = tracing::field::Empty,
        )
    }
}
