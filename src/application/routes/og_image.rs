use axum::extract::{RawQuery, State};
use axum::http::header::{CACHE_CONTROL, CONTENT_TYPE};
use axum::response::{IntoResponse, Response};
use tracing::Span;

use crate::application::errors::AppError;
use crate::application::services::{OgImage, OgImageQuery};
use crate::application::state::AppState;

pub(crate) async fn og_image(
    State(state): State<AppState>,
    RawQuery(query): RawQuery,
) -> Result<Response, AppError> {
    let query = OgImageQuery::parse(query.as_deref())?;
    let image = state.og_images.generate(&query).await;
    Span::current().record("og.source", tracing::field::debug(image.source));
    Ok(image.into_response())
}

impl IntoResponse for OgImage {
    fn into_response(self) -> Response {
        (
            [
                (CONTENT_TYPE, self.content_type),
                (CACHE_CONTROL, self.cache_control),
            ],
            self.body,
        )
            .into_response()
    }
}
