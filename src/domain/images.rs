use axum::body::Bytes;

pub const PNG_CONTENT_TYPE: &str = "image/png";
pub const SVG_CONTENT_TYPE: &str = "image/svg+xml; charset=utf-8";

/// Encoded image payload with its media type.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderedImage {
    pub content_type: &'static str,
    pub body: Bytes,
}

impl RenderedImage {
    pub fn png(body: impl Into<Bytes>) -> Self {
        Self {
            content_type: PNG_CONTENT_TYPE,
            body: body.into(),
        }
    }

    pub fn svg(body: impl Into<Bytes>) -> Self {
        Self {
            content_type: SVG_CONTENT_TYPE,
            body: body.into(),
        }
    }
}

/// A complete response as stored in the cache and replayed on a hit.
#[derive(Clone, Debug, PartialEq)]
pub struct CachedResponse {
    pub content_type: String,
    pub cache_control: String,
    pub body: Bytes,
}
