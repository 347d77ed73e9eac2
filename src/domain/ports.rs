use async_trait::async_trait;

use crate::domain::cache_keys::CacheKey;
use crate::domain::cards::{CardLayout, ImageSize};
use crate::domain::errors::{CacheError, RenderError};
use crate::domain::images::{CachedResponse, RenderedImage};

/// Composes a card layout into an encoded image.
#[async_trait]
pub trait CardRenderer: Send + Sync {
    async fn render(
        &self,
        layout: &CardLayout,
        size: ImageSize,
    ) -> Result<RenderedImage, RenderError>;
}

/// Key-value store for rendered responses. Callers treat every error as a miss.
#[async_trait]
pub trait ResponseCache: Send + Sync {
    async fn get(&self, key: &CacheKey) -> Result<Option<CachedResponse>, CacheError>;
    async fn put(&self, key: CacheKey, response: CachedResponse) -> Result<(), CacheError>;
}
