use std::sync::Arc;

use axum::body::Bytes;
use tracing::{debug, warn};
use url::Url;

use crate::application::errors::AppError;
use crate::domain::cache_keys::CacheKey;
use crate::domain::cards::{CardLayout, CardText, ImageSize, SiteConfig};
use crate::domain::fallback::fallback_image;
use crate::domain::images::CachedResponse;
use crate::domain::ports::{CardRenderer, ResponseCache};

/// Parameter names produced by a malformed link such as `/og-image?/title=...`.
const MALFORMED_PARAMS: [&str; 3] = ["/title", "/description", "/subtitle"];

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RenderMode {
    Development,
    Production,
}

impl RenderMode {
    pub fn rendered_cache_control(self) -> &'static str {
        match self {
            Self::Development => "no-store",
            Self::Production => "public, max-age=86400",
        }
    }

    pub fn fallback_cache_control(self) -> &'static str {
        match self {
            Self::Development => "no-store",
            Self::Production => "public, max-age=300",
        }
    }
}

/// Raw card text taken from the query string.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct OgImageQuery {
    pub title: Option<String>,
    pub description: Option<String>,
}

impl OgImageQuery {
    /// Parse a form-encoded query string. The first occurrence of a key wins,
    /// and `description` takes precedence over the legacy `subtitle` alias.
    pub fn parse(raw: Option<&str>) -> Result<Self, AppError> {
        let mut title = None;
        let mut description = None;
        let mut subtitle = None;

        for (key, value) in url::form_urlencoded::parse(raw.unwrap_or_default().as_bytes()) {
            match key.as_ref() {
                key if MALFORMED_PARAMS.contains(&key) => return Err(AppError::InvalidQuery),
                "title" if title.is_none() => title = Some(value.into_owned()),
                "description" if description.is_none() => description = Some(value.into_owned()),
                "subtitle" if subtitle.is_none() => subtitle = Some(value.into_owned()),
                _ => {}
            }
        }

        Ok(Self {
            title,
            description: description.or(subtitle),
        })
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ImageSource {
    Cache,
    Rendered,
    Fallback,
}

/// A finished card response.
#[derive(Clone, Debug, PartialEq)]
pub struct OgImage {
    pub source: ImageSource,
    pub content_type: String,
    pub cache_control: String,
    pub body: Bytes,
}

impl OgImage {
    fn from_cached(source: ImageSource, response: CachedResponse) -> Self {
        Self {
            source,
            content_type: response.content_type,
            cache_control: response.cache_control,
            body: response.body,
        }
    }
}

#[derive(Clone)]
struct CacheSlot {
    store: Arc<dyn ResponseCache>,
    origin: Url,
}

/// Turns card requests into images: sanitize, check the cache, render,
/// fall back, store.
#[derive(Clone)]
pub struct OgImageService {
    renderer: Arc<dyn CardRenderer>,
    cache: Option<CacheSlot>,
    site: SiteConfig,
    background_url: Url,
    mode: RenderMode,
}

impl OgImageService {
    pub fn new(
        renderer: Arc<dyn CardRenderer>,
        site: SiteConfig,
        background_url: Url,
        mode: RenderMode,
    ) -> Self {
        Self {
            renderer,
            cache: None,
            site,
            background_url,
            mode,
        }
    }

    /// Cache rendered cards in `store`, keyed under `origin`. Ignored in
    /// development mode.
    #[must_use]
    pub fn with_cache(mut self, store: Arc<dyn ResponseCache>, origin: Url) -> Self {
        self.cache = Some(CacheSlot { store, origin });
        self
    }

    pub async fn generate(&self, query: &OgImageQuery) -> OgImage {
        let text = CardText::sanitize(
            query.title.as_deref(),
            query.description.as_deref(),
            &self.site,
        );

        let cache = match (&self.cache, self.mode) {
            (Some(slot), RenderMode::Production) => {
                Some((&slot.store, CacheKey::build(&slot.origin, &text)))
            }
            _ => None,
        };

        if let Some((store, key)) = &cache {
            match store.get(key).await {
                Ok(Some(hit)) => {
                    debug!(key = %key, "og image cache hit");
                    return OgImage::from_cached(ImageSource::Cache, hit);
                }
                Ok(None) => debug!(key = %key, "og image cache miss"),
                Err(err) => warn!(error = %err, key = %key, "og image cache read failed"),
            }
        }

        let layout = CardLayout::new(self.background_url.clone(), &text);
        let image = match self.renderer.render(&layout, ImageSize::OG).await {
            Ok(image) => image,
            Err(err) => {
                warn!(error = %err, "og image render failed, serving fallback");
                let fallback = fallback_image(&text, ImageSize::OG);
                return OgImage {
                    source: ImageSource::Fallback,
                    content_type: fallback.content_type.to_string(),
                    cache_control: self.mode.fallback_cache_control().to_string(),
                    body: fallback.body,
                };
            }
        };

        let response = CachedResponse {
            content_type: image.content_type.to_string(),
            cache_control: self.mode.rendered_cache_control().to_string(),
            body: image.body,
        };

        if let Some((store, key)) = cache
            && let Err(err) = store.put(key, response.clone()).await
        {
            warn!(error = %err, "og image cache write failed");
        }

        OgImage::from_cached(ImageSource::Rendered, response)
    }
}

/// Resolve an asset path against the public URL of the site.
pub fn resolve_asset_url(public_url: &Url, asset_path: &str) -> Result<Url, url::ParseError> {
    public_url.join(asset_path)
}
