use thiserror::Error;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("renderer unavailable: {0}")]
    Unavailable(String),
    #[error("failed to load background {url}: {reason}")]
    Background { url: String, reason: String },
    #[error("failed to decode background image: {0}")]
    Decode(String),
    #[error("failed to build card scene: {0}")]
    Scene(String),
    #[error("failed to encode card image: {0}")]
    Encode(String),
}

impl RenderError {
    pub fn background(url: impl Into<String>, reason: impl ToString) -> Self {
        Self::Background {
            url: url.into(),
            reason: reason.to_string(),
        }
    }
}

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("cache unavailable: {0}")]
    Unavailable(String),
}
