use std::fmt;

use url::Url;

use crate::domain::cards::CardText;

const CACHE_PATH: &str = "/og-image/cache.png";

/// Lookup identifier for a rendered card.
///
/// A pure function of the origin and the sanitized text, so identical
/// requests share one cache slot.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct CacheKey(String);

impl CacheKey {
    pub fn build(origin: &Url, text: &CardText) -> Self {
        let mut url = origin.clone();
        url.set_path(CACHE_PATH);
        url.set_fragment(None);
        url.query_pairs_mut()
            .clear()
            .append_pair("title", &text.title)
            .append_pair("description", &text.description);
        Self(url.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
