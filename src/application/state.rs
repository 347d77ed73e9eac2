use std::path::PathBuf;

use crate::application::services::OgImageService;

#[derive(Clone)]
pub struct AppState {
    pub og_images: OgImageService,
    /// Directory served under `/assets`, holding the card background.
    pub assets_dir: Option<PathBuf>,
}

impl AppState {
    pub fn new(og_images: OgImageService) -> Self {
        Self {
            og_images,
            assets_dir: None,
        }
    }

    #[must_use]
    pub fn with_assets_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.assets_dir = Some(dir.into());
        self
    }
}
