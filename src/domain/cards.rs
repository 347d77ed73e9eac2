use url::Url;

use crate::domain::text::sanitize_text;

pub const OG_WIDTH: u32 = 1200;
pub const OG_HEIGHT: u32 = 630;
pub const TITLE_MAX_LENGTH: usize = 120;
pub const DESCRIPTION_MAX_LENGTH: usize = 200;

pub const DEFAULT_SITE_TITLE: &str = "My Site";
pub const DEFAULT_SITE_DESCRIPTION: &str = "Writing, notes and projects.";

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ImageSize {
    pub width: u32,
    pub height: u32,
}

impl ImageSize {
    pub const OG: Self = Self {
        width: OG_WIDTH,
        height: OG_HEIGHT,
    };
}

/// Site-wide text used when a request leaves title or description out.
#[derive(Clone, Debug)]
pub struct SiteConfig {
    pub title: String,
    pub description: String,
}

impl SiteConfig {
    /// Normalize and bound operator-supplied defaults like any card text.
    /// Blank values fall back to the built-in defaults.
    pub fn new(title: &str, description: &str) -> Self {
        Self {
            title: sanitize_text(Some(title), DEFAULT_SITE_TITLE, TITLE_MAX_LENGTH),
            description: sanitize_text(
                Some(description),
                DEFAULT_SITE_DESCRIPTION,
                DESCRIPTION_MAX_LENGTH,
            ),
        }
    }
}

/// Sanitized text for one card.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CardText {
    pub title: String,
    pub description: String,
}

impl CardText {
    pub fn sanitize(title: Option<&str>, description: Option<&str>, site: &SiteConfig) -> Self {
        Self {
            title: sanitize_text(title, &site.title, TITLE_MAX_LENGTH),
            description: sanitize_text(description, &site.description, DESCRIPTION_MAX_LENGTH),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct TextBlock {
    pub text: String,
    pub font_size: f32,
    pub line_height: f32,
    pub bold: bool,
    pub opacity: f32,
}

/// Fixed composition of a card: a cover-fitted background photo, a dark
/// overlay, and the title above the description in the top-left corner.
#[derive(Clone, Debug, PartialEq)]
pub struct CardLayout {
    pub background_url: Url,
    pub background_color: &'static str,
    pub overlay_opacity: f32,
    pub padding: f32,
    pub gap: f32,
    pub max_text_width: f32,
    pub title: TextBlock,
    pub description: TextBlock,
}

impl CardLayout {
    pub fn new(background_url: Url, text: &CardText) -> Self {
        Self {
            background_url,
            background_color: "#0f0f10",
            overlay_opacity: 0.55,
            padding: 64.0,
            gap: 20.0,
            max_text_width: 900.0,
            title: TextBlock {
                text: text.title.clone(),
                font_size: 68.0,
                line_height: 1.0,
                bold: true,
                opacity: 1.0,
            },
            description: TextBlock {
                text: text.description.clone(),
                font_size: 34.0,
                line_height: 1.1,
                bold: false,
                opacity: 0.85,
            },
        }
    }
}
