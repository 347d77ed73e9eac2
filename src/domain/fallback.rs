use std::fmt::Write;

use crate::domain::cards::{CardText, ImageSize};
use crate::domain::images::RenderedImage;

/// Escape the five XML-reserved characters.
pub fn escape_xml(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

/// Minimal SVG card served when the primary renderer fails. Never fails.
pub fn fallback_svg(text: &CardText, size: ImageSize) -> String {
    let ImageSize { width, height } = size;
    let mut svg = String::new();
    // Writing into a String cannot fail.
    let _ = write!(
        svg,
        r##"<svg xmlns="http://www.w3.org/2000/svg" width="{width}" height="{height}" viewBox="0 0 {width} {height}">
<rect width="100%" height="100%" fill="#0f0f10"/>
<text x="64" y="250" fill="#fff" font-size="72" font-family="sans-serif" font-weight="700">{title}</text>
<text x="64" y="340" fill="rgba(255,255,255,0.85)" font-size="34" font-family="sans-serif">{description}</text>
</svg>"##,
        title = escape_xml(&text.title),
        description = escape_xml(&text.description),
    );
    svg
}

pub fn fallback_image(text: &CardText, size: ImageSize) -> RenderedImage {
    RenderedImage::svg(fallback_svg(text, size))
}
