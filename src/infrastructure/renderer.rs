use std::fmt::Write;
use std::io::Cursor;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use base64::Engine;
use image::ImageFormat;
use image::imageops::FilterType;
use resvg::tiny_skia::{Pixmap, Transform};
use resvg::usvg::{self, fontdb};
use tracing::{debug, warn};
use url::Url;

use crate::domain::cards::{CardLayout, ImageSize, TextBlock};
use crate::domain::errors::RenderError;
use crate::domain::fallback::escape_xml;
use crate::domain::images::RenderedImage;
use crate::domain::ports::CardRenderer;

const DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(10);

/// Average advance of a sans-serif glyph, as a fraction of the font size.
const REGULAR_GLYPH_WIDTH: f32 = 0.55;
const BOLD_GLYPH_WIDTH: f32 = 0.6;

/// Distance from the top of the em box to the baseline, as a fraction of the font size.
const ASCENT: f32 = 0.8;

/// Renders card layouts to PNG by building an SVG scene and rasterizing it
/// with resvg.
pub struct SvgCardRenderer {
    client: reqwest::Client,
    fontdb: Arc<fontdb::Database>,
}

impl SvgCardRenderer {
    /// Create a renderer backed by the system fonts.
    pub fn new(client: reqwest::Client) -> Self {
        let mut fontdb = fontdb::Database::new();
        fontdb.load_system_fonts();
        if fontdb.is_empty() {
            warn!("no system fonts found, card text will not be drawn");
        } else {
            debug!(faces = fontdb.len(), "loaded system fonts");
        }
        Self::with_fonts(client, fontdb)
    }

    pub fn with_fonts(client: reqwest::Client, fontdb: fontdb::Database) -> Self {
        Self {
            client,
            fontdb: Arc::new(fontdb),
        }
    }

    async fn load_background(&self, url: &Url) -> Result<Vec<u8>, RenderError> {
        match url.scheme() {
            "file" => {
                let path = url
                    .to_file_path()
                    .map_err(|()| RenderError::background(url.as_str(), "not a local path"))?;
                tokio::fs::read(&path)
                    .await
                    .map_err(|err| RenderError::background(url.as_str(), err))
            }
            "http" | "https" => {
                let response = self
                    .client
                    .get(url.clone())
                    .timeout(DOWNLOAD_TIMEOUT)
                    .send()
                    .await
                    .and_then(reqwest::Response::error_for_status)
                    .map_err(|err| RenderError::background(url.as_str(), err))?;

                let bytes = response
                    .bytes()
                    .await
                    .map_err(|err| RenderError::background(url.as_str(), err))?;

                if bytes.is_empty() {
                    return Err(RenderError::background(url.as_str(), "empty body"));
                }
                Ok(bytes.to_vec())
            }
            other => Err(RenderError::background(
                url.as_str(),
                format!("unsupported scheme {other}"),
            )),
        }
    }
}

#[async_trait]
impl CardRenderer for SvgCardRenderer {
    async fn render(
        &self,
        layout: &CardLayout,
        size: ImageSize,
    ) -> Result<RenderedImage, RenderError> {
        let background = self.load_background(&layout.background_url).await?;

        let layout = layout.clone();
        let fontdb = Arc::clone(&self.fontdb);
        let png = tokio::task::spawn_blocking(move || compose(&layout, size, &background, fontdb))
            .await
            .map_err(|err| RenderError::Unavailable(format!("render task failed: {err}")))??;

        Ok(RenderedImage::png(png))
    }
}

fn compose(
    layout: &CardLayout,
    size: ImageSize,
    background: &[u8],
    fontdb: Arc<fontdb::Database>,
) -> Result<Vec<u8>, RenderError> {
    let href = background_data_uri(background, size)?;
    let svg = scene_svg(layout, size, &href);

    let options = usvg::Options {
        fontdb,
        ..usvg::Options::default()
    };
    let tree = usvg::Tree::from_str(&svg, &options)
        .map_err(|err| RenderError::Scene(err.to_string()))?;

    let mut pixmap = Pixmap::new(size.width, size.height)
        .ok_or_else(|| RenderError::Scene(format!("invalid canvas size {size:?}")))?;
    resvg::render(&tree, Transform::default(), &mut pixmap.as_mut());

    pixmap
        .encode_png()
        .map_err(|err| RenderError::Encode(err.to_string()))
}

/// Decode the background, crop it to cover the canvas and embed it as a PNG data URI.
fn background_data_uri(bytes: &[u8], size: ImageSize) -> Result<String, RenderError> {
    let decoded =
        image::load_from_memory(bytes).map_err(|err| RenderError::Decode(err.to_string()))?;
    let fitted = decoded.resize_to_fill(size.width, size.height, FilterType::Triangle);

    let mut png = Cursor::new(Vec::new());
    fitted
        .write_to(&mut png, ImageFormat::Png)
        .map_err(|err| RenderError::Encode(err.to_string()))?;

    let encoded = base64::engine::general_purpose::STANDARD.encode(png.into_inner());
    Ok(format!("data:image/png;base64,{encoded}"))
}

/// Build the SVG scene for a layout with the given background href.
pub(crate) fn scene_svg(layout: &CardLayout, size: ImageSize, background_href: &str) -> String {
    let ImageSize { width, height } = size;
    let mut svg = String::new();
    let _ = writeln!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" xmlns:xlink="http://www.w3.org/1999/xlink" width="{width}" height="{height}" viewBox="0 0 {width} {height}">"#
    );
    let _ = writeln!(
        svg,
        r#"<rect width="100%" height="100%" fill="{}"/>"#,
        layout.background_color
    );
    let _ = writeln!(
        svg,
        r#"<image x="0" y="0" width="{width}" height="{height}" preserveAspectRatio="xMidYMid slice" xlink:href="{}"/>"#,
        escape_xml(background_href)
    );
    let _ = writeln!(
        svg,
        r##"<rect width="100%" height="100%" fill="#000000" fill-opacity="{}"/>"##,
        layout.overlay_opacity
    );

    let title_top = layout.padding;
    let title_height = write_text_block(&mut svg, &layout.title, layout, title_top);
    let description_top = title_top + title_height + layout.gap;
    write_text_block(&mut svg, &layout.description, layout, description_top);

    svg.push_str("</svg>");
    svg
}

/// Append a wrapped text block whose line boxes start at `top`. Returns the block height.
fn write_text_block(svg: &mut String, block: &TextBlock, layout: &CardLayout, top: f32) -> f32 {
    let glyph_width = if block.bold {
        BOLD_GLYPH_WIDTH
    } else {
        REGULAR_GLYPH_WIDTH
    };
    let max_chars = (layout.max_text_width / (block.font_size * glyph_width)).floor() as usize;
    let lines = wrap_lines(&block.text, max_chars);

    let line_box = block.font_size * block.line_height;
    let leading = (line_box - block.font_size) / 2.0;
    let weight = if block.bold { 700 } else { 400 };

    let _ = write!(
        svg,
        r##"<text font-family="sans-serif" font-size="{}" font-weight="{weight}" fill="#ffffff" fill-opacity="{}">"##,
        block.font_size, block.opacity
    );
    for (index, line) in lines.iter().enumerate() {
        let baseline = top + index as f32 * line_box + leading + block.font_size * ASCENT;
        let _ = write!(
            svg,
            r#"<tspan x="{}" y="{baseline}">{}</tspan>"#,
            layout.padding,
            escape_xml(line)
        );
    }
    let _ = writeln!(svg, "</text>");

    lines.len() as f32 * line_box
}

/// Greedily wrap text at word boundaries so no line exceeds `max_chars`.
/// Words longer than a line are split.
pub(crate) fn wrap_lines(text: &str, max_chars: usize) -> Vec<String> {
    let max_chars = max_chars.max(1);
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for word in text.split_whitespace() {
        let mut chars: Vec<char> = word.chars().collect();

        while chars.len() > max_chars {
            if current_len > 0 {
                lines.push(std::mem::take(&mut current));
                current_len = 0;
            }
            let rest = chars.split_off(max_chars);
            lines.push(chars.into_iter().collect());
            chars = rest;
        }

        let word_len = chars.len();
        if word_len == 0 {
            continue;
        }
        if current_len > 0 && current_len + 1 + word_len > max_chars {
            lines.push(std::mem::take(&mut current));
            current_len = 0;
        }
        if current_len > 0 {
            current.push(' ');
            current_len += 1;
        }
        current.extend(chars);
        current_len += word_len;
    }

    if current_len > 0 {
        lines.push(current);
    }
    lines
}
