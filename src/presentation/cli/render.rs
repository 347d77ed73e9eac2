use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Args;
use tracing::{info, warn};
use url::Url;

use super::SiteArgs;
use crate::application::services::{ImageSource, OgImageQuery, OgImageService, RenderMode};
use crate::domain::ports::CardRenderer;
use crate::infrastructure::renderer::SvgCardRenderer;

#[derive(Debug, Args)]
pub struct RenderCommand {
    #[arg(long)]
    pub title: Option<String>,

    #[arg(long, alias = "subtitle")]
    pub description: Option<String>,

    #[arg(long, default_value = "assets/og-background.png")]
    pub background: PathBuf,

    /// Destination file. A fallback card is written next to it with an `.svg` extension.
    #[arg(long, short)]
    pub output: PathBuf,

    #[command(flatten)]
    pub site: SiteArgs,
}

pub async fn run(command: RenderCommand) -> Result<()> {
    let renderer = tokio::task::spawn_blocking(|| SvgCardRenderer::new(reqwest::Client::new()))
        .await
        .context("failed to load fonts")?;
    let written = render_to_file(Arc::new(renderer), command).await?;
    println!("{}", written.display());
    Ok(())
}

/// Render one card through the sanitize/render/fallback pipeline and write it
/// to disk. Returns the path written.
pub async fn render_to_file(
    renderer: Arc<dyn CardRenderer>,
    command: RenderCommand,
) -> Result<PathBuf> {
    let background = std::path::absolute(&command.background)
        .with_context(|| format!("invalid background path {}", command.background.display()))?;
    let background_url = Url::from_file_path(&background).map_err(|()| {
        anyhow::anyhow!("background path is not absolute: {}", background.display())
    })?;

    let service = OgImageService::new(
        renderer,
        command.site.into(),
        background_url,
        RenderMode::Development,
    );
    let query = OgImageQuery {
        title: command.title,
        description: command.description,
    };
    let image = service.generate(&query).await;

    let path = match image.source {
        ImageSource::Fallback => {
            warn!("card render failed, writing fallback SVG");
            command.output.with_extension("svg")
        }
        ImageSource::Rendered | ImageSource::Cache => command.output,
    };
    write_output(&path, &image.body).await?;
    info!(path = %path.display(), bytes = image.body.len(), "card written");
    Ok(path)
}

async fn write_output(path: &Path, body: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent)
            .await
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    tokio::fs::write(path, body)
        .await
        .with_context(|| format!("failed to write {}", path.display()))
}
