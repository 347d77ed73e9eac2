pub mod render;

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use url::Url;

use render::RenderCommand;

pub use crate::domain::cards::{DEFAULT_SITE_DESCRIPTION, DEFAULT_SITE_TITLE};
use crate::domain::cards::SiteConfig;

#[derive(Debug, Parser)]
#[command(author, version, about = "Generate Open Graph preview images", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Run the HTTP server
    Serve(ServeCommand),

    /// Render a single card to a file
    Render(RenderCommand),
}

/// Site-wide text used when a request omits title or description.
#[derive(Debug, Args)]
pub struct SiteArgs {
    #[arg(long, env = "OGCARD_SITE_TITLE", default_value = DEFAULT_SITE_TITLE)]
    pub site_title: String,

    #[arg(long, env = "OGCARD_SITE_DESCRIPTION", default_value = DEFAULT_SITE_DESCRIPTION)]
    pub site_description: String,
}

impl From<SiteArgs> for SiteConfig {
    fn from(args: SiteArgs) -> Self {
        Self::new(&args.site_title, &args.site_description)
    }
}

#[derive(Debug, Args)]
pub struct ServeCommand {
    #[arg(long, env = "OGCARD_BIND_ADDRESS", default_value = "127.0.0.1:3000")]
    pub bind_address: SocketAddr,

    /// Public origin of the site, used for cache keys and asset URLs
    #[arg(long, env = "OGCARD_PUBLIC_URL", default_value = "http://localhost:3000")]
    pub public_url: Url,

    #[command(flatten)]
    pub site: SiteArgs,

    #[arg(long, env = "OGCARD_ASSETS_DIR", default_value = "assets")]
    pub assets_dir: PathBuf,

    #[arg(
        long,
        env = "OGCARD_BACKGROUND_PATH",
        default_value = "/assets/og-background.png"
    )]
    pub background_path: String,

    /// Development mode: no caching, `no-store` responses
    #[arg(long, env = "OGCARD_DEV")]
    pub dev: bool,

    #[arg(long, env = "OGCARD_CACHE_CAPACITY", default_value_t = 512)]
    pub cache_capacity: usize,

    #[arg(long, env = "OGCARD_CACHE_TTL_SECS", default_value_t = 86_400)]
    pub cache_ttl_secs: u64,
}
