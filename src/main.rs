use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use ogcard::application::services::RenderMode;
use ogcard::application::{ServerConfig, serve};
use ogcard::presentation::cli::{Cli, Commands, ServeCommand, render};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (before clap parses env vars)
    let _ = dotenvy::dotenv();

    init_tracing();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve(cmd) => run_server(cmd).await,
        Commands::Render(cmd) => render::run(cmd).await,
    }
}

async fn run_server(command: ServeCommand) -> Result<()> {
    let mode = if command.dev {
        tracing::warn!("development mode: caching disabled, responses are no-store");
        RenderMode::Development
    } else {
        RenderMode::Production
    };

    let config = ServerConfig {
        bind_address: command.bind_address,
        public_url: command.public_url,
        site: command.site.into(),
        assets_dir: command.assets_dir,
        background_path: command.background_path,
        mode,
        cache_capacity: command.cache_capacity,
        cache_ttl: Duration::from_secs(command.cache_ttl_secs),
    };

    serve(config).await
}

#[allow(clippy::expect_used)] // Startup: panicking is appropriate if logging cannot be initialized
fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let use_json = std::env::var("RUST_LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json"));

    let registry = tracing_subscriber::registry().with(env_filter);

    if use_json {
        registry
            .with(tracing_subscriber::fmt::layer().json())
            .try_init()
            .expect("failed to initialize tracing");
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().compact())
            .try_init()
            .expect("failed to initialize tracing");
    }
}
