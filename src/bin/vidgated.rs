//! vidgated — vidgate daemon.
//!
//! Serves the caching video-metadata gateway over HTTP, backed by the
//! Innertube upstream.

use std::sync::Arc;
use std::time::Duration;

use clap::Parser;

use vidgate::Vidgate;
use vidgate::provider::InnertubeClient;
use vidgate::server::config::Config;
use vidgate::server::{AppState, run};

/// Vidgate daemon — caching video-metadata gateway.
#[derive(Parser)]
#[command(name = "vidgated")]
#[command(version)]
#[command(about = "Caching gateway for video metadata lookups")]
struct Args {
    /// Path to configuration file.
    #[arg(short, long)]
    config: Option<std::path::PathBuf>,

    /// Listening port (overrides the configured address's port).
    #[arg(short, long, env = "PORT")]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let args = Args::parse();

    // Load configuration — read once, immutable thereafter
    let config = Config::load(args.config.as_deref())?;
    let addr = config.bind_addr(args.port)?;

    let provider = InnertubeClient::with_options(
        &config.upstream.base_url,
        Duration::from_secs(config.upstream.timeout_secs),
    );

    let gateway = Vidgate::builder()
        .cache_config(config.cache.to_cache_config())
        .provider(Arc::new(provider))
        .build();

    let state = Arc::new(AppState::new(
        Arc::new(gateway),
        config.server.failure_policy,
    ));

    run(state, addr).await?;
    Ok(())
}
