//! CLI entry point - the composition root.
//!
//! This is the only place where configuration, tracing, the listener and
//! the relay state are wired together.

use std::sync::Arc;

use anyhow::Context;
use chatrelay_cli::Cli;
use chatrelay_proxy::{RelayState, serve};
use clap::Parser;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::info;

/// Initialize tracing.
///
/// Log level is controlled by RUST_LOG (default: info, or debug with --verbose).
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .compact()
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables before parsing so clap sees them
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = cli.relay_config().context("Invalid relay configuration")?;
    info!(
        upstream = %config.upstream_url,
        model = %config.model,
        max_tokens = config.max_tokens,
        api_key_configured = config.api_key.is_some(),
        "Relay configured"
    );

    let state = Arc::new(RelayState::new(config).context("Failed to build upstream client")?);

    let addr = cli.listen_addr();
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;

    let cancel = CancellationToken::new();
    tokio::spawn({
        let cancel = cancel.clone();
        async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                info!("Shutdown requested");
            }
            cancel.cancel();
        }
    });

    serve(listener, state, cancel).await
}
