use std::error::Error;

use clap::Parser;
use pixgate_common::GlobalConfigPatch;
use pixgate_core::Core;
use tracing::info;

mod cli;

use crate::cli::Cli;

#[tokio::main]
async fn main() {
    init_tracing();
    if let Err(err) = run().await {
        eprintln!("pixgate failed: {err}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn Error + Send + Sync>> {
    let mut patch = GlobalConfigPatch::default();
    patch.overlay(Cli::parse().into_patch()?);
    let config = patch.into_config()?;
    info!(
        host = %config.host,
        port = config.port,
        upstream_url = %config.upstream_url,
        upstream_origin = %config.upstream_origin.as_deref().unwrap_or(""),
        proxy = %config.proxy.as_deref().unwrap_or(""),
        max_attempts = config.retry.max_attempts,
        models = config.models.len(),
        default_model = %config.default_model,
        "config loaded"
    );

    let core = Core::from_config(&config)?;
    let bind = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&bind).await?;
    info!(addr = %bind, "listening");
    axum::serve(listener, core.router())
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("pixgate=info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("shutdown requested");
    }
}
