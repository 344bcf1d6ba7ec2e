//! HTTP server binary for manifesto-lens.
//!
//! A thin shim over the library crate: parses flags, loads provider keys
//! from the environment, and serves the router.

use anyhow::{Context, Result};
use clap::Parser;
use manifesto_lens::{server, Analyzer, AnalyzerConfig};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "manifesto-lens", about = "Manifesto analysis HTTP service")]
struct Cli {
    /// Address to bind.
    #[arg(long, default_value = "0.0.0.0")]
    host: String,

    /// Port to listen on.
    #[arg(long, env = "PORT", default_value_t = 8000)]
    port: u16,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("manifesto_lens=info,tower_http=debug")),
        )
        .init();

    let cli = Cli::parse();
    let config = AnalyzerConfig::from_env();

    let analyzer = Arc::new(Analyzer::new(config.clone())?);
    let app = server::router(analyzer, &config.allowed_origins);

    let addr: SocketAddr = format!("{}:{}", cli.host, cli.port)
        .parse()
        .with_context(|| format!("invalid bind address {}:{}", cli.host, cli.port))?;

    info!("Starting manifesto-lens on http://{addr}");
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    axum::serve(listener, app).await?;

    Ok(())
}
