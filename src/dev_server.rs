use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use gj_portfolio::{build_router, AppState, SiteConfig, SiteRenderer};
use tokio::signal;

#[derive(Parser)]
#[command(name = "dev-server")]
#[command(about = "Serve the portfolio site, reloading the project sheet on every page load")]
#[command(version)]
struct Args {
    /// Site configuration file (defaults to ./portfolio.toml when present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Address to listen on, overriding the configuration
    #[arg(short, long, env = "PORTFOLIO_BIND")]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    gj_portfolio::init_tracing();
    let args = Args::parse();

    let mut config = SiteConfig::discover(args.config.as_deref())
        .context("Failed to load site configuration")?;
    config.apply_overrides(None, args.bind);

    let bind = config.server.bind.clone();
    let base = config.url("");
    tracing::info!(source = %config.catalog_source(), "Project sheet location");

    let renderer = SiteRenderer::new(config).context("Failed to prepare templates")?;
    let app = build_router(AppState::new(renderer));

    let listener = tokio::net::TcpListener::bind(&bind)
        .await
        .with_context(|| format!("Failed to bind to {}", bind))?;
    tracing::info!("Dev server running on http://{}{}", bind, base);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = signal::ctrl_c().await {
        tracing::error!(error = %err, "Failed to listen for Ctrl+C");
        std::future::pending::<()>().await;
    }
}
