use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::Parser;
use gj_portfolio::{build_site, CatalogState, SiteConfig, SiteRenderer};

#[derive(Parser)]
#[command(name = "site-generator")]
#[command(about = "Generate the static portfolio site")]
#[command(version)]
struct Args {
    /// Site configuration file (defaults to ./portfolio.toml when present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Project sheet location, overriding the configuration
    #[arg(short, long, env = "PORTFOLIO_CATALOG_SOURCE")]
    source: Option<String>,

    #[arg(short, long, default_value = "dist")]
    output: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    gj_portfolio::init_tracing();
    let args = Args::parse();

    let mut config = SiteConfig::discover(args.config.as_deref())
        .context("Failed to load site configuration")?;
    config.apply_overrides(args.source, None);

    let source = config.catalog_source();
    tracing::info!(source = %source, "Loading project catalog");

    let catalog = match CatalogState::Unloaded.load(&source).await {
        CatalogState::Loaded(catalog) => catalog,
        CatalogState::Failed(message) => bail!("{}", message),
        CatalogState::Unloaded => bail!("catalog was not loaded"),
    };

    let renderer = SiteRenderer::new(config).context("Failed to prepare templates")?;
    let report = build_site(&renderer, &catalog, &args.output)
        .with_context(|| format!("Failed to write site to {}", args.output.display()))?;

    tracing::info!(
        pages = report.pages,
        projects = report.projects,
        "Site generated in {}",
        report.output.display()
    );

    Ok(())
}
