//! Portfolio site for a visual-effects artist.
//!
//! The project sheet (CSV) is fetched, decoded into row mappings and
//! normalized into a visible-only [`Catalog`]. The catalog feeds a
//! Handlebars page renderer used by both the static site generator and the
//! dev server.

pub mod catalog;
pub mod config;
pub mod decoder;
pub mod error;
pub mod loader;
pub mod motion;
pub mod project;
pub mod render;
pub mod server;
pub mod site;
pub mod source;

pub use catalog::{toggle_category, Catalog, CatalogState, CategorySet};
pub use config::SiteConfig;
pub use decoder::{decode, Decoded, Row};
pub use error::{Error, FetchError, Result, RowDecodeError};
pub use loader::load_catalog;
pub use project::{Credit, Project};
pub use render::{LinkMode, PageRequest, SiteRenderer};
pub use server::{build_router, AppState};
pub use site::{build_site, BuildReport};
pub use source::CatalogSource;

/// Install the fmt subscriber used by both binaries.
///
/// `RUST_LOG` takes precedence over the built-in default filter.
pub fn init_tracing() {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "gj_portfolio=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .try_init();
}
