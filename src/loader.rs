//! fetch → decode → normalize, once per page load.

use crate::catalog::Catalog;
use crate::decoder::decode;
use crate::error::Result;
use crate::source::CatalogSource;

/// Run the whole pipeline against `source`.
///
/// Only a failed fetch is an error. Rows that cannot be decoded are logged
/// and left out; the remaining rows still make up the catalog.
pub async fn load_catalog(source: &CatalogSource) -> Result<Catalog> {
    let text = source.fetch().await?;

    let decoded = decode(&text);
    for err in &decoded.errors {
        tracing::warn!(source = %source, line = err.line(), "Skipping row: {}", err);
    }

    let catalog = Catalog::from_rows(&decoded.rows);
    tracing::info!(
        source = %source,
        rows = decoded.rows.len(),
        skipped = decoded.errors.len(),
        visible = catalog.len(),
        "Loaded project catalog"
    );

    Ok(catalog)
}
