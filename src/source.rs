//! Where the project sheet comes from and how it is retrieved.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::FetchError;

const USER_AGENT: &str = concat!("gj-portfolio/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CatalogSource {
    File(PathBuf),
    Http(String),
}

impl CatalogSource {
    /// Interpret a configured source.
    ///
    /// URLs are fetched over HTTP. Anything else is a path relative to the
    /// deployed site root: `base_path` is stripped and the remainder is looked
    /// up under `public_dir`. Absolute paths that already exist on disk are
    /// used as they are.
    pub fn resolve(raw: &str, public_dir: &Path, base_path: &str) -> Self {
        let raw = raw.trim();
        if raw.starts_with("http://") || raw.starts_with("https://") {
            return CatalogSource::Http(raw.to_string());
        }

        let as_path = Path::new(raw);
        if as_path.is_absolute() && as_path.exists() {
            return CatalogSource::File(as_path.to_path_buf());
        }

        let base = base_path.trim_end_matches('/');
        let relative = if base.is_empty() {
            raw
        } else {
            raw.strip_prefix(base)
                .filter(|rest| rest.is_empty() || rest.starts_with('/'))
                .unwrap_or(raw)
        };
        CatalogSource::File(public_dir.join(relative.trim_start_matches('/')))
    }

    /// Retrieve the whole text. No retries; the first failure is returned.
    pub async fn fetch(&self) -> Result<String, FetchError> {
        match self {
            CatalogSource::File(path) => {
                tracing::debug!(path = %path.display(), "Reading project sheet");
                tokio::fs::read_to_string(path)
                    .await
                    .map_err(|source| FetchError::Read {
                        path: path.clone(),
                        source,
                    })
            }
            CatalogSource::Http(url) => fetch_url(url).await,
        }
    }
}

impl fmt::Display for CatalogSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogSource::File(path) => write!(f, "{}", path.display()),
            CatalogSource::Http(url) => f.write_str(url),
        }
    }
}

async fn fetch_url(url: &str) -> Result<String, FetchError> {
    let network = |e: reqwest::Error| FetchError::Network {
        url: url.to_string(),
        message: e.to_string(),
    };

    let client = reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .build()
        .map_err(network)?;

    tracing::debug!(url = %url, "Requesting project sheet");

    let response = client.get(url).send().await.map_err(network)?;

    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::Status {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    response.text().await.map_err(|e| FetchError::Body {
        url: url.to_string(),
        message: e.to_string(),
    })
}
