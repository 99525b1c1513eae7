//! Site configuration loading
//!
//! Values resolve in priority order:
//! 1. Command-line flags (applied by the binaries)
//! 2. Environment variables
//! 3. `portfolio.toml`
//! 4. Compiled defaults

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::source::CatalogSource;

pub const DEFAULT_CONFIG_FILE: &str = "portfolio.toml";
pub const ENV_CATALOG_SOURCE: &str = "PORTFOLIO_CATALOG_SOURCE";
pub const ENV_BIND: &str = "PORTFOLIO_BIND";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    pub artist_name: String,
    pub title: String,
    /// URL prefix the site is deployed under, e.g. `/vite-react-test`
    pub base_path: String,
    /// Directory served as the site root (images, videos, the CSV sheet)
    pub public_dir: PathBuf,
    pub catalog: CatalogConfig,
    pub media: MediaConfig,
    pub filters: FilterConfig,
    pub about: AboutConfig,
    pub server: ServerConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// URL, absolute path, or site-root-relative path of the project sheet
    pub source: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MediaConfig {
    pub images_dir: String,
    pub videos_dir: String,
    /// Main reel, relative to the public directory
    pub reel: Option<String>,
    pub reel_label: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    /// Filter controls shown above the gallery. Empty means every category
    /// present in the catalog.
    pub categories: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AboutConfig {
    pub markdown: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            artist_name: "GREG JOBLOVE".to_string(),
            title: "Greg Joblove | VFX".to_string(),
            base_path: String::new(),
            public_dir: PathBuf::from("public"),
            catalog: CatalogConfig::default(),
            media: MediaConfig::default(),
            filters: FilterConfig {
                categories: vec!["VFX".to_string(), "MoGraph".to_string()],
            },
            about: AboutConfig::default(),
            server: ServerConfig::default(),
        }
    }
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            source: "/gj_projects.csv".to_string(),
        }
    }
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self {
            images_dir: "images".to_string(),
            videos_dir: "videos".to_string(),
            reel: None,
            reel_label: "REEL".to_string(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0:3000".to_string(),
        }
    }
}

impl SiteConfig {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let mut config: SiteConfig =
            toml::from_str(content).map_err(|e| Error::Config(e.to_string()))?;
        config.base_path = normalize_base_path(&config.base_path);
        Ok(config)
    }

    /// Read `path`. Relative paths inside the file are taken relative to the
    /// directory holding it.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("cannot read {}: {}", path.display(), e)))?;
        let mut config = Self::from_toml_str(&content)?;
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            config.rebase(dir);
        }
        tracing::info!(path = %path.display(), "Loaded site configuration");
        Ok(config)
    }

    /// Load an explicit file, else `portfolio.toml` when present, else the
    /// defaults. Environment overrides are applied in every case.
    pub fn discover(explicit: Option<&Path>) -> Result<Self> {
        let mut config = match explicit {
            Some(path) => Self::load(path)?,
            None if Path::new(DEFAULT_CONFIG_FILE).is_file() => {
                Self::load(Path::new(DEFAULT_CONFIG_FILE))?
            }
            None => {
                tracing::info!("No {} found, using defaults", DEFAULT_CONFIG_FILE);
                Self::default()
            }
        };
        config.apply_env();
        Ok(config)
    }

    pub fn apply_env(&mut self) {
        self.apply_overrides(
            std::env::var(ENV_CATALOG_SOURCE).ok(),
            std::env::var(ENV_BIND).ok(),
        );
    }

    pub fn apply_overrides(&mut self, catalog_source: Option<String>, bind: Option<String>) {
        if let Some(source) = catalog_source.filter(|s| !s.trim().is_empty()) {
            self.catalog.source = source;
        }
        if let Some(bind) = bind.filter(|s| !s.trim().is_empty()) {
            self.server.bind = bind;
        }
    }

    fn rebase(&mut self, dir: &Path) {
        if self.public_dir.is_relative() {
            self.public_dir = dir.join(&self.public_dir);
        }
        if let Some(md) = self.about.markdown.as_mut() {
            if md.is_relative() {
                *md = dir.join(&*md);
            }
        }
    }

    pub fn catalog_source(&self) -> CatalogSource {
        CatalogSource::resolve(&self.catalog.source, &self.public_dir, &self.base_path)
    }

    /// The site root itself: the base path as mounted, or `/`.
    pub fn root_url(&self) -> String {
        if self.base_path.is_empty() {
            "/".to_string()
        } else {
            self.base_path.clone()
        }
    }

    /// Absolute URL path of `relative` under the deployed site root.
    pub fn url(&self, relative: &str) -> String {
        format!("{}/{}", self.base_path, relative.trim_start_matches('/'))
    }

    pub fn images_url(&self) -> String {
        self.url(&self.media.images_dir)
    }

    pub fn videos_url(&self) -> String {
        self.url(&self.media.videos_dir)
    }
}

/// `""` for the root, otherwise `/prefix` without a trailing slash.
fn normalize_base_path(raw: &str) -> String {
    let trimmed = raw.trim().trim_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("/{trimmed}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_empty_file_gives_defaults() {
        let config = SiteConfig::from_toml_str("").unwrap();
        assert_eq!(config, SiteConfig::default());
        assert_eq!(config.filters.categories, vec!["VFX", "MoGraph"]);
    }

    #[test]
    fn test_partial_sections_keep_other_defaults() {
        let config = SiteConfig::from_toml_str(
            r#"
            artist_name = "ANOTHER ARTIST"
            base_path = "vite-react-test/"

            [media]
            reel = "videos/2024_General_v7.webm"

            [server]
            bind = "127.0.0.1:8080"
            "#,
        )
        .unwrap();

        assert_eq!(config.artist_name, "ANOTHER ARTIST");
        assert_eq!(config.base_path, "/vite-react-test");
        assert_eq!(config.media.reel.as_deref(), Some("videos/2024_General_v7.webm"));
        assert_eq!(config.media.images_dir, "images");
        assert_eq!(config.server.bind, "127.0.0.1:8080");
        assert_eq!(config.catalog.source, "/gj_projects.csv");
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let err = SiteConfig::from_toml_str("artist_name = [").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_load_rebases_relative_paths() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("portfolio.toml");
        std::fs::write(
            &path,
            "public_dir = \"site\"\n[about]\nmarkdown = \"content/about.md\"\n",
        )
        .unwrap();

        let config = SiteConfig::load(&path).unwrap();
        assert_eq!(config.public_dir, dir.path().join("site"));
        assert_eq!(config.about.markdown, Some(dir.path().join("content/about.md")));
        assert_eq!(
            config.catalog_source(),
            CatalogSource::File(dir.path().join("site").join("gj_projects.csv"))
        );
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = SiteConfig::load(&dir.path().join("nope.toml")).unwrap_err();
        assert!(err.to_string().contains("nope.toml"));
    }

    #[test]
    fn test_overrides() {
        let mut config = SiteConfig::default();
        config.apply_overrides(Some("https://cdn.example.com/p.csv".into()), Some(String::new()));
        assert_eq!(config.catalog.source, "https://cdn.example.com/p.csv");
        assert_eq!(config.server.bind, "0.0.0.0:3000");
    }

    #[test]
    fn test_urls_respect_base_path() {
        let mut config = SiteConfig::default();
        assert_eq!(config.url("styles.css"), "/styles.css");
        assert_eq!(config.root_url(), "/");
        config.base_path = "/vite-react-test".into();
        assert_eq!(config.root_url(), "/vite-react-test");
        assert_eq!(config.images_url(), "/vite-react-test/images");
        assert_eq!(config.url("/videos/reel.webm"), "/vite-react-test/videos/reel.webm");
    }
}
