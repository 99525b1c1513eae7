//! Static site output.

use std::fs;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::catalog::{Catalog, CatalogState, CategorySet};
use crate::error::Result;
use crate::render::{
    combines_static_filters, filter_slug, stylesheet, LinkMode, PageRequest, SiteRenderer,
    STYLESHEET,
};

pub const CATALOG_JSON: &str = "projects.json";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildReport {
    pub output: PathBuf,
    pub pages: usize,
    pub projects: usize,
    pub assets: usize,
}

/// Write the whole site for `catalog` into `output`.
///
/// Public assets are copied first so generated files always win.
pub fn build_site(renderer: &SiteRenderer, catalog: &Catalog, output: &Path) -> Result<BuildReport> {
    fs::create_dir_all(output)?;

    let mut report = BuildReport {
        output: output.to_path_buf(),
        projects: catalog.len(),
        ..BuildReport::default()
    };

    report.assets = copy_public_dir(&renderer.config().public_dir, output)?;
    fs::write(output.join(STYLESHEET), stylesheet())?;

    let state = CatalogState::Loaded(catalog.clone());

    let index = renderer.render_page(&state, &PageRequest::default(), LinkMode::Static)?;
    fs::write(output.join("index.html"), index)?;
    report.pages += 1;

    let categories = renderer.filter_categories(&state);
    if !combines_static_filters(categories.len()) {
        tracing::warn!(
            categories = categories.len(),
            "Too many filter categories to combine, writing one page per category"
        );
    }
    let filter_dir = output.join("filter");
    for selected in selections(&categories) {
        fs::create_dir_all(&filter_dir)?;
        let html = renderer.render_page(
            &state,
            &PageRequest::with_selected(selected.clone()),
            LinkMode::Static,
        )?;
        fs::write(filter_dir.join(format!("{}.html", filter_slug(&selected))), html)?;
        report.pages += 1;
    }

    let project_dir = output.join("projects");
    for (slug, _) in catalog.entries() {
        fs::create_dir_all(&project_dir)?;
        let request = PageRequest {
            selected: CategorySet::new(),
            project: Some(slug.to_string()),
        };
        let html = renderer.render_page(&state, &request, LinkMode::Static)?;
        fs::write(project_dir.join(format!("{}.html", slug)), html)?;
        report.pages += 1;
    }

    let json = serde_json::to_string_pretty(catalog.all())?;
    fs::write(output.join(CATALOG_JSON), json)?;

    tracing::info!(
        output = %output.display(),
        pages = report.pages,
        projects = report.projects,
        assets = report.assets,
        "Site written"
    );

    Ok(report)
}

/// Filter selections that get a page: every non-empty subset of
/// `categories`, or just the single categories when there are too many to
/// combine.
fn selections(categories: &[String]) -> Vec<CategorySet> {
    if !combines_static_filters(categories.len()) {
        return categories
            .iter()
            .map(|c| CategorySet::from([c.clone()]))
            .collect();
    }
    let n = categories.len();
    (1usize..(1 << n))
        .map(|mask| {
            categories
                .iter()
                .enumerate()
                .filter(|(i, _)| mask & (1 << i) != 0)
                .map(|(_, c)| c.clone())
                .collect()
        })
        .collect()
}

fn copy_public_dir(public_dir: &Path, output: &Path) -> Result<usize> {
    if !public_dir.is_dir() {
        tracing::warn!(path = %public_dir.display(), "Public directory not found, no assets copied");
        return Ok(0);
    }

    let mut copied = 0;
    for entry in WalkDir::new(public_dir)
        .follow_links(true)
        .into_iter()
        .filter_map(|e| e.ok())
    {
        // output may live inside the public directory
        if !entry.file_type().is_file() || entry.path().starts_with(output) {
            continue;
        }
        let Ok(relative) = entry.path().strip_prefix(public_dir) else {
            continue;
        };
        let dest = output.join(relative);
        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::copy(entry.path(), &dest)?;
        copied += 1;
    }
    Ok(copied)
}
