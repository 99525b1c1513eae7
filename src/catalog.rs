//! The visible-only project catalog and its filter view.

use std::collections::{BTreeSet, HashSet};

use crate::decoder::Row;
use crate::project::{normalize_rows, Project};
use crate::source::CatalogSource;

/// Selected category filters. Ordered so links and file names are stable.
pub type CategorySet = BTreeSet<String>;

/// Ordered, read-only collection of visible projects
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    projects: Vec<Project>,
    /// Unique per project, same index as `projects`
    slugs: Vec<String>,
}

impl Catalog {
    /// Build from already normalized projects; invisible ones are dropped.
    pub fn new(projects: impl IntoIterator<Item = Project>) -> Self {
        Self::with_projects(projects.into_iter().filter(|p| p.visible).collect())
    }

    pub fn from_rows<'a>(rows: impl IntoIterator<Item = &'a Row>) -> Self {
        Self::with_projects(normalize_rows(rows))
    }

    fn with_projects(projects: Vec<Project>) -> Self {
        let slugs = unique_slugs(&projects);
        Self { projects, slugs }
    }

    /// Every project, in source order.
    pub fn all(&self) -> &[Project] {
        &self.projects
    }

    pub fn len(&self) -> usize {
        self.projects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.projects.is_empty()
    }

    /// Every project paired with its page slug, in source order.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &Project)> {
        self.slugs.iter().map(String::as_str).zip(&self.projects)
    }

    /// Projects whose category is selected, in source order. An empty
    /// selection means no filtering.
    pub fn filter_by_categories(&self, selected: &CategorySet) -> Vec<&Project> {
        self.filter_entries(selected)
            .into_iter()
            .map(|(_, project)| project)
            .collect()
    }

    /// [`Catalog::filter_by_categories`] keeping each project's slug.
    pub fn filter_entries(&self, selected: &CategorySet) -> Vec<(&str, &Project)> {
        self.entries()
            .filter(|(_, p)| {
                selected.is_empty() || (!p.category.is_empty() && selected.contains(&p.category))
            })
            .collect()
    }

    pub fn find_by_name(&self, name: &str) -> Option<&Project> {
        self.projects.iter().find(|p| p.name == name)
    }

    pub fn find_by_slug(&self, slug: &str) -> Option<&Project> {
        self.entries()
            .find(|(candidate, _)| *candidate == slug)
            .map(|(_, project)| project)
    }

    /// Distinct non-empty categories in order of first appearance.
    pub fn categories(&self) -> Vec<&str> {
        let mut seen = BTreeSet::new();
        self.projects
            .iter()
            .map(|p| p.category.as_str())
            .filter(|c| !c.is_empty() && seen.insert(*c))
            .collect()
    }
}

/// Slug of each project, suffixed `-2`, `-3`, … when an earlier project
/// already took it. Names with no usable characters become `project-<n>`.
fn unique_slugs(projects: &[Project]) -> Vec<String> {
    let mut taken = HashSet::new();
    projects
        .iter()
        .enumerate()
        .map(|(i, project)| {
            let mut base = project.slug();
            if base.is_empty() {
                base = format!("project-{}", i + 1);
            }
            let mut slug = base.clone();
            let mut n = 2;
            while !taken.insert(slug.clone()) {
                slug = format!("{}-{}", base, n);
                n += 1;
            }
            slug
        })
        .collect()
}

/// A new selection with `category` flipped. Applying it twice gives back
/// the original selection.
pub fn toggle_category(current: &CategorySet, category: &str) -> CategorySet {
    let mut next = current.clone();
    if !next.remove(category) {
        next.insert(category.to_string());
    }
    next
}

/// Parse a comma-separated selection such as `VFX,MoGraph`.
pub fn parse_category_list(raw: &str) -> CategorySet {
    raw.split(',')
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(str::to_string)
        .collect()
}

pub fn format_category_list(selected: &CategorySet) -> String {
    selected.iter().map(String::as_str).collect::<Vec<_>>().join(",")
}

/// Load state of the catalog for one page load.
///
/// `Loaded` and `Failed` are terminal; only `Unloaded` can load.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CatalogState {
    #[default]
    Unloaded,
    Loaded(Catalog),
    Failed(String),
}

impl CatalogState {
    pub async fn load(self, source: &CatalogSource) -> Self {
        match self {
            CatalogState::Unloaded => match crate::loader::load_catalog(source).await {
                Ok(catalog) => CatalogState::Loaded(catalog),
                Err(err) => {
                    tracing::error!(source = %source, error = %err, "Catalog load failed");
                    CatalogState::Failed(err.to_string())
                }
            },
            terminal => terminal,
        }
    }

    pub fn catalog(&self) -> Option<&Catalog> {
        match self {
            CatalogState::Loaded(catalog) => Some(catalog),
            _ => None,
        }
    }

    /// Loaded projects, or nothing before loading and after a failure.
    pub fn projects(&self) -> &[Project] {
        self.catalog().map(Catalog::all).unwrap_or(&[])
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            CatalogState::Failed(message) => Some(message),
            _ => None,
        }
    }

    pub fn is_loaded(&self) -> bool {
        matches!(self, CatalogState::Loaded(_))
    }
}
