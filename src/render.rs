//! HTML rendering of the portfolio page.
//!
//! Templates and the stylesheet are embedded at compile time. All UI state
//! (selected filters, open project) comes in through [`PageRequest`]; the
//! renderer keeps none of its own.

use handlebars::Handlebars;
use include_dir::{include_dir, Dir};
use serde::Serialize;

use crate::catalog::{format_category_list, toggle_category, Catalog, CatalogState, CategorySet};
use crate::config::SiteConfig;
use crate::error::Result;
use crate::motion::{self, Transition};
use crate::project::{slugify, MediaItem, Project};

static TEMPLATES: Dir<'_> = include_dir!("$CARGO_MANIFEST_DIR/templates");
static ASSETS: Dir<'_> = include_dir!("$CARGO_MANIFEST_DIR/static");

const PAGE_TEMPLATE: &str = "page";

/// Most filter categories whose every combination is pre-rendered. Past this
/// the static site gets one page per category and toggles select a single
/// category.
pub const MAX_COMBINED_STATIC_FILTERS: usize = 6;
pub const STYLESHEET: &str = "styles.css";

/// Embedded stylesheet contents
pub fn stylesheet() -> &'static str {
    ASSETS
        .get_file(STYLESHEET)
        .and_then(|f| f.contents_utf8())
        .unwrap_or("/* styles not found */")
}

/// UI state for one render
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageRequest {
    pub selected: CategorySet,
    /// Project shown in the lightbox, by name for [`LinkMode::Server`] and
    /// by slug for [`LinkMode::Static`]
    pub project: Option<String>,
}

impl PageRequest {
    pub fn with_selected(selected: CategorySet) -> Self {
        Self {
            selected,
            project: None,
        }
    }
}

/// How links between page states are written
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkMode {
    /// Query parameters handled by the dev server
    Server,
    /// Pre-rendered files written by the site builder
    Static,
}

impl LinkMode {
    pub fn page(self, config: &SiteConfig, selected: &CategorySet) -> String {
        match self {
            LinkMode::Server => with_query(
                config.root_url(),
                &[("categories", format_category_list(selected))],
            ),
            LinkMode::Static if selected.is_empty() => config.url("index.html"),
            LinkMode::Static => config.url(&format!("filter/{}.html", filter_slug(selected))),
        }
    }

    /// Link opening `project` in the lightbox. `slug` is the project's
    /// catalog slug, unique within the catalog.
    pub fn project(
        self,
        config: &SiteConfig,
        selected: &CategorySet,
        project: &Project,
        slug: &str,
    ) -> String {
        match self {
            LinkMode::Server => with_query(
                config.root_url(),
                &[
                    ("categories", format_category_list(selected)),
                    ("project", project.name.clone()),
                ],
            ),
            LinkMode::Static => config.url(&format!("projects/{}.html", slug)),
        }
    }

    /// Resolve [`PageRequest::project`]: a name for server links, a slug for
    /// pre-rendered pages.
    fn find_project<'a>(self, catalog: &'a Catalog, key: &str) -> Option<&'a Project> {
        match self {
            LinkMode::Server => catalog.find_by_name(key),
            LinkMode::Static => catalog.find_by_slug(key),
        }
    }
}

/// Whether a static site with `count` filter categories pre-renders every
/// combination of them.
pub fn combines_static_filters(count: usize) -> bool {
    count <= MAX_COMBINED_STATIC_FILTERS
}

/// File stem of a pre-rendered filter page, e.g. `mograph+vfx`.
pub fn filter_slug(selected: &CategorySet) -> String {
    selected
        .iter()
        .map(|c| slugify(c))
        .collect::<Vec<_>>()
        .join("+")
}

fn with_query(path: String, pairs: &[(&str, String)]) -> String {
    let pairs: Vec<(&str, &str)> = pairs
        .iter()
        .filter(|(_, value)| !value.is_empty())
        .map(|(key, value)| (*key, value.as_str()))
        .collect();
    if pairs.is_empty() {
        return path;
    }
    match reqwest::Url::parse_with_params("http://localhost/", &pairs) {
        Ok(url) => format!("{}?{}", path, url.query().unwrap_or_default()),
        Err(_) => path,
    }
}

#[derive(Debug, Serialize)]
struct PageView<'a> {
    title: &'a str,
    artist_name: &'a str,
    home_url: String,
    stylesheet_url: String,
    motion_css: String,
    landing: Vec<LandingChar>,
    landing_done_ms: u32,
    nav: Vec<NavLink>,
    reel: Option<ReelView>,
    filters: Vec<FilterToggle>,
    projects: Vec<ProjectCard<'a>>,
    loading: bool,
    error: Option<&'a str>,
    about_html: Option<&'a str>,
    lightbox: Option<LightboxView<'a>>,
}

#[derive(Debug, Serialize)]
struct LandingChar {
    ch: String,
    delay_ms: u32,
}

#[derive(Debug, Serialize)]
struct NavLink {
    label: &'static str,
    href: &'static str,
    delay_ms: u32,
}

#[derive(Debug, Serialize)]
struct ReelView {
    src: String,
    mime: &'static str,
    label: String,
}

#[derive(Debug, Serialize)]
struct FilterToggle {
    category: String,
    id: String,
    checked: bool,
    href: String,
}

#[derive(Debug, Serialize)]
struct ProjectCard<'a> {
    name: &'a str,
    shorthand: &'a str,
    category: &'a str,
    display_year: &'a str,
    href: String,
    delay_ms: u32,
}

#[derive(Debug, Serialize)]
struct CreditView<'a> {
    role: &'a str,
    label: &'a str,
    url: Option<&'a str>,
}

#[derive(Debug, Serialize)]
struct LightboxView<'a> {
    name: &'a str,
    name_lower: String,
    year: &'a str,
    category: &'a str,
    credits: Vec<CreditView<'a>>,
    chips: Vec<&'a str>,
    blurb: &'a str,
    primary_media: Option<MediaItem>,
    extra_media: Vec<MediaItem>,
    media_aspect: &'a str,
    link: Option<&'a str>,
    link_feature: bool,
    close_url: String,
}

pub struct SiteRenderer {
    registry: Handlebars<'static>,
    config: SiteConfig,
    about_html: Option<String>,
}

impl SiteRenderer {
    pub fn new(config: SiteConfig) -> Result<Self> {
        let mut registry = Handlebars::new();

        for file in TEMPLATES.files() {
            register(&mut registry, file, false)?;
        }
        if let Some(partials) = TEMPLATES.get_dir("partials") {
            for file in partials.files() {
                register(&mut registry, file, true)?;
            }
        }

        let about_html = load_about(&config);

        Ok(Self {
            registry,
            config,
            about_html,
        })
    }

    pub fn config(&self) -> &SiteConfig {
        &self.config
    }

    pub fn render_page(
        &self,
        state: &CatalogState,
        request: &PageRequest,
        mode: LinkMode,
    ) -> Result<String> {
        let config = &self.config;
        let selected = &request.selected;

        let projects = match state.catalog() {
            Some(catalog) => catalog
                .filter_entries(selected)
                .into_iter()
                .enumerate()
                .map(|(i, (slug, p))| ProjectCard {
                    name: &p.name,
                    shorthand: &p.shorthand,
                    category: &p.category,
                    display_year: p.display_year(),
                    href: mode.project(config, selected, p, slug),
                    delay_ms: motion::stagger_delay_ms(Transition::ContainerReveal, i),
                })
                .collect(),
            None => Vec::new(),
        };

        let lightbox = request.project.as_deref().and_then(|key| {
            let found = state.catalog().and_then(|c| mode.find_project(c, key));
            if found.is_none() {
                tracing::debug!(project = %key, "Requested project is not in the catalog");
            }
            found.map(|p| self.lightbox(p, mode.page(config, selected)))
        });

        let view = PageView {
            title: &config.title,
            artist_name: &config.artist_name,
            home_url: mode.page(config, &CategorySet::new()),
            stylesheet_url: config.url(STYLESHEET),
            motion_css: motion::css_variables(),
            landing: motion::typewriter_schedule(&config.artist_name)
                .into_iter()
                .map(|(ch, delay_ms)| LandingChar {
                    ch: ch.to_string(),
                    delay_ms,
                })
                .collect(),
            landing_done_ms: motion::landing_duration_ms(&config.artist_name),
            nav: nav_links(),
            reel: self.reel(),
            filters: self.filters(state, selected, mode),
            projects,
            loading: matches!(state, CatalogState::Unloaded),
            error: state.error(),
            about_html: self.about_html.as_deref(),
            lightbox,
        };

        Ok(self.registry.render(PAGE_TEMPLATE, &view)?)
    }

    /// Categories offered as filter toggles: the configured list, or every
    /// category in the catalog when none is configured.
    pub fn filter_categories(&self, state: &CatalogState) -> Vec<String> {
        if self.config.filters.categories.is_empty() {
            state
                .catalog()
                .map(|c| c.categories().into_iter().map(str::to_string).collect())
                .unwrap_or_default()
        } else {
            self.config.filters.categories.clone()
        }
    }

    fn filters(&self, state: &CatalogState, selected: &CategorySet, mode: LinkMode) -> Vec<FilterToggle> {
        let categories = self.filter_categories(state);
        let combine = mode == LinkMode::Server || combines_static_filters(categories.len());
        categories
            .into_iter()
            .map(|category| {
                let next = if combine {
                    toggle_category(selected, &category)
                } else if selected.contains(&category) {
                    CategorySet::new()
                } else {
                    CategorySet::from([category.clone()])
                };
                FilterToggle {
                    id: format!("{}-filter", slugify(&category)),
                    checked: selected.contains(&category),
                    href: mode.page(&self.config, &next),
                    category,
                }
            })
            .collect()
    }

    fn reel(&self) -> Option<ReelView> {
        let reel = self.config.media.reel.as_deref()?;
        let mime = if reel.to_ascii_lowercase().ends_with(".webm") {
            "video/webm"
        } else {
            "video/mp4"
        };
        Some(ReelView {
            src: self.config.url(reel),
            mime,
            label: self.config.media.reel_label.clone(),
        })
    }

    fn lightbox<'a>(&self, project: &'a Project, close_url: String) -> LightboxView<'a> {
        let mut media = project
            .media(&self.config.images_url(), &self.config.videos_url())
            .into_iter();
        LightboxView {
            name: &project.name,
            name_lower: project.name.to_lowercase(),
            year: &project.year,
            category: &project.category,
            credits: project
                .credits
                .iter()
                .map(|credit| {
                    let link = credit.person_link();
                    CreditView {
                        role: &credit.role,
                        label: link.label,
                        url: link.url,
                    }
                })
                .collect(),
            chips: project.chips(),
            blurb: &project.blurb,
            primary_media: media.next(),
            extra_media: media.collect(),
            media_aspect: &project.media_aspect,
            link: Some(project.link.as_str()).filter(|l| !l.is_empty()),
            link_feature: project.link_feature,
            close_url,
        }
    }
}

fn register(
    registry: &mut Handlebars<'static>,
    file: &include_dir::File<'_>,
    partial: bool,
) -> Result<()> {
    let path = file.path();
    if path.extension().and_then(|e| e.to_str()) != Some("hbs") {
        return Ok(());
    }
    let (Some(name), Some(source)) = (
        path.file_stem().and_then(|s| s.to_str()),
        file.contents_utf8(),
    ) else {
        tracing::warn!(path = %path.display(), "Skipping unreadable template");
        return Ok(());
    };

    if partial {
        registry.register_partial(name, source)?;
    } else {
        registry.register_template_string(name, source)?;
    }
    Ok(())
}

fn load_about(config: &SiteConfig) -> Option<String> {
    let path = config.about.markdown.as_ref()?;
    match std::fs::read_to_string(path) {
        Ok(md) => Some(markdown::to_html(&md)),
        Err(err) => {
            tracing::warn!(path = %path.display(), error = %err, "About section markdown unavailable");
            None
        }
    }
}

fn nav_links() -> Vec<NavLink> {
    [("projects", "#projects"), ("reels", "#reel"), ("about", "#about")]
        .into_iter()
        .enumerate()
        .map(|(i, (label, href))| NavLink {
            label,
            href,
            delay_ms: motion::stagger_delay_ms(Transition::NavbarReveal, i),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use crate::decoder::decode;

    const SHEET: &str = "name,credits,year,media_path,visible,category,blurb,tags,media_aspect,link_feature,link\n\
        Babygirl,\"Artist,Greg Joblove;Studio,Phosphene[https://phosphene.tv]\",12/25/2024,BabyGirl.jpg,TRUE,VFX,Invisible VFX work,\"paint, beauty\",2/3,TRUE,https://a24films.com/films/babygirl\n\
        Bankrupt Opener,,8/10/2022,,TRUE,MoGraph,Opening titles,,,FALSE,\n\
        Draft,,2020,,FALSE,VFX,Unreleased,,,FALSE,\n";

    fn loaded() -> CatalogState {
        CatalogState::Loaded(Catalog::from_rows(&decode(SHEET).rows))
    }

    fn renderer() -> SiteRenderer {
        let mut config = SiteConfig::default();
        config.media.reel = Some("videos/2024_General_v7.webm".into());
        config.media.reel_label = "2025 REEL".into();
        SiteRenderer::new(config).unwrap()
    }

    fn selected(items: &[&str]) -> CategorySet {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_page_lists_visible_projects() {
        let html = renderer()
            .render_page(&loaded(), &PageRequest::default(), LinkMode::Server)
            .unwrap();
        assert!(html.contains("Babygirl"));
        assert!(html.contains("Bankrupt Opener"));
        assert!(!html.contains("Draft"));
        assert!(html.contains("2025 REEL"));
        assert!(html.contains("--header-slide-duration: 1200ms"));
    }

    #[test]
    fn test_filtered_page_hides_other_categories() {
        let html = renderer()
            .render_page(
                &loaded(),
                &PageRequest::with_selected(selected(&["MoGraph"])),
                LinkMode::Server,
            )
            .unwrap();
        assert!(html.contains("Bankrupt Opener"));
        assert!(!html.contains(">Babygirl<"));
        assert!(html.contains("id=\"mograph-filter\" checked"));
    }

    #[test]
    fn test_lightbox_shows_selected_project() {
        let request = PageRequest {
            selected: CategorySet::new(),
            project: Some("Babygirl".into()),
        };
        let html = renderer()
            .render_page(&loaded(), &request, LinkMode::Server)
            .unwrap();
        assert!(html.contains("class=\"lightbox\""));
        assert!(html.contains("Greg Joblove"));
        assert!(html.contains("https://phosphene.tv"));
        assert!(html.contains("/images/BabyGirl.jpg"));
        assert!(html.contains(">paint<"));
        assert!(html.contains("babygirl"));
    }

    #[test]
    fn test_unknown_project_renders_without_lightbox() {
        let request = PageRequest {
            selected: CategorySet::new(),
            project: Some("Draft".into()),
        };
        let html = renderer()
            .render_page(&loaded(), &request, LinkMode::Server)
            .unwrap();
        assert!(!html.contains("class=\"lightbox\""));
    }

    #[test]
    fn test_failed_state_renders_error_panel() {
        let state = CatalogState::Failed("Failed to fetch project catalog: boom".into());
        let html = renderer()
            .render_page(&state, &PageRequest::default(), LinkMode::Server)
            .unwrap();
        assert!(html.contains("class=\"catalog-error\""));
        assert!(html.contains("boom"));
        assert!(!html.contains("class=\"project-card\""));
    }

    #[test]
    fn test_links_per_mode() {
        let config = SiteConfig {
            base_path: "/vite-react-test".into(),
            ..SiteConfig::default()
        };
        let vfx = selected(&["VFX"]);
        let both = selected(&["VFX", "MoGraph"]);

        assert_eq!(LinkMode::Server.page(&config, &CategorySet::new()), "/vite-react-test");
        assert_eq!(
            LinkMode::Server.page(&config, &both),
            "/vite-react-test?categories=MoGraph%2CVFX"
        );
        assert_eq!(LinkMode::Server.page(&SiteConfig::default(), &vfx), "/?categories=VFX");
        assert_eq!(LinkMode::Static.page(&config, &vfx), "/vite-react-test/filter/vfx.html");
        assert_eq!(
            LinkMode::Static.page(&config, &CategorySet::new()),
            "/vite-react-test/index.html"
        );

        let catalog = Catalog::from_rows(&decode(SHEET).rows);
        let babygirl = catalog.find_by_name("Babygirl").unwrap();
        assert_eq!(
            LinkMode::Server.project(&config, &vfx, babygirl, "babygirl"),
            "/vite-react-test?categories=VFX&project=Babygirl"
        );
        assert_eq!(
            LinkMode::Static.project(&config, &vfx, babygirl, "babygirl"),
            "/vite-react-test/projects/babygirl.html"
        );
    }

    #[test]
    fn test_static_lightbox_is_keyed_by_slug() {
        let catalog = Catalog::from_rows(
            &decode("name,visible,blurb\nThe Mix,TRUE,first cut\nthe mix!,TRUE,second cut\n").rows,
        );
        let state = CatalogState::Loaded(catalog);
        let renderer = renderer();

        let index = renderer
            .render_page(&state, &PageRequest::default(), LinkMode::Static)
            .unwrap();
        assert!(index.contains("/projects/the-mix.html"));
        assert!(index.contains("/projects/the-mix-2.html"));

        let request = PageRequest {
            selected: CategorySet::new(),
            project: Some("the-mix-2".into()),
        };
        let html = renderer
            .render_page(&state, &request, LinkMode::Static)
            .unwrap();
        assert!(html.contains("second cut"));
        assert!(!html.contains("first cut"));
    }

    #[test]
    fn test_many_static_filters_select_one_category() {
        let header = "name,visible,category\n";
        let rows: String = (1..=8).map(|i| format!("P{i},TRUE,C{i}\n")).collect();
        let catalog = Catalog::from_rows(&decode(&format!("{header}{rows}")).rows);
        let state = CatalogState::Loaded(catalog);

        let mut config = SiteConfig::default();
        config.filters.categories.clear();
        let renderer = SiteRenderer::new(config).unwrap();

        let html = renderer
            .render_page(&state, &PageRequest::with_selected(selected(&["C1"])), LinkMode::Static)
            .unwrap();
        assert!(html.contains("/filter/c2.html"));
        assert!(!html.contains("/filter/c1+c2.html"));
        assert!(html.contains("class=\"filter\" href=\"/index.html\""));

        let served = renderer
            .render_page(&state, &PageRequest::with_selected(selected(&["C1"])), LinkMode::Server)
            .unwrap();
        assert!(served.contains("C1%2CC2"));
    }

    #[test]
    fn test_filter_slug() {
        assert_eq!(filter_slug(&selected(&["VFX", "MoGraph"])), "mograph+vfx");
    }

    #[test]
    fn test_about_markdown_is_rendered() {
        let dir = tempfile::tempdir().unwrap();
        let about = dir.path().join("about.md");
        std::fs::write(&about, "I am a **Visual Effects Artist**.").unwrap();

        let mut config = SiteConfig::default();
        config.about.markdown = Some(about);
        let html = SiteRenderer::new(config)
            .unwrap()
            .render_page(&loaded(), &PageRequest::default(), LinkMode::Static)
            .unwrap();
        assert!(html.contains("<strong>Visual Effects Artist</strong>"));
    }

    #[test]
    fn test_stylesheet_is_embedded() {
        assert!(stylesheet().contains(".lightbox"));
    }
}
