//! HTTP routes of the dev server.
//!
//! Every page request is a fresh page load: the catalog is fetched, decoded
//! and normalized for that request only, and nothing is cached between
//! requests.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use tower_http::{cors::CorsLayer, services::ServeDir};

use crate::catalog::{parse_category_list, CatalogState};
use crate::config::SiteConfig;
use crate::error::Error;
use crate::loader::load_catalog;
use crate::project::Project;
use crate::render::{stylesheet, LinkMode, PageRequest, SiteRenderer};

/// Shared state passed to all handlers
#[derive(Clone)]
pub struct AppState {
    renderer: Arc<SiteRenderer>,
}

impl AppState {
    pub fn new(renderer: SiteRenderer) -> Self {
        Self {
            renderer: Arc::new(renderer),
        }
    }

    pub fn config(&self) -> &SiteConfig {
        self.renderer.config()
    }
}

/// `?categories=VFX,MoGraph&project=Babygirl`
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub categories: Option<String>,
    pub project: Option<String>,
}

impl PageQuery {
    fn into_request(self) -> PageRequest {
        PageRequest {
            selected: self
                .categories
                .as_deref()
                .map(parse_category_list)
                .unwrap_or_default(),
            project: self.project.filter(|p| !p.is_empty()),
        }
    }
}

/// Error response carrying a JSON body
pub struct ApiError(Error);

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            Error::Fetch(_) => StatusCode::BAD_GATEWAY,
            Error::ProjectNotFound(_) => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status.is_server_error() {
            tracing::error!(error = %self.0, "Request failed");
        }
        (status, Json(json!({ "error": self.0.to_string() }))).into_response()
    }
}

/// Routes, nested under the configured base path when there is one.
pub fn build_router(state: AppState) -> Router {
    let base_path = state.config().base_path.clone();
    let public_dir = state.config().public_dir.clone();

    let routes = Router::new()
        .route("/", get(page))
        .route("/styles.css", get(styles))
        .route("/api/projects", get(list_projects))
        .route("/api/projects/:name", get(get_project))
        .route("/api/categories", get(list_categories))
        .fallback_service(ServeDir::new(public_dir))
        .with_state(state);

    let app = if base_path.is_empty() {
        routes
    } else {
        Router::new().nest(&base_path, routes)
    };

    app.layer(CorsLayer::permissive())
}

async fn page(State(state): State<AppState>, Query(query): Query<PageQuery>) -> Response {
    let source = state.config().catalog_source();
    tracing::debug!(source = %source, ?query, "Rendering page");
    let catalog = CatalogState::Unloaded.load(&source).await;

    let status = if catalog.error().is_some() {
        StatusCode::BAD_GATEWAY
    } else {
        StatusCode::OK
    };

    match state
        .renderer
        .render_page(&catalog, &query.into_request(), LinkMode::Server)
    {
        Ok(html) => (status, Html(html)).into_response(),
        Err(err) => ApiError(err).into_response(),
    }
}

async fn styles() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/css; charset=utf-8")],
        stylesheet(),
    )
}

async fn list_projects(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Result<Json<Vec<Project>>, ApiError> {
    let catalog = load_catalog(&state.config().catalog_source()).await?;
    let selected = query.into_request().selected;
    let projects = catalog
        .filter_by_categories(&selected)
        .into_iter()
        .cloned()
        .collect();
    Ok(Json(projects))
}

async fn get_project(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<Project>, ApiError> {
    let catalog = load_catalog(&state.config().catalog_source()).await?;
    let project = catalog
        .find_by_name(&name)
        .cloned()
        .ok_or(Error::ProjectNotFound(name))?;
    Ok(Json(project))
}

async fn list_categories(State(state): State<AppState>) -> Result<Json<Vec<String>>, ApiError> {
    let catalog = load_catalog(&state.config().catalog_source()).await?;
    Ok(Json(
        catalog.categories().into_iter().map(str::to_string).collect(),
    ))
}
