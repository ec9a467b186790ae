//! HTTP front end for the dashboard.
//!
//! # Routes
//!
//! - `GET /` - the dashboard rendered from the latest cached snapshot
//! - `GET /static/{*path}` - files from the static directory

use std::path::{Component, Path as FsPath, PathBuf};
use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::get,
    Router,
};
use log::{debug, info};
use tokio::net::TcpListener;

use super::cache::DashboardCache;
use super::render::render_dashboard;
use crate::error::Result;

struct AppState {
    cache: Arc<DashboardCache>,
    static_dir: PathBuf,
}

pub struct DashboardServer {
    state: Arc<AppState>,
}

impl DashboardServer {
    pub fn new(cache: Arc<DashboardCache>, static_dir: PathBuf) -> Self {
        Self {
            state: Arc::new(AppState { cache, static_dir }),
        }
    }

    fn router(state: Arc<AppState>) -> Router {
        Router::new()
            .route("/", get(index))
            .route("/static/{*path}", get(static_file))
            .with_state(state)
    }

    pub async fn run(self, addr: &str) -> Result<()> {
        let listener = TcpListener::bind(addr).await?;
        info!("Dashboard listening on {addr}");

        axum::serve(listener, Self::router(self.state)).await?;
        Ok(())
    }
}

async fn index(State(state): State<Arc<AppState>>) -> Html<String> {
    let snapshot = state.cache.get().await;
    Html(render_dashboard(&snapshot))
}

async fn static_file(State(state): State<Arc<AppState>>, Path(path): Path<String>) -> Response {
    let Some(file) = resolve_static_path(&state.static_dir, &path) else {
        debug!("Rejected static path: {path}");
        return StatusCode::NOT_FOUND.into_response();
    };

    match tokio::fs::read(&file).await {
        Ok(bytes) => ([(header::CONTENT_TYPE, content_type(&file))], bytes).into_response(),
        Err(e) => {
            debug!("Static file {} not served: {e}", file.display());
            StatusCode::NOT_FOUND.into_response()
        }
    }
}

/// Only plain relative paths below the static directory are served.
fn resolve_static_path(root: &FsPath, requested: &str) -> Option<PathBuf> {
    let relative = FsPath::new(requested);
    relative
        .components()
        .all(|component| matches!(component, Component::Normal(_)))
        .then(|| root.join(relative))
}

fn content_type(file: &FsPath) -> &'static str {
    match file.extension().and_then(|ext| ext.to_str()) {
        Some("css") => "text/css; charset=utf-8",
        Some("js") => "text/javascript; charset=utf-8",
        Some("html") => "text/html; charset=utf-8",
        Some("json") => "application/json",
        Some("svg") => "image/svg+xml",
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("ico") => "image/x-icon",
        Some("woff2") => "font/woff2",
        _ => "application/octet-stream",
    }
}
