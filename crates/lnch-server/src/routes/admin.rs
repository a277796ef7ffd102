//! Operator admin page and its static assets.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use axum::extract::State;
use axum::handler::Handler;
use axum::http::{StatusCode, Uri};
use axum::response::{Html, IntoResponse, Response};
use axum::Router;
use tower_http::services::ServeDir;
use tracing::warn;

/// Page served for the bare `/admin` path.
pub const ADMIN_PAGE: &str = "admin.html";

/// Files under `www_root`. Missing files are 404; the bare prefix gets the
/// admin page.
pub fn router(www_root: &Path) -> Router {
    let page = Arc::new(www_root.join(ADMIN_PAGE));
    let files = ServeDir::new(www_root).fallback(admin_page.with_state(page));

    Router::new().fallback_service(files)
}

async fn admin_page(State(page): State<Arc<PathBuf>>, uri: Uri) -> Response {
    if uri.path() != "/" {
        return StatusCode::NOT_FOUND.into_response();
    }

    match tokio::fs::read_to_string(page.as_path()).await {
        Ok(html) => Html(html).into_response(),
        Err(e) => {
            warn!("Cannot read admin page {}: {}", page.display(), e);
            StatusCode::NOT_FOUND.into_response()
        }
    }
}
