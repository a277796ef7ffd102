//! Route handlers for the lnch server.

pub mod admin;
pub mod health;
pub mod offers;

use std::path::Path;

use axum::routing::get;
use axum::Router;

use crate::state::AppState;

/// Build the router with all routes, nested under `root_path` unless it is `/`.
pub fn router(state: AppState, www_root: &Path, root_path: &str) -> Router {
    let app = Router::new()
        // LNURL-channel
        .route("/rq/0/:secret", get(offers::channel_request))
        .route("/rq/1/", get(offers::open_channel))
        .route("/rq/1", get(offers::open_channel))
        // Operator
        .route(
            "/create/:auth_key/:local_amount/:push_amount",
            get(offers::create),
        )
        .nest_service("/admin", admin::router(www_root))
        // Health check
        .route("/health", get(health::health))
        .with_state(state);

    let root_path = root_path.trim_end_matches('/');
    if root_path.is_empty() {
        app
    } else {
        Router::new().nest(root_path, app)
    }
}
