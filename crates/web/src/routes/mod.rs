//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET  /               - Home page (grid or promotional panel)
//! POST /refresh        - Manual refresh, redirects home
//! GET  /health         - Health check
//!
//! # API
//! GET  /api/update     - Current inventory as JSON
//! POST /api/auth       - Admin password check
//!
//! # Admin
//! GET  /manage         - Login prompt or selection page (?q= search)
//! POST /manage/login   - Login form
//! POST /manage/toggle  - Add/remove a store
//! POST /manage/logout  - Clear the admin flag
//!
//! # Assets
//! GET  /stores.json    - Store directory
//! GET  /static/*       - CSS and JS
//! ```

pub mod api;
pub mod home;
pub mod manage;

use axum::{
    Router, middleware,
    routing::{get, post},
};
use tower_http::services::{ServeDir, ServeFile};

use crate::middleware::{request_id_middleware, security_headers_middleware};
use crate::state::AppState;

/// Create the API routes router.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/update", get(api::update))
        .route("/auth", post(api::auth))
}

/// Create the admin routes router.
pub fn manage_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(manage::index))
        .route("/login", post(manage::login))
        .route("/toggle", post(manage::toggle))
        .route("/logout", post(manage::logout))
}

/// Create all page and API routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home::home))
        .route("/refresh", post(home::refresh))
        .nest("/api", api_routes())
        .nest("/manage", manage_routes())
}

/// Build the full application: routes, assets and middleware.
///
/// Tracing and Sentry layers are added by the binary.
pub fn app(state: AppState) -> Router {
    let static_dir = ServeDir::new(&state.config().static_dir);
    let stores_file = ServeFile::new(&state.config().store_directory_path);

    Router::new()
        .route("/health", get(health))
        .merge(routes())
        .route_service("/stores.json", stores_file)
        .nest_service("/static", static_dir)
        .layer(middleware::from_fn(security_headers_middleware))
        .layer(middleware::from_fn(request_id_middleware))
        .with_state(state)
}

/// Liveness health check endpoint.
async fn health() -> &'static str {
    "ok"
}
