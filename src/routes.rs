//! Top-level router configuration.
//!
//! # Route Structure
//!
//! - `POST /`                  - shorten a plain-text URL body
//! - `GET  /{short_id}`        - short link redirect
//! - `GET  /ping`              - storage backend health check
//! - `POST /api/shorten`       - shorten a JSON-wrapped URL
//! - `POST /api/shorten/batch` - shorten a correlated batch
//! - `GET/DELETE /api/user/urls` - per-user listing and deletion
//!
//! # Middleware
//!
//! - **UID cookie** - signed-cookie identification, issued on first contact
//! - **Tracing** - structured request/response logging
//! - **Compression** - gzip response bodies
//! - **Path normalization** - trailing slash handling

use axum::routing::{get, post};
use axum::{Router, middleware};
use tower::Layer;
use tower_http::compression::CompressionLayer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};
use tower_http::trace::TraceLayer;

use crate::api;
use crate::api::handlers::{ping_handler, redirect_handler, shorten_text_handler};
use crate::api::middleware::auth;
use crate::state::AppState;

/// Constructs the application router with all routes and middleware.
pub fn app_router(state: AppState) -> NormalizePath<Router> {
    let router = Router::new()
        .route("/", post(shorten_text_handler))
        .route("/{short_id}", get(redirect_handler))
        .route("/ping", get(ping_handler))
        .nest("/api", api::routes::api_routes())
        .layer(middleware::from_fn_with_state(state.clone(), auth::layer))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new());

    NormalizePathLayer::trim_trailing_slash().layer(router)
}
