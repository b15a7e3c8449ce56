//! REST API route table, nested under `/api` by the top-level router.

use axum::Router;
use axum::routing::{get, post};

use crate::api::handlers::{
    batch_shorten_handler, delete_user_urls_handler, shorten_handler, user_urls_handler,
};
use crate::state::AppState;

pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/shorten", post(shorten_handler))
        .route("/shorten/batch", post(batch_shorten_handler))
        .route(
            "/user/urls",
            get(user_urls_handler).delete(delete_user_urls_handler),
        )
}
