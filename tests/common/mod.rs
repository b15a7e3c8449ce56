#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use axum::http::{HeaderName, HeaderValue, header};
use axum::routing::{get, post};
use axum::{Router, middleware};
use microlink::api::handlers::{ping_handler, redirect_handler, shorten_text_handler};
use microlink::api::middleware::auth::{self, UID_COOKIE, UidSigner};
use microlink::api::routes::api_routes;
use microlink::application::services::{DeletionPipeline, PipelineConfig, ShortenerService};
use microlink::infrastructure::persistence::MemoryRepository;
use microlink::state::AppState;
use microlink::utils::RandomIdGenerator;

pub const BASE_URL: &str = "http://localhost:8080";
pub const TEST_SECRET: &str = "test-secret";

pub struct TestContext {
    pub state: AppState,
    pub pipeline: DeletionPipeline,
    pub repo: Arc<MemoryRepository>,
}

/// State over a fresh in-memory backend with a fast-flushing pipeline.
pub fn create_test_context() -> TestContext {
    let repo = Arc::new(MemoryRepository::new());

    let shortener = Arc::new(ShortenerService::new(
        repo.clone(),
        Arc::new(RandomIdGenerator::new()),
        BASE_URL,
        8,
    ));

    let pipeline = DeletionPipeline::spawn(
        repo.clone(),
        PipelineConfig {
            batch_size: 4,
            flush_interval: Duration::from_millis(50),
            retry_backoff: Duration::from_millis(50),
        },
    );

    let state = AppState::new(shortener, pipeline.handle(), UidSigner::new(TEST_SECRET));

    TestContext {
        state,
        pipeline,
        repo,
    }
}

/// The full route table with the UID cookie middleware, as wired in
/// production minus the outer tower-http layers.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/", post(shorten_text_handler))
        .route("/{short_id}", get(redirect_handler))
        .route("/ping", get(ping_handler))
        .nest("/api", api_routes())
        .layer(middleware::from_fn_with_state(state.clone(), auth::layer))
        .with_state(state)
}

/// Cookie header pair for a deterministic, correctly signed UID.
pub fn signed_cookie(uid: &str) -> (HeaderName, HeaderValue) {
    let value = UidSigner::new(TEST_SECRET).cookie_value(uid);
    (
        header::COOKIE,
        HeaderValue::from_str(&format!("{UID_COOKIE}={value}")).unwrap(),
    )
}
