//! Storage backend health check.

use axum::{extract::State, http::StatusCode};

use crate::error::AppError;
use crate::state::AppState;

/// Probes the storage backend.
///
/// # Endpoint
///
/// `GET /ping`
pub async fn ping_handler(State(state): State<AppState>) -> Result<StatusCode, AppError> {
    state.shortener.ping().await?;
    Ok(StatusCode::OK)
}
