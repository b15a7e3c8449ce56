//! Handler for short URL resolution.

use axum::{
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
};

use crate::error::AppError;
use crate::state::AppState;

/// Redirects a short identifier to its original URL.
///
/// # Endpoint
///
/// `GET /{short_id}`
///
/// # Errors
///
/// 404 when the identifier was never issued, 410 when it was issued and
/// later deleted.
pub async fn redirect_handler(
    Path(short_id): Path<String>,
    State(state): State<AppState>,
) -> Result<Response, AppError> {
    let url = state.shortener.get(&short_id).await?;
    Ok(Redirect::temporary(&url).into_response())
}
