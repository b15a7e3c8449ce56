//! Handlers for the per-user listing and deletion endpoints.

use axum::{
    Extension, Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::api::dto::user_urls::UserUrlItem;
use crate::api::middleware::auth::Uid;
use crate::error::AppError;
use crate::state::AppState;

/// Lists everything the requester has shortened.
///
/// # Endpoint
///
/// `GET /api/user/urls` — 204 when the list is empty.
pub async fn user_urls_handler(
    State(state): State<AppState>,
    Extension(uid): Extension<Uid>,
) -> Result<Response, AppError> {
    let urls = state.shortener.user_urls(&uid.0).await?;

    if urls.is_empty() {
        return Ok(StatusCode::NO_CONTENT.into_response());
    }

    let body: Vec<UserUrlItem> = urls
        .into_iter()
        .map(|u| UserUrlItem {
            short_url: u.short_url,
            original_url: u.original_url,
        })
        .collect();

    Ok(Json(body).into_response())
}

/// Queues the requester's identifiers for deletion.
///
/// # Endpoint
///
/// `DELETE /api/user/urls` — responds 202 immediately; persistence happens
/// asynchronously and identifiers the requester does not own are silently
/// skipped.
pub async fn delete_user_urls_handler(
    State(state): State<AppState>,
    Extension(uid): Extension<Uid>,
    Json(short_ids): Json<Vec<String>>,
) -> Result<Response, AppError> {
    if short_ids.is_empty() {
        return Err(AppError::bad_request(
            "Identifier list must not be empty",
            json!({}),
        ));
    }

    state.deletions.process(&uid.0, short_ids);
    Ok(StatusCode::ACCEPTED.into_response())
}
