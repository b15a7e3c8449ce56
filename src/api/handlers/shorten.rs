//! Handlers for link shortening endpoints.

use axum::{
    Extension, Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::api::dto::shorten::{
    BatchShortenItem, BatchShortenResult, ShortenRequest, ShortenResponse,
};
use crate::api::middleware::auth::Uid;
use crate::application::services::BatchItem;
use crate::domain::entities::{AddOutcome, Record};
use crate::error::AppError;
use crate::state::AppState;

/// 201 for a fresh mapping, 409 when the URL was already shortened.
///
/// The conflict is not a failure: the response body still carries the short
/// URL, just the one assigned to whoever submitted the URL first.
fn status_for(outcome: AddOutcome) -> StatusCode {
    match outcome {
        AddOutcome::Created => StatusCode::CREATED,
        AddOutcome::AlreadyExists => StatusCode::CONFLICT,
    }
}

/// Shortens a URL submitted as a plain-text body.
///
/// # Endpoint
///
/// `POST /`
pub async fn shorten_text_handler(
    State(state): State<AppState>,
    Extension(uid): Extension<Uid>,
    body: String,
) -> Result<Response, AppError> {
    let shortened = state.shortener.add(Record::new(uid.0, body)).await?;
    Ok((status_for(shortened.outcome), shortened.short_url).into_response())
}

/// Shortens a URL submitted as JSON.
///
/// # Endpoint
///
/// `POST /api/shorten`
pub async fn shorten_handler(
    State(state): State<AppState>,
    Extension(uid): Extension<Uid>,
    Json(payload): Json<ShortenRequest>,
) -> Result<Response, AppError> {
    let shortened = state.shortener.add(Record::new(uid.0, payload.url)).await?;
    Ok((
        status_for(shortened.outcome),
        Json(ShortenResponse {
            result: shortened.short_url,
        }),
    )
        .into_response())
}

/// Shortens a batch of URLs, matching results by correlation id.
///
/// # Endpoint
///
/// `POST /api/shorten/batch`
pub async fn batch_shorten_handler(
    State(state): State<AppState>,
    Extension(uid): Extension<Uid>,
    Json(items): Json<Vec<BatchShortenItem>>,
) -> Result<Response, AppError> {
    let items = items
        .into_iter()
        .map(|i| BatchItem {
            corr_id: i.correlation_id,
            url: i.original_url,
        })
        .collect();

    let results = state.shortener.batch(&uid.0, items).await?;

    let body: Vec<BatchShortenResult> = results
        .into_iter()
        .map(|r| BatchShortenResult {
            correlation_id: r.corr_id,
            short_url: r.short_url,
        })
        .collect();

    Ok((StatusCode::CREATED, Json(body)).into_response())
}
