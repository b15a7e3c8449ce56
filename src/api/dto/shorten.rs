use serde::{Deserialize, Serialize};

/// `POST /api/shorten` request body.
#[derive(Debug, Deserialize)]
pub struct ShortenRequest {
    pub url: String,
}

/// `POST /api/shorten` response body.
#[derive(Debug, Serialize)]
pub struct ShortenResponse {
    pub result: String,
}

/// One entry of the `POST /api/shorten/batch` request body.
#[derive(Debug, Deserialize)]
pub struct BatchShortenItem {
    pub correlation_id: String,
    pub original_url: String,
}

/// One entry of the `POST /api/shorten/batch` response body.
#[derive(Debug, Serialize)]
pub struct BatchShortenResult {
    pub correlation_id: String,
    pub short_url: String,
}
