use serde::Serialize;

/// One entry of the `GET /api/user/urls` response body.
#[derive(Debug, Serialize)]
pub struct UserUrlItem {
    pub short_url: String,
    pub original_url: String,
}
