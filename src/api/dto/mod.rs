//! Request/response payloads for the REST API.

pub mod shorten;
pub mod user_urls;
