use std::sync::Arc;

use crate::api::middleware::auth::UidSigner;
use crate::application::services::{PipelineHandle, ShortenerService};

/// Shared application state injected into all handlers.
///
/// Built once in [`crate::server::run`]; there is no package-level
/// singleton anywhere.
#[derive(Clone)]
pub struct AppState {
    pub shortener: Arc<ShortenerService>,
    pub deletions: PipelineHandle,
    pub uid_signer: UidSigner,
}

impl AppState {
    pub fn new(
        shortener: Arc<ShortenerService>,
        deletions: PipelineHandle,
        uid_signer: UidSigner,
    ) -> Self {
        Self {
            shortener,
            deletions,
            uid_signer,
        }
    }
}
