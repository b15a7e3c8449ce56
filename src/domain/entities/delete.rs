//! Deletion intents consumed by the soft-delete pipeline.

use serde::{Deserialize, Serialize};

/// One pending deletion: a user asking to remove one short identifier.
///
/// Ownership is not checked here. The storage backend compares the UID on
/// the intent against the UID recorded for the identifier at persistence
/// time and silently skips non-matching pairs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteIntent {
    pub uid: String,
    pub short_id: String,
}

impl DeleteIntent {
    pub fn new(uid: impl Into<String>, short_id: impl Into<String>) -> Self {
        Self {
            uid: uid.into(),
            short_id: short_id.into(),
        }
    }
}
