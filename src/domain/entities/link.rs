//! Link entities: submissions, stored mappings, and per-user ownership.

use serde::{Deserialize, Serialize};

/// A submission payload: who shortened what.
///
/// The URL is treated as an opaque string. Equality is byte-exact; no
/// normalization is applied anywhere in the service. The UID may be empty,
/// meaning "anonymous".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub uid: String,
    pub url: String,
}

impl Record {
    pub fn new(uid: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            uid: uid.into(),
            url: url.into(),
        }
    }
}

/// The persisted unit: one short identifier bound to one URL.
///
/// Created exactly once, on the first successful add of its URL. Never
/// removed; deletion only flips `deleted`, and the flag is irreversible.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredLink {
    pub short_id: String,
    pub url: String,
    pub uid: String,
    pub deleted: bool,
}

/// One element of a user's ownership list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserUrl {
    pub short_id: String,
    pub url: String,
}

/// Whether an add stored a new mapping or hit an existing one.
///
/// `AlreadyExists` is a successful idempotent result, not an error: it
/// carries the identifier assigned by whichever caller got there first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    Created,
    AlreadyExists,
}

/// Result of a registry add: the effective identifier plus how it came to be.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddResult {
    pub short_id: String,
    pub outcome: AddOutcome,
}

/// One entry of a batch submission.
///
/// `corr_id` is the caller's correlation id, carried through untouched so
/// the response can be matched back. `short_id` is the candidate identifier
/// assigned by the service before the batch reaches the repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchRecord {
    pub corr_id: String,
    pub short_id: String,
    pub url: String,
}

/// Per-entry result of a batch add, with the same semantics as [`AddResult`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchResult {
    pub corr_id: String,
    pub short_id: String,
    pub outcome: AddOutcome,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_creation() {
        let record = Record::new("user-1", "https://example.com");
        assert_eq!(record.uid, "user-1");
        assert_eq!(record.url, "https://example.com");
    }

    #[test]
    fn test_anonymous_record_has_empty_uid() {
        let record = Record::new("", "https://example.com");
        assert!(record.uid.is_empty());
    }

    #[test]
    fn test_urls_compare_byte_exact() {
        // No normalization: scheme case, trailing slash and host case all differ.
        let a = Record::new("u", "https://example.com");
        let b = Record::new("u", "https://EXAMPLE.com");
        let c = Record::new("u", "https://example.com/");
        assert_ne!(a.url, b.url);
        assert_ne!(a.url, c.url);
    }

    #[test]
    fn test_stored_link_roundtrips_through_json() {
        let link = StoredLink {
            short_id: "AbCdEfGh".to_string(),
            url: "https://example.com".to_string(),
            uid: "user-1".to_string(),
            deleted: false,
        };

        let encoded = serde_json::to_string(&link).unwrap();
        let decoded: StoredLink = serde_json::from_str(&encoded).unwrap();
        assert_eq!(link, decoded);
    }
}
