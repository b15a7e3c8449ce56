//! Link shortening and resolution service.

use std::sync::Arc;

use serde_json::json;

use crate::domain::entities::{AddOutcome, BatchRecord, Record};
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;
use crate::utils::IdGenerator;

/// A shortening result: the externally visible URL plus how it came to be.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shortened {
    pub short_url: String,
    pub outcome: AddOutcome,
}

/// One entry of a batch submission, as handed in by the boundary layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchItem {
    pub corr_id: String,
    pub url: String,
}

/// Per-entry batch result with the composed short URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchShortened {
    pub corr_id: String,
    pub short_url: String,
    pub outcome: AddOutcome,
}

/// One entry of a user's listing: the original URL and its short form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlPair {
    pub original_url: String,
    pub short_url: String,
}

/// Service for creating and resolving shortened links.
///
/// Orchestrates the identifier generator and the registry, and composes the
/// externally visible short URL from the configured base URL. Candidate
/// identifiers are generated blindly; when the registry reports the URL as
/// already present, the candidate is discarded in favor of the identifier
/// assigned to the first writer.
pub struct ShortenerService {
    repository: Arc<dyn LinkRepository>,
    generator: Arc<dyn IdGenerator>,
    base_url: String,
    id_length: usize,
}

impl ShortenerService {
    /// Creates a new shortener service.
    pub fn new(
        repository: Arc<dyn LinkRepository>,
        generator: Arc<dyn IdGenerator>,
        base_url: impl Into<String>,
        id_length: usize,
    ) -> Self {
        Self {
            repository,
            generator,
            base_url: base_url.into(),
            id_length,
        }
    }

    /// Shortens one URL.
    ///
    /// [`AddOutcome::AlreadyExists`] is a successful idempotent result, not
    /// an error: the returned short URL then carries the previously assigned
    /// identifier, and the boundary layer translates the outcome to a status
    /// code (201 vs 409).
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] when the URL is empty and
    /// [`AppError::Internal`] on backend failure.
    pub async fn add(&self, record: Record) -> Result<Shortened, AppError> {
        if record.url.is_empty() {
            return Err(AppError::bad_request("URL must not be empty", json!({})));
        }

        let candidate = self.generator.generate(self.id_length);
        let result = self.repository.add(&candidate, &record).await?;

        Ok(Shortened {
            short_url: self.short_url(&result.short_id),
            outcome: result.outcome,
        })
    }

    /// Resolves a short identifier to its original URL.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] when the identifier was never issued
    /// and [`AppError::Gone`] when it was issued and later soft-deleted. The
    /// two must stay distinguishable for the boundary layer (404 vs 410).
    pub async fn get(&self, short_id: &str) -> Result<String, AppError> {
        let link = self
            .repository
            .get(short_id)
            .await?
            .ok_or_else(|| {
                AppError::not_found("Short link not found", json!({ "short_id": short_id }))
            })?;

        if link.deleted {
            return Err(AppError::gone(
                "Short link has been removed",
                json!({ "short_id": short_id }),
            ));
        }

        Ok(link.url)
    }

    /// Shortens a batch of URLs for one user.
    ///
    /// Each entry behaves like an individual [`add`](Self::add): fresh URLs
    /// get a fresh identifier, already registered URLs come back with the
    /// pre-existing one.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] when the batch is empty or contains
    /// an empty URL, [`AppError::Internal`] on backend failure.
    pub async fn batch(
        &self,
        uid: &str,
        items: Vec<BatchItem>,
    ) -> Result<Vec<BatchShortened>, AppError> {
        if items.is_empty() {
            return Err(AppError::bad_request("Batch must not be empty", json!({})));
        }
        if items.iter().any(|item| item.url.is_empty()) {
            return Err(AppError::bad_request("URL must not be empty", json!({})));
        }

        let records = items
            .into_iter()
            .map(|item| BatchRecord {
                corr_id: item.corr_id,
                short_id: self.generator.generate(self.id_length),
                url: item.url,
            })
            .collect();

        let results = self.repository.add_batch(uid, records).await?;

        Ok(results
            .into_iter()
            .map(|r| BatchShortened {
                corr_id: r.corr_id,
                short_url: self.short_url(&r.short_id),
                outcome: r.outcome,
            })
            .collect())
    }

    /// Lists everything the user has shortened, with composed short URLs.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on backend failure.
    pub async fn user_urls(&self, uid: &str) -> Result<Vec<UrlPair>, AppError> {
        let urls = self.repository.user_urls(uid).await?;

        Ok(urls
            .into_iter()
            .map(|u| UrlPair {
                short_url: self.short_url(&u.short_id),
                original_url: u.url,
            })
            .collect())
    }

    /// Probes the storage backend.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] when the backend is unreachable.
    pub async fn ping(&self) -> Result<(), AppError> {
        self.repository.ping().await
    }

    fn short_url(&self, short_id: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), short_id)
    }
}
