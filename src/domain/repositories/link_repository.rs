//! Repository trait for the URL ⇄ short identifier registry.

use crate::domain::entities::{AddResult, BatchRecord, BatchResult, Record, StoredLink, UserUrl};
use crate::error::AppError;
use async_trait::async_trait;

/// The idempotent registry contract.
///
/// Implementations guarantee at most one non-deleted mapping per distinct
/// URL, and keep the URL index and the per-user ownership list mutually
/// consistent: a reader never observes a user-list entry without its
/// resolvable stored link, or vice versa.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::MemoryRepository`] - in-memory maps
/// - [`crate::infrastructure::persistence::FileRepository`] - journal-backed maps
/// - [`crate::infrastructure::persistence::PostgresRepository`] - PostgreSQL
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LinkRepository: Send + Sync {
    /// Stores a new mapping under the caller-proposed `short_id`, or returns
    /// the identifier already assigned to the URL.
    ///
    /// If the URL is present and not deleted, the proposed identifier is
    /// discarded and the result carries the existing one with
    /// [`AddOutcome::AlreadyExists`]. Otherwise the record is stored under
    /// `short_id`, appended to the submitter's ownership list, and the result
    /// carries [`AddOutcome::Created`]. Concurrent submissions of the same
    /// URL converge on one identifier.
    ///
    /// [`AddOutcome::AlreadyExists`]: crate::domain::entities::AddOutcome
    /// [`AddOutcome::Created`]: crate::domain::entities::AddOutcome
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on backend failure. No retry happens at
    /// this layer.
    async fn add(&self, short_id: &str, record: &Record) -> Result<AddResult, AppError>;

    /// Looks up a stored link by its short identifier.
    ///
    /// Returns `Ok(None)` when the identifier was never issued. A returned
    /// link may have `deleted` set; the caller is responsible for reporting
    /// that as "gone" rather than "not found".
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on backend failure.
    async fn get(&self, short_id: &str) -> Result<Option<StoredLink>, AppError>;

    /// Applies [`add`](Self::add) semantics to each record of a batch.
    ///
    /// The order of effects across records in one batch is unspecified, but
    /// each record's result is as if `add` were called individually in some
    /// serial order.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on backend failure.
    async fn add_batch(
        &self,
        uid: &str,
        records: Vec<BatchRecord>,
    ) -> Result<Vec<BatchResult>, AppError>;

    /// Returns a snapshot of the user's ownership list.
    ///
    /// Unknown UIDs yield an empty list, not an error. The list is
    /// append-only and includes soft-deleted entries.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on backend failure.
    async fn user_urls(&self, uid: &str) -> Result<Vec<UserUrl>, AppError>;

    /// Probes backend liveness.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] when the backend is unreachable.
    async fn ping(&self) -> Result<(), AppError>;
}
