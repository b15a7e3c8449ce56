//! Repository trait for persisting soft deletes.

use crate::domain::entities::DeleteIntent;
use crate::error::AppError;
use async_trait::async_trait;

/// Batch soft-delete contract consumed by the deletion pipeline.
///
/// One call marks every matching record in the batch as deleted. A record
/// matches only when the intent's UID equals the UID recorded for that
/// short identifier; non-matching pairs are skipped silently, never
/// reported as an error. The flag is irreversible.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DeleteRepository: Send + Sync {
    /// Marks the matching records of `batch` as deleted.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] when the backend rejects the batch as a
    /// whole. The caller (the pipeline's flush loop) retries the same batch
    /// indefinitely.
    async fn soft_delete(&self, batch: &[DeleteIntent]) -> Result<(), AppError>;
}
