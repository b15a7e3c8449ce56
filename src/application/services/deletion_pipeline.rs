//! Asynchronous batched soft-delete pipeline.
//!
//! Delete requests are accepted without blocking the caller: each
//! [`PipelineHandle::process`] call spawns a producer task that pushes one
//! [`DeleteIntent`] per identifier onto a single bounded channel. One
//! consumer task accumulates intents and flushes them to the
//! [`DeleteRepository`] whenever the accumulator reaches the batch size or a
//! periodic timer fires, whichever happens first. A failed flush is retried
//! with the same batch indefinitely at a fixed backoff; each failed attempt
//! is reported once to a dedicated error-logging task. The channel's bounded
//! capacity is the back-pressure mechanism: while a flush is stuck in retry,
//! producers block on send once the capacity is exhausted.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_retry::Retry;
use tokio_retry::strategy::FixedInterval;

use crate::domain::entities::DeleteIntent;
use crate::domain::repositories::DeleteRepository;
use crate::error::AppError;

/// Tuning knobs for the pipeline.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Accumulator flush threshold, and also the intent channel capacity.
    pub batch_size: usize,
    /// Period of the timer flush.
    pub flush_interval: Duration,
    /// Fixed pause between retries of a failed flush.
    pub retry_backoff: Duration,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            batch_size: 10,
            flush_interval: Duration::from_secs(1),
            retry_backoff: Duration::from_secs(5),
        }
    }
}

/// The running pipeline: consumer + error logger plus the only long-lived
/// strong sender for the intent channel.
///
/// Constructed once at startup and owned by the server runtime; request
/// handlers get a cheap [`PipelineHandle`] instead.
pub struct DeletionPipeline {
    intent_tx: mpsc::Sender<DeleteIntent>,
    consumer: JoinHandle<()>,
    logger: JoinHandle<()>,
}

/// Cloneable front for submitting delete requests.
///
/// Holds a weak sender: once the pipeline has shut down, `process` becomes a
/// logged no-op instead of keeping the channel alive.
#[derive(Clone)]
pub struct PipelineHandle {
    intent_tx: mpsc::WeakSender<DeleteIntent>,
}

impl DeletionPipeline {
    /// Starts the consumer and error-logger tasks.
    pub fn spawn(repository: Arc<dyn DeleteRepository>, config: PipelineConfig) -> Self {
        let (intent_tx, intent_rx) = mpsc::channel(config.batch_size);
        let (error_tx, error_rx) = mpsc::channel(config.batch_size);

        let consumer = tokio::spawn(consume(intent_rx, error_tx, repository, config));
        let logger = tokio::spawn(log_errors(error_rx));

        Self {
            intent_tx,
            consumer,
            logger,
        }
    }

    /// Returns a handle for request handlers.
    pub fn handle(&self) -> PipelineHandle {
        PipelineHandle {
            intent_tx: self.intent_tx.downgrade(),
        }
    }

    /// Drains and stops the pipeline.
    ///
    /// Dropping the pipeline's sender lets in-flight producer tasks finish
    /// enqueueing; when the last of them drops its clone the channel closes,
    /// the consumer performs one final flush of whatever is accumulated
    /// (retrying indefinitely, like any other flush) and the error logger
    /// drains and exits.
    ///
    /// There is deliberately no timeout: a permanently failing backend makes
    /// this call block forever.
    pub async fn shutdown(self) {
        drop(self.intent_tx);
        let _ = self.consumer.await;
        let _ = self.logger.await;
    }
}

impl PipelineHandle {
    /// Queues the user's identifiers for deletion and returns immediately.
    ///
    /// Fire-and-forget: the caller never learns whether or when the deletion
    /// is persisted, and unauthorized or unknown identifiers are dropped by
    /// the backend without feedback. Within one call the identifiers are
    /// enqueued in slice order; ordering across concurrent calls is
    /// unspecified.
    pub fn process(&self, uid: &str, short_ids: Vec<String>) {
        let Some(intent_tx) = self.intent_tx.upgrade() else {
            tracing::warn!(
                count = short_ids.len(),
                "deletion pipeline already stopped, dropping delete intents"
            );
            return;
        };

        let uid = uid.to_owned();
        tokio::spawn(async move {
            for short_id in short_ids {
                let intent = DeleteIntent::new(uid.clone(), short_id);
                if intent_tx.send(intent).await.is_err() {
                    break;
                }
            }
        });
    }
}

async fn consume(
    mut intent_rx: mpsc::Receiver<DeleteIntent>,
    error_tx: mpsc::Sender<AppError>,
    repository: Arc<dyn DeleteRepository>,
    config: PipelineConfig,
) {
    let mut batch: Vec<DeleteIntent> = Vec::with_capacity(config.batch_size);
    let mut ticker = tokio::time::interval(config.flush_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            received = intent_rx.recv() => match received {
                Some(intent) => {
                    batch.push(intent);
                    if batch.len() == config.batch_size {
                        flush_with_retry(
                            repository.as_ref(),
                            &batch,
                            &error_tx,
                            config.retry_backoff,
                        )
                        .await;
                        batch.clear();
                    }
                }
                None => {
                    flush_with_retry(repository.as_ref(), &batch, &error_tx, config.retry_backoff)
                        .await;
                    break;
                }
            },
            _ = ticker.tick() => {
                flush_with_retry(repository.as_ref(), &batch, &error_tx, config.retry_backoff)
                    .await;
                batch.clear();
            }
        }
    }
    // error_tx drops here; the logger drains the channel and exits.
}

/// Flushes one batch, retrying the same batch forever at a fixed interval.
///
/// Each failed attempt sends exactly one notification to the error channel.
async fn flush_with_retry(
    repository: &dyn DeleteRepository,
    batch: &[DeleteIntent],
    error_tx: &mpsc::Sender<AppError>,
    backoff: Duration,
) {
    if batch.is_empty() {
        return;
    }

    // FixedInterval has no attempt cap, so this only resolves on success.
    let strategy = FixedInterval::new(backoff);
    let _ = Retry::spawn(strategy, || async move {
        match repository.soft_delete(batch).await {
            Ok(()) => Ok(()),
            Err(err) => {
                let _ = error_tx.send(err).await;
                Err(())
            }
        }
    })
    .await;
}

async fn log_errors(mut error_rx: mpsc::Receiver<AppError>) {
    while let Some(err) = error_rx.recv().await {
        tracing::error!(error = %err, "failed to persist delete batch");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repositories::MockDeleteRepository;

    #[tokio::test]
    async fn test_process_after_shutdown_is_a_noop() {
        let repo = MockDeleteRepository::new();

        let pipeline = DeletionPipeline::spawn(Arc::new(repo), PipelineConfig::default());
        let handle = pipeline.handle();
        pipeline.shutdown().await;

        // No panic, nothing queued; the mock would fail on an unexpected call.
        handle.process("user-1", vec!["AbCdEfGh".to_string()]);
        tokio::task::yield_now().await;
    }

    #[tokio::test]
    async fn test_shutdown_with_empty_queue_completes() {
        let repo = MockDeleteRepository::new();

        let pipeline = DeletionPipeline::spawn(Arc::new(repo), PipelineConfig::default());
        pipeline.shutdown().await;
    }

    #[test]
    fn test_default_config() {
        let config = PipelineConfig::default();
        assert_eq!(config.batch_size, 10);
        assert_eq!(config.flush_interval, Duration::from_secs(1));
        assert_eq!(config.retry_backoff, Duration::from_secs(5));
    }
}
