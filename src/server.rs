//! HTTP server initialization and runtime setup.
//!
//! Selects the storage backend, spawns the deletion pipeline, and runs the
//! Axum server. On shutdown the server stops accepting requests first, then
//! the pipeline drains; a permanently failing backend blocks the drain
//! forever (documented behavior of the pipeline).

use std::sync::Arc;

use anyhow::Result;
use axum::ServiceExt;
use axum::extract::Request;
use sqlx::PgPool;
use tokio::net::TcpListener;

use crate::api::middleware::auth::UidSigner;
use crate::application::services::{DeletionPipeline, PipelineConfig, ShortenerService};
use crate::config::{Config, DEFAULT_SECRET_KEY};
use crate::domain::repositories::{DeleteRepository, LinkRepository};
use crate::infrastructure::persistence::{FileRepository, MemoryRepository, PostgresRepository};
use crate::routes::app_router;
use crate::state::AppState;
use crate::utils::RandomIdGenerator;

/// Runs the service with the given configuration.
///
/// # Errors
///
/// Returns an error if the backend cannot be opened, the bind fails, or the
/// server runtime errors out.
pub async fn run(config: Config) -> Result<()> {
    if config.secret_key == DEFAULT_SECRET_KEY {
        tracing::warn!("SECRET_KEY not set, UID cookies are signed with the insecure default");
    }

    let (links, deletes) = build_backend(&config).await?;

    let shortener = Arc::new(ShortenerService::new(
        links,
        Arc::new(RandomIdGenerator::new()),
        config.base_url.clone(),
        config.short_id_length,
    ));

    let pipeline = DeletionPipeline::spawn(
        deletes,
        PipelineConfig {
            batch_size: config.delete_batch_size,
            flush_interval: config.delete_flush_interval,
            retry_backoff: config.delete_retry_backoff,
        },
    );
    tracing::info!("Deletion pipeline started");

    let state = AppState::new(
        shortener,
        pipeline.handle(),
        UidSigner::new(&config.secret_key),
    );
    let app = app_router(state);

    let listener = TcpListener::bind(&config.listen_addr).await?;
    tracing::info!("Listening on http://{}", listener.local_addr()?);

    axum::serve(listener, ServiceExt::<Request>::into_make_service(app))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Draining deletion pipeline");
    pipeline.shutdown().await;
    tracing::info!("Shutdown complete");

    Ok(())
}

async fn build_backend(
    config: &Config,
) -> Result<(Arc<dyn LinkRepository>, Arc<dyn DeleteRepository>)> {
    if let Some(dsn) = &config.database_url {
        let pool = PgPool::connect(dsn).await?;
        tracing::info!("Connected to database");

        sqlx::migrate!("./migrations").run(&pool).await?;

        let repo = Arc::new(PostgresRepository::new(pool));
        tracing::info!("Storage backend: postgres");
        let links: Arc<dyn LinkRepository> = repo.clone();
        let deletes: Arc<dyn DeleteRepository> = repo;
        Ok((links, deletes))
    } else if let Some(path) = &config.file_storage_path {
        let repo = Arc::new(FileRepository::open(path).await?);
        tracing::info!(path = %path, "Storage backend: file journal");
        let links: Arc<dyn LinkRepository> = repo.clone();
        let deletes: Arc<dyn DeleteRepository> = repo;
        Ok((links, deletes))
    } else {
        let repo = Arc::new(MemoryRepository::new());
        tracing::info!("Storage backend: in-memory");
        let links: Arc<dyn LinkRepository> = repo.clone();
        let deletes: Arc<dyn DeleteRepository> = repo;
        Ok((links, deletes))
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
    }
}
