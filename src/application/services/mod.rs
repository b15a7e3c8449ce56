//! Service implementations for the application layer.

pub mod deletion_pipeline;
pub mod shortener_service;

pub use deletion_pipeline::{DeletionPipeline, PipelineConfig, PipelineHandle};
pub use shortener_service::{BatchItem, BatchShortened, Shortened, ShortenerService, UrlPair};
