//! Application configuration from environment variables and CLI flags.
//!
//! Flags take precedence over environment variables; unset values fall back
//! to defaults. A `.env` file is honored when present (loaded in `main`).
//!
//! ## Variables
//!
//! - `SERVER_ADDRESS` / `-a` - bind address (default: `0.0.0.0:8080`)
//! - `BASE_URL` / `-b` - prefix of composed short URLs
//!   (default: `http://localhost:8080`)
//! - `FILE_STORAGE_PATH` / `-f` - journal path; selects the file backend
//! - `DATABASE_DSN` / `-d` - Postgres DSN; selects the Postgres backend
//! - `SECRET_KEY` / `-k` - HMAC key for the UID cookie
//! - `SHORT_ID_LENGTH` - identifier length (default: 8)
//! - `DELETE_BATCH_SIZE` - pipeline batch size and channel capacity
//!   (default: 10)
//! - `DELETE_FLUSH_INTERVAL_MS` - pipeline timer flush period
//!   (default: 1000)
//! - `DELETE_RETRY_BACKOFF_MS` - pause between flush retries
//!   (default: 5000)
//! - `RUST_LOG` - log filter (default: `info`)
//! - `LOG_FORMAT` - `text` or `json` (default: `text`)
//!
//! Backend selection: `DATABASE_DSN` wins over `FILE_STORAGE_PATH`, which
//! wins over the in-memory default.

use std::env;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;

/// Fallback HMAC key; fine for local runs, a warning in production.
pub const DEFAULT_SECRET_KEY: &str = "insecure-dev-secret";

/// Command-line flags, mirroring the environment variables.
#[derive(Debug, Default, Parser)]
#[command(name = "microlink", about = "URL shortening service")]
pub struct Args {
    /// Bind address, <host>:<port>
    #[arg(short = 'a', long = "addr")]
    pub listen_addr: Option<String>,

    /// Base URL for composed short links
    #[arg(short = 'b', long = "base-url")]
    pub base_url: Option<String>,

    /// Journal file path (selects the file backend)
    #[arg(short = 'f', long = "file-storage")]
    pub file_storage_path: Option<String>,

    /// Postgres DSN (selects the Postgres backend)
    #[arg(short = 'd', long = "database-dsn")]
    pub database_url: Option<String>,

    /// Secret key for UID cookie signing
    #[arg(short = 'k', long = "secret-key")]
    pub secret_key: Option<String>,
}

/// Service configuration, resolved once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub listen_addr: String,
    pub base_url: String,
    pub file_storage_path: Option<String>,
    pub database_url: Option<String>,
    pub secret_key: String,
    pub short_id_length: usize,
    pub delete_batch_size: usize,
    pub delete_flush_interval: Duration,
    pub delete_retry_backoff: Duration,
    pub log_level: String,
    pub log_format: String,
}

impl Config {
    /// Resolves configuration from flags and environment.
    pub fn load(args: Args) -> Result<Self> {
        let listen_addr = args
            .listen_addr
            .or_else(|| env::var("SERVER_ADDRESS").ok())
            .unwrap_or_else(|| "0.0.0.0:8080".to_string());

        let base_url = args
            .base_url
            .or_else(|| env::var("BASE_URL").ok())
            .unwrap_or_else(|| "http://localhost:8080".to_string());

        let file_storage_path = args
            .file_storage_path
            .or_else(|| env::var("FILE_STORAGE_PATH").ok())
            .filter(|v| !v.is_empty());

        let database_url = args
            .database_url
            .or_else(|| env::var("DATABASE_DSN").ok())
            .filter(|v| !v.is_empty());

        let secret_key = args
            .secret_key
            .or_else(|| env::var("SECRET_KEY").ok())
            .unwrap_or_else(|| DEFAULT_SECRET_KEY.to_string());

        let short_id_length = env::var("SHORT_ID_LENGTH")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(8);

        let delete_batch_size = env::var("DELETE_BATCH_SIZE")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(10);

        let delete_flush_interval = Duration::from_millis(
            env::var("DELETE_FLUSH_INTERVAL_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(1000),
        );

        let delete_retry_backoff = Duration::from_millis(
            env::var("DELETE_RETRY_BACKOFF_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(5000),
        );

        let log_level = env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
        let log_format = env::var("LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

        Ok(Self {
            listen_addr,
            base_url,
            file_storage_path,
            database_url,
            secret_key,
            short_id_length,
            delete_batch_size,
            delete_flush_interval,
            delete_retry_backoff,
            log_level,
            log_format,
        })
    }
}
