//! File-journal storage backend.
//!
//! Wraps the in-memory index and appends one JSON line per mutation to a
//! journal file. Opening the backend replays the journal in order, so the
//! index (including soft-delete flags and per-user lists) survives restarts.

use std::io::ErrorKind;
use std::path::Path;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tokio::fs::{File, OpenOptions};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, BufWriter};
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::domain::entities::{
    AddOutcome, AddResult, BatchRecord, BatchResult, DeleteIntent, Record, StoredLink, UserUrl,
};
use crate::domain::repositories::{DeleteRepository, LinkRepository};
use crate::error::AppError;
use crate::infrastructure::persistence::MemoryRepository;

/// One journal line.
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
enum JournalRecord {
    Link {
        uuid: String,
        short_id: String,
        url: String,
        uid: String,
    },
    Delete {
        uid: String,
        short_id: String,
    },
}

impl JournalRecord {
    fn link(short_id: &str, record: &Record) -> Self {
        Self::Link {
            uuid: Uuid::new_v4().to_string(),
            short_id: short_id.to_owned(),
            url: record.url.clone(),
            uid: record.uid.clone(),
        }
    }

    fn delete(intent: &DeleteIntent) -> Self {
        Self::Delete {
            uid: intent.uid.clone(),
            short_id: intent.short_id.clone(),
        }
    }
}

struct Journal {
    writer: BufWriter<File>,
}

impl Journal {
    async fn append(&mut self, record: &JournalRecord) -> Result<(), AppError> {
        let mut line = serde_json::to_vec(record)
            .map_err(|e| AppError::internal("Journal encode failed", json!({ "error": e.to_string() })))?;
        line.push(b'\n');

        self.writer.write_all(&line).await.map_err(io_error)?;
        self.writer.flush().await.map_err(io_error)
    }
}

fn io_error(e: std::io::Error) -> AppError {
    AppError::internal("Journal I/O failed", json!({ "error": e.to_string() }))
}

/// Journal-backed storage backend.
///
/// Reads go straight to the in-memory index. Mutations take the journal
/// lock, decide, write the journal line, then apply to the index, so a
/// record that made it to disk is exactly a record that made it to memory.
pub struct FileRepository {
    memory: MemoryRepository,
    journal: Mutex<Journal>,
}

impl FileRepository {
    /// Opens the journal at `path`, replaying any existing content.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] when the file cannot be read, created,
    /// or contains an undecodable line.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, AppError> {
        let path = path.as_ref();
        let memory = MemoryRepository::new();

        match File::open(path).await {
            Ok(file) => {
                let mut lines = BufReader::new(file).lines();
                while let Some(line) = lines.next_line().await.map_err(io_error)? {
                    if line.trim().is_empty() {
                        continue;
                    }
                    let record: JournalRecord = serde_json::from_str(&line).map_err(|e| {
                        AppError::internal(
                            "Journal decode failed",
                            json!({ "error": e.to_string() }),
                        )
                    })?;
                    match record {
                        JournalRecord::Link {
                            short_id, url, uid, ..
                        } => {
                            let _ = memory.add(&short_id, &Record::new(uid, url)).await;
                        }
                        JournalRecord::Delete { uid, short_id } => {
                            memory
                                .soft_delete(&[DeleteIntent::new(uid, short_id)])
                                .await?;
                        }
                    }
                }
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => return Err(io_error(e)),
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .await
            .map_err(io_error)?;

        Ok(Self {
            memory,
            journal: Mutex::new(Journal {
                writer: BufWriter::new(file),
            }),
        })
    }
}

#[async_trait]
impl LinkRepository for FileRepository {
    async fn add(&self, short_id: &str, record: &Record) -> Result<AddResult, AppError> {
        let mut journal = self.journal.lock().await;

        if let Some(existing) = self.memory.live_short_id(&record.url) {
            return Ok(AddResult {
                short_id: existing,
                outcome: AddOutcome::AlreadyExists,
            });
        }

        journal.append(&JournalRecord::link(short_id, record)).await?;
        self.memory.add(short_id, record).await
    }

    async fn get(&self, short_id: &str) -> Result<Option<StoredLink>, AppError> {
        self.memory.get(short_id).await
    }

    async fn add_batch(
        &self,
        uid: &str,
        records: Vec<BatchRecord>,
    ) -> Result<Vec<BatchResult>, AppError> {
        let mut journal = self.journal.lock().await;
        let mut results = Vec::with_capacity(records.len());

        for r in records {
            let record = Record::new(uid, r.url.as_str());

            if let Some(existing) = self.memory.live_short_id(&record.url) {
                results.push(BatchResult {
                    corr_id: r.corr_id,
                    short_id: existing,
                    outcome: AddOutcome::AlreadyExists,
                });
                continue;
            }

            journal
                .append(&JournalRecord::link(&r.short_id, &record))
                .await?;
            let added = self.memory.add(&r.short_id, &record).await?;
            results.push(BatchResult {
                corr_id: r.corr_id,
                short_id: added.short_id,
                outcome: added.outcome,
            });
        }

        Ok(results)
    }

    async fn user_urls(&self, uid: &str) -> Result<Vec<UserUrl>, AppError> {
        self.memory.user_urls(uid).await
    }

    async fn ping(&self) -> Result<(), AppError> {
        Ok(())
    }
}

#[async_trait]
impl DeleteRepository for FileRepository {
    async fn soft_delete(&self, batch: &[DeleteIntent]) -> Result<(), AppError> {
        let mut journal = self.journal.lock().await;

        // Every intent is journaled; replay re-applies the ownership check,
        // so non-matching intents stay no-ops after a restart too.
        for intent in batch {
            journal.append(&JournalRecord::delete(intent)).await?;
        }

        self.memory.soft_delete(batch).await
    }
}
