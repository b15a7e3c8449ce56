//! In-memory storage backend.

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::domain::entities::{
    AddOutcome, AddResult, BatchRecord, BatchResult, DeleteIntent, Record, StoredLink, UserUrl,
};
use crate::domain::repositories::{DeleteRepository, LinkRepository};
use crate::error::AppError;

/// The registry's maps, guarded as one unit.
///
/// `by_url` holds live (non-deleted) URLs only, so a lookup answers "is this
/// URL currently registered" in one step and a soft-deleted URL can be
/// re-registered under a fresh identifier. `by_user` is append-only per UID.
/// All three maps sit behind a single lock: a reader must never observe a
/// user-list entry without its resolvable stored link, or vice versa.
#[derive(Default)]
struct Index {
    by_id: HashMap<String, StoredLink>,
    by_url: HashMap<String, String>,
    by_user: HashMap<String, Vec<UserUrl>>,
}

impl Index {
    fn add(&mut self, short_id: &str, record: &Record) -> AddResult {
        if let Some(existing) = self.by_url.get(&record.url) {
            return AddResult {
                short_id: existing.clone(),
                outcome: AddOutcome::AlreadyExists,
            };
        }

        self.by_id.insert(
            short_id.to_owned(),
            StoredLink {
                short_id: short_id.to_owned(),
                url: record.url.clone(),
                uid: record.uid.clone(),
                deleted: false,
            },
        );
        self.by_url.insert(record.url.clone(), short_id.to_owned());
        self.by_user
            .entry(record.uid.clone())
            .or_default()
            .push(UserUrl {
                short_id: short_id.to_owned(),
                url: record.url.clone(),
            });

        AddResult {
            short_id: short_id.to_owned(),
            outcome: AddOutcome::Created,
        }
    }

    fn soft_delete(&mut self, intent: &DeleteIntent) {
        let Some(link) = self.by_id.get_mut(&intent.short_id) else {
            return;
        };
        if link.deleted || link.uid != intent.uid {
            return;
        }

        link.deleted = true;
        if self
            .by_url
            .get(&link.url)
            .is_some_and(|id| id == &intent.short_id)
        {
            self.by_url.remove(&link.url);
        }
    }
}

/// Process-local backend; the reference implementation of the registry
/// semantics. Mutations take one exclusive lock with short critical
/// sections, never held across an await point.
#[derive(Default)]
pub struct MemoryRepository {
    index: Mutex<Index>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// The identifier currently assigned to a live URL, if any.
    ///
    /// Used by the file backend to decide whether a journal entry is needed
    /// before it delegates the insert.
    pub(crate) fn live_short_id(&self, url: &str) -> Option<String> {
        self.index.lock().by_url.get(url).cloned()
    }
}

#[async_trait]
impl LinkRepository for MemoryRepository {
    async fn add(&self, short_id: &str, record: &Record) -> Result<AddResult, AppError> {
        Ok(self.index.lock().add(short_id, record))
    }

    async fn get(&self, short_id: &str) -> Result<Option<StoredLink>, AppError> {
        Ok(self.index.lock().by_id.get(short_id).cloned())
    }

    async fn add_batch(
        &self,
        uid: &str,
        records: Vec<BatchRecord>,
    ) -> Result<Vec<BatchResult>, AppError> {
        let mut index = self.index.lock();
        Ok(records
            .into_iter()
            .map(|r| {
                let added = index.add(&r.short_id, &Record::new(uid, r.url.as_str()));
                BatchResult {
                    corr_id: r.corr_id,
                    short_id: added.short_id,
                    outcome: added.outcome,
                }
            })
            .collect())
    }

    async fn user_urls(&self, uid: &str) -> Result<Vec<UserUrl>, AppError> {
        Ok(self
            .index
            .lock()
            .by_user
            .get(uid)
            .cloned()
            .unwrap_or_default())
    }

    async fn ping(&self) -> Result<(), AppError> {
        Ok(())
    }
}

#[async_trait]
impl DeleteRepository for MemoryRepository {
    async fn soft_delete(&self, batch: &[DeleteIntent]) -> Result<(), AppError> {
        let mut index = self.index.lock();
        for intent in batch {
            index.soft_delete(intent);
        }
        Ok(())
    }
}
