//! PostgreSQL storage backend.
//!
//! Schema: `records` rows are never deleted, only flagged; a partial unique
//! index on live URLs (`migrations/0001_init.sql`) enforces at most one
//! non-deleted record per URL and lets a soft-deleted URL be re-registered.
//! `users` rows bind a record to the UID that created it.

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, Transaction};

use crate::domain::entities::{
    AddOutcome, AddResult, BatchRecord, BatchResult, DeleteIntent, Record, StoredLink, UserUrl,
};
use crate::domain::repositories::{DeleteRepository, LinkRepository};
use crate::error::AppError;

/// PostgreSQL repository over a shared connection pool.
pub struct PostgresRepository {
    pool: PgPool,
}

impl PostgresRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Insert-or-return-existing under one transaction.
///
/// The `ON CONFLICT ... DO NOTHING` targets the partial live-URL index, so a
/// concurrent writer of the same URL either lands the insert or reads the
/// winner's identifier afterwards.
async fn add_in_tx(
    tx: &mut Transaction<'_, Postgres>,
    short_id: &str,
    url: &str,
    uid: &str,
) -> Result<AddResult, AppError> {
    let inserted: Option<(i64,)> = sqlx::query_as(
        "INSERT INTO records (url, short_id) VALUES ($1, $2)
         ON CONFLICT (url) WHERE NOT is_deleted DO NOTHING
         RETURNING id",
    )
    .bind(url)
    .bind(short_id)
    .fetch_optional(&mut **tx)
    .await?;

    match inserted {
        Some((record_id,)) => {
            sqlx::query("INSERT INTO users (uid, record_id) VALUES ($1, $2)")
                .bind(uid)
                .bind(record_id)
                .execute(&mut **tx)
                .await?;

            Ok(AddResult {
                short_id: short_id.to_owned(),
                outcome: AddOutcome::Created,
            })
        }
        None => {
            let (existing,): (String,) =
                sqlx::query_as("SELECT short_id FROM records WHERE url = $1 AND NOT is_deleted")
                    .bind(url)
                    .fetch_one(&mut **tx)
                    .await?;

            Ok(AddResult {
                short_id: existing,
                outcome: AddOutcome::AlreadyExists,
            })
        }
    }
}

#[async_trait]
impl LinkRepository for PostgresRepository {
    async fn add(&self, short_id: &str, record: &Record) -> Result<AddResult, AppError> {
        let mut tx = self.pool.begin().await?;
        let result = add_in_tx(&mut tx, short_id, &record.url, &record.uid).await?;
        tx.commit().await?;
        Ok(result)
    }

    async fn get(&self, short_id: &str) -> Result<Option<StoredLink>, AppError> {
        let row: Option<(String, Option<String>, bool)> = sqlx::query_as(
            "SELECT r.url, u.uid, r.is_deleted
             FROM records r
             LEFT JOIN users u ON u.record_id = r.id
             WHERE r.short_id = $1
             ORDER BY r.id DESC
             LIMIT 1",
        )
        .bind(short_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|(url, uid, is_deleted)| StoredLink {
            short_id: short_id.to_owned(),
            url,
            uid: uid.unwrap_or_default(),
            deleted: is_deleted,
        }))
    }

    async fn add_batch(
        &self,
        uid: &str,
        records: Vec<BatchRecord>,
    ) -> Result<Vec<BatchResult>, AppError> {
        let mut tx = self.pool.begin().await?;
        let mut results = Vec::with_capacity(records.len());

        for r in records {
            let added = add_in_tx(&mut tx, &r.short_id, &r.url, uid).await?;
            results.push(BatchResult {
                corr_id: r.corr_id,
                short_id: added.short_id,
                outcome: added.outcome,
            });
        }

        tx.commit().await?;
        Ok(results)
    }

    async fn user_urls(&self, uid: &str) -> Result<Vec<UserUrl>, AppError> {
        let rows: Vec<(String, String)> = sqlx::query_as(
            "SELECT r.short_id, r.url
             FROM records r
             JOIN users u ON u.record_id = r.id
             WHERE u.uid = $1
             ORDER BY r.id",
        )
        .bind(uid)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|(short_id, url)| UserUrl { short_id, url })
            .collect())
    }

    async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

#[async_trait]
impl DeleteRepository for PostgresRepository {
    async fn soft_delete(&self, batch: &[DeleteIntent]) -> Result<(), AppError> {
        if batch.is_empty() {
            return Ok(());
        }

        let uids: Vec<String> = batch.iter().map(|i| i.uid.clone()).collect();
        let short_ids: Vec<String> = batch.iter().map(|i| i.short_id.clone()).collect();

        // unnest of two equal-length arrays zips them, so ownership is
        // checked pairwise: an intent only matches the record whose stored
        // UID equals the intent's UID. Everything else is skipped.
        sqlx::query(
            "UPDATE records SET is_deleted = TRUE
             FROM (
                 SELECT r.id
                 FROM records r
                 JOIN users u ON u.record_id = r.id
                 JOIN (
                     SELECT unnest($1::text[]) AS uid, unnest($2::text[]) AS short_id
                 ) AS intents
                   ON intents.uid = u.uid AND intents.short_id = r.short_id
             ) AS matched
             WHERE records.id = matched.id",
        )
        .bind(&uids)
        .bind(&short_ids)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
