//! SQLite-backed snippet storage.

use async_trait::async_trait;
use sqlx::SqlitePool;
use time::{Duration, OffsetDateTime};

use crate::db::models::Snippet;
use crate::db::{SnippetStore, StoreError};

/// `SnippetStore` over a shared sqlx connection pool. Each query checks a
/// connection out of the pool for exactly one statement.
pub struct SqliteSnippetStore {
    pool: SqlitePool,
}

impl SqliteSnippetStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SnippetStore for SqliteSnippetStore {
    async fn insert(
        &self,
        title: &str,
        content: &str,
        expires_days: i64,
    ) -> Result<i64, StoreError> {
        let created = OffsetDateTime::now_utc();
        let expires = created + Duration::days(expires_days);

        let result = sqlx::query(
            "INSERT INTO snippets (title, content, created, expires)
             VALUES (?, ?, ?, ?)",
        )
        .bind(title)
        .bind(content)
        .bind(created)
        .bind(expires)
        .execute(&self.pool)
        .await?;

        Ok(result.last_insert_rowid())
    }

    async fn get(&self, id: i64) -> Result<Snippet, StoreError> {
        // Expiry is enforced in the query, so an expired snippet reads
        // exactly like an absent one.
        sqlx::query_as::<_, Snippet>(
            "SELECT id, title, content, created, expires FROM snippets
             WHERE expires > ? AND id = ?",
        )
        .bind(OffsetDateTime::now_utc())
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(StoreError::NoRecord)
    }

    async fn latest(&self, limit: i64) -> Result<Vec<Snippet>, StoreError> {
        let snippets = sqlx::query_as::<_, Snippet>(
            "SELECT id, title, content, created, expires FROM snippets
             WHERE expires > ? ORDER BY created DESC LIMIT ?",
        )
        .bind(OffsetDateTime::now_utc())
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(snippets)
    }
}
