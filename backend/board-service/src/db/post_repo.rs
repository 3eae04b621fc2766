/// Post repository - database operations for the `post` table
use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use sqlx::any::AnyRow;
use sqlx::{AnyPool, Row};

use super::{DbBackend, PostRepository, RepositoryError, RepositoryResult};
use crate::models::{NewPost, Post};

// Fixed width so text order equals time order on every engine.
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f";

const CREATE_TABLE_SQLITE: &str = r#"
CREATE TABLE IF NOT EXISTS post (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    content TEXT NOT NULL,
    timestamp TEXT NOT NULL
)
"#;

const CREATE_TABLE_POSTGRES: &str = r#"
CREATE TABLE IF NOT EXISTS post (
    id BIGSERIAL PRIMARY KEY,
    content TEXT NOT NULL,
    timestamp TEXT NOT NULL
)
"#;

#[derive(Clone)]
pub struct SqlPostRepository {
    pool: AnyPool,
    backend: DbBackend,
}

impl SqlPostRepository {
    pub fn new(pool: AnyPool, backend: DbBackend) -> Self {
        Self { pool, backend }
    }

    /// Create the `post` table if it does not exist yet.
    pub async fn ensure_schema(&self) -> RepositoryResult<()> {
        let ddl = match self.backend {
            DbBackend::Sqlite => CREATE_TABLE_SQLITE,
            DbBackend::Postgres => CREATE_TABLE_POSTGRES,
        };
        sqlx::query(ddl).execute(&self.pool).await?;
        Ok(())
    }
}

#[async_trait]
impl PostRepository for SqlPostRepository {
    async fn insert(&self, post: NewPost) -> RepositoryResult<Post> {
        let stored_timestamp = format_timestamp(&post.timestamp);

        let mut tx = self.pool.begin().await?;

        let inserted = sqlx::query_scalar::<_, i64>(
            "INSERT INTO post (content, timestamp) VALUES ($1, $2) RETURNING id",
        )
        .bind(post.content.clone())
        .bind(stored_timestamp.clone())
        .fetch_one(&mut *tx)
        .await;

        let id = match inserted {
            Ok(id) => id,
            Err(err) => {
                if let Err(rollback) = tx.rollback().await {
                    tracing::warn!("rollback after failed insert also failed: {}", rollback);
                }
                return Err(err.into());
            }
        };

        tx.commit().await?;

        Ok(Post {
            id,
            content: post.content,
            timestamp: parse_timestamp(&stored_timestamp)?,
        })
    }

    async fn list_recent(&self) -> RepositoryResult<Vec<Post>> {
        let rows = sqlx::query(
            "SELECT id, content, timestamp FROM post ORDER BY timestamp DESC, id DESC",
        )
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(post_from_row).collect()
    }

    async fn ping(&self) -> RepositoryResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

fn post_from_row(row: &AnyRow) -> RepositoryResult<Post> {
    let raw_timestamp: String = row.try_get("timestamp")?;
    Ok(Post {
        id: row.try_get("id")?,
        content: row.try_get("content")?,
        timestamp: parse_timestamp(&raw_timestamp)?,
    })
}

pub(crate) fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.format(TIMESTAMP_FORMAT).to_string()
}

pub(crate) fn parse_timestamp(raw: &str) -> RepositoryResult<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(raw, TIMESTAMP_FORMAT)
        .map(|naive| Utc.from_utc_datetime(&naive))
        .map_err(|_| RepositoryError::InvalidTimestamp(raw.to_string()))
}
