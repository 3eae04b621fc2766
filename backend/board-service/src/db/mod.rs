/// Database access layer
///
/// This module provides:
/// - Connection pool setup for SQLite or PostgreSQL (chosen by URL)
/// - The `PostRepository` seam used by handlers, with a SQL implementation
pub mod post_repo;

use async_trait::async_trait;
use sqlx::any::AnyPoolOptions;
use sqlx::AnyPool;
use thiserror::Error;

use crate::config::DatabaseConfig;
use crate::models::{NewPost, Post};

pub use post_repo::SqlPostRepository;

pub type RepositoryResult<T> = std::result::Result<T, RepositoryError>;

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("stored timestamp could not be parsed: {0}")]
    InvalidTimestamp(String),

    #[error("unsupported database url scheme: {0}")]
    UnsupportedDatabase(String),
}

/// Board post persistence
#[async_trait]
pub trait PostRepository: Send + Sync {
    /// Insert one row and return it with its assigned id.
    async fn insert(&self, post: NewPost) -> RepositoryResult<Post>;

    /// All posts, newest first.
    async fn list_recent(&self) -> RepositoryResult<Vec<Post>>;

    /// Cheap connectivity probe for health checks.
    async fn ping(&self) -> RepositoryResult<()>;
}

/// SQL dialect differences that matter for the `post` table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DbBackend {
    Sqlite,
    Postgres,
}

impl DbBackend {
    pub fn from_url(url: &str) -> RepositoryResult<Self> {
        let scheme = url.split(':').next().unwrap_or_default();
        match scheme {
            "sqlite" => Ok(Self::Sqlite),
            "postgres" | "postgresql" => Ok(Self::Postgres),
            other => Err(RepositoryError::UnsupportedDatabase(other.to_string())),
        }
    }
}

/// Create the connection pool.
///
/// An in-memory SQLite URL gives every connection its own database, so use
/// `max_connections = 1` with `sqlite::memory:`.
pub async fn create_pool(config: &DatabaseConfig) -> RepositoryResult<AnyPool> {
    sqlx::any::install_default_drivers();

    let pool = AnyPoolOptions::new()
        .max_connections(config.max_connections.max(1))
        .connect(&config.url)
        .await?;

    tracing::info!(max_connections = config.max_connections, "database pool ready");
    Ok(pool)
}
