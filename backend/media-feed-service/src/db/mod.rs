/// Metadata persistence layer
///
/// The whole post list is read and written as one unit. Implementations:
/// - `JsonFileStore`: pretty-printed JSON array in a single file
/// - `InMemoryStore`: process-local list, used by tests
pub mod memory_store;
pub mod metadata_store;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::PostRecord;

pub use memory_store::InMemoryStore;
pub use metadata_store::JsonFileStore;

pub type StoreResult<T> = std::result::Result<T, StoreError>;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("metadata io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("metadata file is not a valid post list: {0}")]
    Corrupt(#[from] serde_json::Error),
}

/// Ordered post list storage, most recent post first.
#[async_trait]
pub trait MetadataStore: Send + Sync {
    /// Full ordered sequence; empty when nothing has been stored yet.
    async fn load(&self) -> StoreResult<Vec<PostRecord>>;

    /// Replace the stored sequence with `records`.
    async fn save(&self, records: &[PostRecord]) -> StoreResult<()>;
}
