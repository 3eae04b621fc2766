/// In-process metadata store
use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{MetadataStore, StoreResult};
use crate::models::PostRecord;

#[derive(Debug, Default)]
pub struct InMemoryStore {
    records: RwLock<Vec<PostRecord>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_records(records: Vec<PostRecord>) -> Self {
        Self {
            records: RwLock::new(records),
        }
    }
}

#[async_trait]
impl MetadataStore for InMemoryStore {
    async fn load(&self) -> StoreResult<Vec<PostRecord>> {
        Ok(self.records.read().await.clone())
    }

    async fn save(&self, records: &[PostRecord]) -> StoreResult<()> {
        *self.records.write().await = records.to_vec();
        Ok(())
    }
}
