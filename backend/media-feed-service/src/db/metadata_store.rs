/// JSON file backed metadata store
use async_trait::async_trait;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tokio::fs;

use super::{MetadataStore, StoreResult};
use crate::models::PostRecord;

#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    /// Open the store at `path`, creating parent directories and an empty
    /// `[]` file when nothing exists yet.
    pub async fn open(path: impl Into<PathBuf>) -> StoreResult<Self> {
        let path = path.into();

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await?;
        }

        if fs::metadata(&path).await.is_err() {
            tracing::info!(path = %path.display(), "creating empty metadata file");
            fs::write(&path, b"[]").await?;
        }

        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

#[async_trait]
impl MetadataStore for JsonFileStore {
    async fn load(&self) -> StoreResult<Vec<PostRecord>> {
        let raw = match fs::read(&self.path).await {
            Ok(raw) => raw,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(err.into()),
        };

        if raw.iter().all(u8::is_ascii_whitespace) {
            return Ok(Vec::new());
        }

        Ok(serde_json::from_slice(&raw)?)
    }

    async fn save(&self, records: &[PostRecord]) -> StoreResult<()> {
        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
        records.serialize(&mut serializer)?;

        // Write aside and rename so readers never observe a partial file.
        let tmp = self.temp_path();
        fs::write(&tmp, &buf).await?;
        fs::rename(&tmp, &self.path).await?;

        tracing::debug!(path = %self.path.display(), count = records.len(), "metadata saved");
        Ok(())
    }
}
