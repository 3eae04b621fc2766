/// Local directory holding uploaded media payloads
use std::io;
use std::path::{Path, PathBuf};
use tokio::fs;

#[derive(Debug, Clone)]
pub struct MediaStorage {
    root: PathBuf,
}

impl MediaStorage {
    /// Use `root` as the upload directory, creating it if needed.
    pub async fn open(root: impl Into<PathBuf>) -> io::Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root).await?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Write `data` under `filename`, replacing any existing file.
    pub async fn save(&self, filename: &str, data: &[u8]) -> io::Result<PathBuf> {
        let path = self.resolve(filename).ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("unsafe media filename: {filename:?}"),
            )
        })?;
        fs::write(&path, data).await?;
        Ok(path)
    }

    pub async fn remove(&self, filename: &str) -> io::Result<()> {
        match self.resolve(filename) {
            Some(path) => fs::remove_file(path).await,
            None => Ok(()),
        }
    }

    /// Open a stored file for reading. `Ok(None)` when the name is unsafe or
    /// no such file exists.
    pub async fn open_file(&self, filename: &str) -> io::Result<Option<fs::File>> {
        let Some(path) = self.resolve(filename) else {
            return Ok(None);
        };

        match fs::metadata(&path).await {
            Ok(meta) if meta.is_file() => {}
            Ok(_) => return Ok(None),
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err),
        }

        fs::File::open(&path).await.map(Some)
    }

    /// Only names that are already sanitized map to a path inside `root`.
    fn resolve(&self, filename: &str) -> Option<PathBuf> {
        if filename.is_empty() || sanitize_filename(filename) != filename {
            return None;
        }
        Some(self.root.join(filename))
    }
}

/// Reduce `name` to a flat, portable file name.
///
/// Path separators and whitespace become `_`, anything outside
/// `[A-Za-z0-9._-]` is dropped, and leading/trailing `.` and `_` are
/// stripped, so the result can never climb out of the upload directory.
pub fn sanitize_filename(name: &str) -> String {
    let flattened = name.replace(['/', '\\'], " ");
    let joined = flattened.split_whitespace().collect::<Vec<_>>().join("_");
    let kept: String = joined
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
        .collect();
    kept.trim_matches(|c| c == '.' || c == '_').to_string()
}

/// Content type implied by the stored file's extension.
pub fn content_type_for(filename: &str) -> mime::Mime {
    mime_guess::from_path(filename).first_or_octet_stream()
}
