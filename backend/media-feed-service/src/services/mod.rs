/// Business logic layer for media-feed-service
///
/// - FeedService: upload, feed listing, view/like counters, comments
/// - MediaStorage: payload files on disk
pub mod media_storage;

pub use media_storage::{content_type_for, sanitize_filename, MediaStorage};

use chrono::Utc;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::config::StorageConfig;
use crate::db::MetadataStore;
use crate::error::{
    AppError, Result, INVALID_FILE_TYPE, NO_FILE_PART, NO_SELECTED_FILE, POST_NOT_FOUND,
};
use crate::models::{
    now_iso8601, truncate_chars, Comment, CommentRequest, MediaExtension, PostRecord, UploadForm,
    DEFAULT_AUTHOR, DEFAULT_CAPTION, MAX_AUTHOR_CHARS, MAX_TEXT_CHARS,
};

const UPLOAD_FAILED: &str = "An internal server error occurred.";
const FEED_FAILED: &str = "Could not retrieve feed data.";
const POST_FAILED: &str = "Could not retrieve post data.";
const LIKE_FAILED: &str = "An internal server error occurred during like update.";
const COMMENT_FAILED: &str = "An internal server error occurred while adding the comment.";

/// Validate the upload's file part, in order: part present, filename
/// non-empty, allowed extension.
pub fn validate_upload(form: &UploadForm) -> Result<MediaExtension> {
    let filename = form
        .filename
        .as_deref()
        .ok_or(AppError::MissingFile(NO_FILE_PART))?;

    if filename.is_empty() {
        return Err(AppError::MissingFile(NO_SELECTED_FILE));
    }

    MediaExtension::from_filename(filename).ok_or_else(|| {
        tracing::debug!(%filename, "{INVALID_FILE_TYPE}");
        AppError::InvalidType
    })
}

/// Millisecond timestamp rendered as a decimal string.
pub fn generate_post_id() -> String {
    Utc::now().timestamp_millis().to_string()
}

pub struct FeedService {
    store: Arc<dyn MetadataStore>,
    media: MediaStorage,
    max_upload_bytes: usize,
    // Serializes read-modify-write cycles on the metadata list within this
    // process. Separate processes sharing the file can still lose updates.
    write_lock: Mutex<()>,
}

impl FeedService {
    pub fn new(store: Arc<dyn MetadataStore>, media: MediaStorage) -> Self {
        Self {
            store,
            media,
            max_upload_bytes: StorageConfig::default().max_upload_bytes,
            write_lock: Mutex::new(()),
        }
    }

    pub fn with_max_upload_bytes(mut self, max_upload_bytes: usize) -> Self {
        self.max_upload_bytes = max_upload_bytes;
        self
    }

    pub fn media(&self) -> &MediaStorage {
        &self.media
    }

    pub fn max_upload_bytes(&self) -> usize {
        self.max_upload_bytes
    }

    /// Persist an uploaded file and prepend its record to the feed.
    /// Returns the new post id.
    pub async fn create_post(&self, form: UploadForm) -> Result<String> {
        let extension = validate_upload(&form)?;
        if form.data.len() > self.max_upload_bytes {
            return Err(AppError::PayloadTooLarge);
        }

        let post_id = generate_post_id();
        let filename = sanitize_filename(&format!("{}.{}", post_id, extension.as_str()));

        self.media
            .save(&filename, &form.data)
            .await
            .map_err(|e| AppError::internal(UPLOAD_FAILED, e))?;

        let author = form
            .author
            .map(|a| truncate_chars(&a, MAX_AUTHOR_CHARS))
            .unwrap_or_else(|| DEFAULT_AUTHOR.to_string());
        let caption = form
            .caption
            .map(|c| truncate_chars(&c, MAX_TEXT_CHARS))
            .unwrap_or_else(|| DEFAULT_CAPTION.to_string());

        let record = PostRecord::new(post_id.clone(), filename.clone(), author, caption, &extension);

        if let Err(err) = self.prepend(record).await {
            if let Err(cleanup) = self.media.remove(&filename).await {
                warn!(%filename, "failed to remove orphaned upload: {}", cleanup);
            }
            return Err(err);
        }

        info!(post_id = %post_id, %filename, bytes = form.data.len(), "post uploaded");
        Ok(post_id)
    }

    async fn prepend(&self, record: PostRecord) -> Result<()> {
        let _guard = self.write_lock.lock().await;

        let mut records = self
            .store
            .load()
            .await
            .map_err(|e| AppError::internal(UPLOAD_FAILED, e))?;
        records.insert(0, record);
        self.store
            .save(&records)
            .await
            .map_err(|e| AppError::internal(UPLOAD_FAILED, e))
    }

    /// Whole feed in stored order.
    pub async fn feed(&self) -> Result<Vec<PostRecord>> {
        self.store
            .load()
            .await
            .map_err(|e| AppError::internal(FEED_FAILED, e))
    }

    /// Fetch one post, counting the fetch as a view.
    pub async fn view_post(&self, post_id: &str) -> Result<PostRecord> {
        self.update_post(post_id, POST_FAILED, |post| {
            post.views = post.views.saturating_add(1);
        })
        .await
    }

    /// Unlimited likes per caller; every call adds one.
    pub async fn like_post(&self, post_id: &str) -> Result<PostRecord> {
        self.update_post(post_id, LIKE_FAILED, |post| {
            post.likes = post.likes.saturating_add(1);
        })
        .await
    }

    pub async fn add_comment(&self, post_id: &str, req: CommentRequest) -> Result<PostRecord> {
        let text = req.text.trim();
        if text.is_empty() {
            return Err(AppError::BadRequest("Missing required fields".to_string()));
        }

        let comment = Comment {
            author: req
                .author
                .map(|a| truncate_chars(a.trim(), MAX_AUTHOR_CHARS))
                .filter(|a| !a.is_empty())
                .unwrap_or_else(|| DEFAULT_AUTHOR.to_string()),
            text: truncate_chars(text, MAX_TEXT_CHARS),
            created_at: now_iso8601(),
        };

        self.update_post(post_id, COMMENT_FAILED, move |post| {
            post.comments.push(comment);
        })
        .await
    }

    async fn update_post<F>(
        &self,
        post_id: &str,
        failure_message: &'static str,
        apply: F,
    ) -> Result<PostRecord>
    where
        F: FnOnce(&mut PostRecord),
    {
        let _guard = self.write_lock.lock().await;

        let mut records = self
            .store
            .load()
            .await
            .map_err(|e| AppError::internal(failure_message, e))?;

        let post = records
            .iter_mut()
            .find(|post| post.id == post_id)
            .ok_or(AppError::NotFound(POST_NOT_FOUND))?;
        apply(post);
        let updated = post.clone();

        self.store
            .save(&records)
            .await
            .map_err(|e| AppError::internal(failure_message, e))?;

        Ok(updated)
    }
}
