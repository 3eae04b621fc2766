/// Data models for media-feed-service
///
/// - PostRecord: one uploaded media post as persisted in the metadata file
/// - Comment: a reader comment attached to a post
/// - Request/response DTOs for the JSON endpoints
use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const DEFAULT_AUTHOR: &str = "Anonymous";
pub const DEFAULT_CAPTION: &str = "(no caption)";
pub const MAX_AUTHOR_CHARS: usize = 64;
pub const MAX_TEXT_CHARS: usize = 512;

// ========================================
// Media kind
// ========================================

/// Allowed upload extensions, lowercase.
pub const ALLOWED_EXTENSIONS: &[&str] = &["mp4", "mov", "webm", "mp3", "wav"];

const AUDIO_EXTENSIONS: &[&str] = &["mp3", "wav"];

/// Validated, lowercased extension of an uploaded file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaExtension(String);

impl MediaExtension {
    /// Extract the extension after the last `.` and check it against
    /// [`ALLOWED_EXTENSIONS`], ignoring case.
    pub fn from_filename(filename: &str) -> Option<Self> {
        let (_, ext) = filename.rsplit_once('.')?;
        let ext = ext.to_ascii_lowercase();
        ALLOWED_EXTENSIONS
            .contains(&ext.as_str())
            .then_some(Self(ext))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_audio(&self) -> bool {
        AUDIO_EXTENSIONS.contains(&self.0.as_str())
    }
}

// ========================================
// Post record
// ========================================

/// Post metadata as stored in the JSON file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostRecord {
    pub id: String,
    pub filename: String,
    pub author: String,
    pub caption: String,
    pub is_audio: bool,
    /// ISO 8601 creation time
    pub timestamp: String,
    #[serde(default)]
    pub views: u64,
    #[serde(default)]
    pub likes: u64,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub comments: Vec<Comment>,
    /// Fields this service does not interpret, kept so rewrites are lossless.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl PostRecord {
    pub fn new(
        id: String,
        filename: String,
        author: String,
        caption: String,
        extension: &MediaExtension,
    ) -> Self {
        Self {
            id,
            filename,
            author,
            caption,
            is_audio: extension.is_audio(),
            timestamp: now_iso8601(),
            views: 0,
            likes: 0,
            comments: Vec::new(),
            extra: Map::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub author: String,
    pub text: String,
    pub created_at: String,
}

// ========================================
// DTOs
// ========================================

/// Upload fields gathered from the multipart form.
#[derive(Debug, Default)]
pub struct UploadForm {
    /// `None` when the request carried no `file` part.
    pub filename: Option<String>,
    pub data: Vec<u8>,
    pub author: Option<String>,
    pub caption: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UploadResponse {
    pub message: String,
    pub id: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentRequest {
    pub author: Option<String>,
    #[serde(default)]
    pub text: String,
}

// ========================================
// Helpers
// ========================================

pub fn now_iso8601() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Cut `value` down to at most `max` characters.
pub fn truncate_chars(value: &str, max: usize) -> String {
    value.chars().take(max).collect()
}
