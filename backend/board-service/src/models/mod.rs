/// Data models for board-service
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Stored board post
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Post {
    pub id: i64,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

/// Row about to be inserted; the id is assigned by the database.
#[derive(Debug, Clone)]
pub struct NewPost {
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

impl NewPost {
    /// Stamped with the current UTC time.
    pub fn new(content: impl Into<String>) -> Self {
        Self::with_timestamp(content, Utc::now())
    }

    pub fn with_timestamp(content: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        Self {
            content: content.into(),
            timestamp,
        }
    }
}

/// Submitted form. A missing `content` field counts as empty.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SubmitPostForm {
    #[serde(default)]
    pub content: String,
}

impl SubmitPostForm {
    /// Trimmed content, or `None` when nothing is left to store.
    pub fn cleaned(&self) -> Option<&str> {
        let trimmed = self.content.trim();
        (!trimmed.is_empty()).then_some(trimmed)
    }
}
