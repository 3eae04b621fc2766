/// Error types for Media Feed Service
///
/// Validation failures carry the message shown to the client. Unexpected
/// failures are logged where they happen and only a generic message is
/// returned to the caller.
use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use std::fmt;

/// Result type for media-feed-service operations
pub type Result<T> = std::result::Result<T, AppError>;

pub const NO_FILE_PART: &str = "No file part in the request.";
pub const NO_SELECTED_FILE: &str = "No selected file.";
pub const INVALID_FILE_TYPE: &str = "Invalid file type. Only video/audio files are allowed.";
pub const POST_NOT_FOUND: &str = "Post not found.";
pub const MEDIA_NOT_FOUND: &str = "Media file not found.";

/// Application error types
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppError {
    /// No file part, or a file part with an empty filename
    MissingFile(&'static str),

    /// File extension outside the allowed set
    InvalidType,

    /// Malformed request body
    BadRequest(String),

    /// File part exceeds the configured limit
    PayloadTooLarge,

    /// Post or media file does not exist
    NotFound(&'static str),

    /// Generic message only, details were logged
    Internal(&'static str),
}

impl AppError {
    /// Log `err` server-side and return an [`AppError::Internal`] carrying
    /// only `public_message`.
    pub fn internal(public_message: &'static str, err: impl fmt::Display) -> Self {
        tracing::error!(error = %err, "{public_message}");
        AppError::Internal(public_message)
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::MissingFile(msg) => f.write_str(msg),
            AppError::InvalidType => f.write_str(INVALID_FILE_TYPE),
            AppError::BadRequest(msg) => f.write_str(msg),
            AppError::PayloadTooLarge => f.write_str("Upload exceeds the configured size limit."),
            AppError::NotFound(msg) => f.write_str(msg),
            AppError::Internal(msg) => f.write_str(msg),
        }
    }
}

impl std::error::Error for AppError {}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::MissingFile(_) | AppError::InvalidType | AppError::BadRequest(_) => {
                StatusCode::BAD_REQUEST
            }
            AppError::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(serde_json::json!({
            "error": self.to_string(),
        }))
    }
}
