/// Error types for Board Service
///
/// Failures are logged and reported to the browser as a short plain-text
/// message with no internal detail.
use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use std::fmt;

use crate::db::RepositoryError;

/// Result type for board-service operations
pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Debug)]
pub enum AppError {
    /// Inserting a post failed; the transaction was rolled back
    CreatePost(String),

    /// Reading the post list failed
    LoadPosts(String),

    /// Template rendering failed
    Render(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::CreatePost(msg) => write!(f, "Error saving post: {}", msg),
            AppError::LoadPosts(msg) => write!(f, "Error loading posts: {}", msg),
            AppError::Render(msg) => write!(f, "Error rendering page: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

impl AppError {
    pub fn create_post(err: RepositoryError) -> Self {
        AppError::CreatePost(err.to_string())
    }

    pub fn load_posts(err: RepositoryError) -> Self {
        AppError::LoadPosts(err.to_string())
    }

    fn public_message(&self) -> &'static str {
        match self {
            AppError::CreatePost(_) => "There was an issue creating your post.",
            AppError::LoadPosts(_) | AppError::Render(_) => "There was an issue loading posts.",
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        StatusCode::INTERNAL_SERVER_ERROR
    }

    fn error_response(&self) -> HttpResponse {
        tracing::error!("{}", self);
        HttpResponse::build(self.status_code())
            .content_type("text/plain; charset=utf-8")
            .body(self.public_message())
    }
}
