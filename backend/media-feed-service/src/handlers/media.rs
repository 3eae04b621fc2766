/// Media handler - streams stored payloads
use actix_web::{web, HttpResponse};
use tokio_util::io::ReaderStream;

use crate::error::{AppError, Result, MEDIA_NOT_FOUND};
use crate::services::{content_type_for, FeedService};

/// GET /api/media/{filename}
pub async fn serve_media(
    service: web::Data<FeedService>,
    filename: web::Path<String>,
) -> Result<HttpResponse> {
    let file = service
        .media()
        .open_file(&filename)
        .await
        .map_err(|e| AppError::internal("Could not read media file.", e))?
        .ok_or(AppError::NotFound(MEDIA_NOT_FOUND))?;

    Ok(HttpResponse::Ok()
        .content_type(content_type_for(&filename))
        .streaming(ReaderStream::new(file)))
}
