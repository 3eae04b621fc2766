/// Post handlers - HTTP endpoints for upload, feed, views, likes and comments
use actix_multipart::{Field, Multipart};
use actix_web::{web, HttpMessage, HttpRequest, HttpResponse};
use futures_util::StreamExt;

use crate::error::{AppError, Result, NO_FILE_PART};
use crate::models::{CommentRequest, MessageResponse, UploadForm, UploadResponse};
use crate::services::FeedService;

const MAX_TEXT_FIELD_BYTES: usize = 64 * 1024;

/// Upload a video/audio file with optional author and caption
/// POST /api/post
pub async fn upload_post(
    req: HttpRequest,
    service: web::Data<FeedService>,
    mut payload: Multipart,
) -> Result<HttpResponse> {
    // Anything but a multipart form cannot carry a file part.
    let is_multipart = matches!(
        req.mime_type(),
        Ok(Some(ct)) if ct.type_() == mime::MULTIPART && ct.subtype() == mime::FORM_DATA
    );
    if !is_multipart {
        return Err(AppError::MissingFile(NO_FILE_PART));
    }

    let form = read_upload_form(&mut payload, service.max_upload_bytes()).await?;
    let id = service.create_post(form).await?;

    Ok(HttpResponse::Ok().json(UploadResponse {
        message: "Upload successful!".to_string(),
        id,
    }))
}

/// Entire feed, newest first
/// GET /api/feed
pub async fn get_feed(service: web::Data<FeedService>) -> Result<HttpResponse> {
    let posts = service.feed().await?;
    Ok(HttpResponse::Ok().json(posts))
}

/// Single post; every fetch counts as one view
/// GET /api/post/{post_id}
pub async fn get_post(
    service: web::Data<FeedService>,
    post_id: web::Path<String>,
) -> Result<HttpResponse> {
    let post = service.view_post(&post_id).await?;
    Ok(HttpResponse::Ok().json(post))
}

/// POST /api/like/{post_id}
pub async fn like_post(
    service: web::Data<FeedService>,
    post_id: web::Path<String>,
) -> Result<HttpResponse> {
    let post = service.like_post(&post_id).await?;
    tracing::debug!(post_id = %post.id, likes = post.likes, "like registered");

    Ok(HttpResponse::Ok().json(MessageResponse {
        message: "Like registered successfully.".to_string(),
    }))
}

/// POST /api/comment/{post_id}
pub async fn comment_post(
    service: web::Data<FeedService>,
    post_id: web::Path<String>,
    req: web::Json<CommentRequest>,
) -> Result<HttpResponse> {
    service.add_comment(&post_id, req.into_inner()).await?;

    Ok(HttpResponse::Ok().json(MessageResponse {
        message: "Comment added successfully.".to_string(),
    }))
}

/// Collect the `file`, `author` and `caption` parts. A `file` part only
/// counts when its content disposition carries a filename parameter.
async fn read_upload_form(payload: &mut Multipart, max_file_bytes: usize) -> Result<UploadForm> {
    let mut form = UploadForm::default();

    while let Some(item) = payload.next().await {
        let mut field = item.map_err(malformed)?;
        let name = field.name().unwrap_or_default().to_string();
        let filename = field
            .content_disposition()
            .and_then(|cd| cd.get_filename())
            .map(str::to_string);

        match (name.as_str(), filename) {
            ("file", Some(filename)) if form.filename.is_none() => {
                form.data = read_bytes(&mut field, max_file_bytes)
                    .await?
                    .ok_or(AppError::PayloadTooLarge)?;
                form.filename = Some(filename);
            }
            ("author", None) => form.author = Some(read_text(&mut field).await?),
            ("caption", None) => form.caption = Some(read_text(&mut field).await?),
            _ => drain(&mut field).await?,
        }
    }

    Ok(form)
}

/// `Ok(None)` once the field grows past `limit`.
async fn read_bytes(field: &mut Field, limit: usize) -> Result<Option<Vec<u8>>> {
    let mut data = Vec::new();
    while let Some(chunk) = field.next().await {
        let chunk = chunk.map_err(malformed)?;
        if data.len() + chunk.len() > limit {
            return Ok(None);
        }
        data.extend_from_slice(&chunk);
    }
    Ok(Some(data))
}

async fn read_text(field: &mut Field) -> Result<String> {
    let data = read_bytes(field, MAX_TEXT_FIELD_BYTES)
        .await?
        .ok_or_else(|| AppError::BadRequest("Form field too large.".to_string()))?;
    String::from_utf8(data)
        .map_err(|_| AppError::BadRequest("Form field is not valid UTF-8.".to_string()))
}

async fn drain(field: &mut Field) -> Result<()> {
    while let Some(chunk) = field.next().await {
        chunk.map_err(malformed)?;
    }
    Ok(())
}

fn malformed(err: actix_multipart::MultipartError) -> AppError {
    tracing::debug!("rejecting multipart body: {}", err);
    AppError::BadRequest("Malformed multipart request.".to_string())
}
