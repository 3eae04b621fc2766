/// HTTP handlers for media feed endpoints
///
/// - Posts: upload, feed, single post (counts a view), like, comment
/// - Media: raw payload streaming
pub mod media;
pub mod posts;

use actix_web::HttpResponse;

pub use media::serve_media;
pub use posts::{comment_post, get_feed, get_post, like_post, upload_post};

pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "ok",
        "service": "media-feed-service",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
