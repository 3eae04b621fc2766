/// Board handlers - list and submit posts
use actix_web::{http::header, web, HttpResponse};
use std::sync::Arc;

use crate::db::PostRepository;
use crate::error::{AppError, Result};
use crate::models::{NewPost, SubmitPostForm};
use crate::render::Renderer;

/// Render every post, newest first
/// GET /
pub async fn index(
    repo: web::Data<Arc<dyn PostRepository>>,
    renderer: web::Data<Renderer>,
) -> Result<HttpResponse> {
    let posts = repo.list_recent().await.map_err(AppError::load_posts)?;
    let html = renderer.index(&posts)?;

    Ok(HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(html))
}

/// Store a post, then redirect back to the listing. Blank content is
/// dropped without an error.
/// POST /
pub async fn submit_post(
    repo: web::Data<Arc<dyn PostRepository>>,
    form: web::Form<SubmitPostForm>,
) -> Result<HttpResponse> {
    match form.cleaned() {
        Some(content) => {
            let post = repo
                .insert(NewPost::new(content))
                .await
                .map_err(AppError::create_post)?;
            tracing::info!(post_id = post.id, "board post created");
        }
        None => tracing::debug!("ignoring blank board post"),
    }

    Ok(redirect_to_index())
}

fn redirect_to_index() -> HttpResponse {
    HttpResponse::Found()
        .insert_header((header::LOCATION, "/"))
        .finish()
}
