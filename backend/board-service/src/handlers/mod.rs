/// HTTP handlers for the board
pub mod board;

use actix_web::{web, HttpResponse};
use std::sync::Arc;

use crate::db::PostRepository;

pub use board::{index, submit_post};

/// GET /health
pub async fn health(repo: web::Data<Arc<dyn PostRepository>>) -> HttpResponse {
    match repo.ping().await {
        Ok(()) => HttpResponse::Ok().json(serde_json::json!({
            "status": "ok",
            "service": "board-service",
            "version": env!("CARGO_PKG_VERSION"),
        })),
        Err(e) => {
            tracing::warn!("health check failed: {}", e);
            HttpResponse::ServiceUnavailable().json(serde_json::json!({
                "status": "unhealthy",
                "service": "board-service",
            }))
        }
    }
}
