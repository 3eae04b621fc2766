//! Media Feed Service
//!
//! Accepts video/audio uploads, keeps post metadata in a flat JSON file and
//! serves a chronological (newest first) feed with view and like counters.

pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod models;
pub mod services;

use actix_web::web;

// Public re-exports
pub use config::Config;
pub use error::{AppError, Result};

/// Register every media feed route on an actix `App`.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .route("/health", web::get().to(handlers::health))
            .route("/post", web::post().to(handlers::upload_post))
            .route("/feed", web::get().to(handlers::get_feed))
            .route("/post/{post_id}", web::get().to(handlers::get_post))
            .route("/like/{post_id}", web::post().to(handlers::like_post))
            .route("/comment/{post_id}", web::post().to(handlers::comment_post))
            .route("/media/{filename}", web::get().to(handlers::serve_media)),
    );
}
