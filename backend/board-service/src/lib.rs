//! Board Service
//!
//! A "word tile" board: short text posts stored in one SQL table and
//! rendered server-side, newest first.

pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod models;
pub mod render;

use actix_web::web;

// Public re-exports
pub use config::Config;
pub use error::{AppError, Result};

/// Register the board routes on an actix `App`.
///
/// Expects `web::Data<Arc<dyn PostRepository>>` and `web::Data<Renderer>`
/// in app data.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(handlers::health)).service(
        web::resource("/")
            .route(web::get().to(handlers::index))
            .route(web::post().to(handlers::submit_post)),
    );
}
