/// Board Service - HTTP Server
///
/// Serves the word tile board: list posts and accept new ones.
use actix_web::{web, App, HttpServer};
use board_service::db::{create_pool, DbBackend, PostRepository, SqlPostRepository};
use board_service::render::Renderer;
use board_service::{configure_routes, Config};
use std::io;
use std::sync::Arc;
use tracing_actix_web::TracingLogger;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = Config::from_env();
    let bind_address = format!("{}:{}", config.app.host, config.app.port);

    let backend = DbBackend::from_url(&config.database.url).map_err(to_io)?;
    let pool = create_pool(&config.database).await.map_err(to_io)?;
    let repo = SqlPostRepository::new(pool, backend);
    repo.ensure_schema().await.map_err(to_io)?;
    tracing::info!(?backend, "post table ready");

    let repo: Arc<dyn PostRepository> = Arc::new(repo);
    let repo = web::Data::new(repo);
    let renderer = web::Data::new(Renderer::new().map_err(to_io)?);

    tracing::info!("Board service starting HTTP server on {}", bind_address);

    HttpServer::new(move || {
        App::new()
            .app_data(repo.clone())
            .app_data(renderer.clone())
            .wrap(TracingLogger::default())
            .configure(configure_routes)
    })
    .bind(&bind_address)?
    .run()
    .await?;

    tracing::info!("Board service shutting down");
    Ok(())
}

fn to_io(err: impl std::fmt::Display) -> io::Error {
    io::Error::new(io::ErrorKind::Other, err.to_string())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let json = std::env::var("LOG_FORMAT").map(|v| v == "json").unwrap_or(false);

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}
