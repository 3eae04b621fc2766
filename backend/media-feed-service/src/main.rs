/// Media Feed Service - HTTP Server
///
/// Handles media uploads, the feed, counters and raw media streaming.
use actix_cors::Cors;
use actix_web::{http::header, web, App, HttpServer};
use media_feed_service::db::JsonFileStore;
use media_feed_service::services::{FeedService, MediaStorage};
use media_feed_service::{configure_routes, Config};
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

    let service = build_service(&config)
        .await
        .map_err(|e| io::Error::new(io::ErrorKind::Other, format!("{e:#}")))?;
    let service = web::Data::new(service);

    tracing::info!("Media feed service starting HTTP server on {}", bind_address);

    let allowed_origins = config.cors.allowed_origins.clone();
    HttpServer::new(move || {
        App::new()
            .app_data(service.clone())
            .wrap(build_cors(&allowed_origins))
            .wrap(TracingLogger::default())
            .configure(configure_routes)
    })
    .bind(&bind_address)?
    .run()
    .await?;

    tracing::info!("Media feed service shutting down");
    Ok(())
}

async fn build_service(config: &Config) -> anyhow::Result<FeedService> {
    use anyhow::Context;

    let store = JsonFileStore::open(&config.storage.metadata_file)
        .await
        .with_context(|| {
            format!(
                "failed to open metadata file {}",
                config.storage.metadata_file.display()
            )
        })?;
    let media = MediaStorage::open(&config.storage.upload_dir)
        .await
        .with_context(|| {
            format!(
                "failed to create upload dir {}",
                config.storage.upload_dir.display()
            )
        })?;
    tracing::info!(
        metadata_file = %store.path().display(),
        upload_dir = %media.root().display(),
        "storage ready"
    );

    Ok(FeedService::new(Arc::new(store), media)
        .with_max_upload_bytes(config.storage.max_upload_bytes))
}

fn build_cors(allowed_origins: &[String]) -> Cors {
    let cors = Cors::default()
        .allowed_methods(vec!["GET", "POST", "OPTIONS"])
        .allowed_headers(vec![header::CONTENT_TYPE])
        .max_age(3600);

    if allowed_origins.iter().any(|o| o == "*") {
        return cors.allow_any_origin();
    }

    allowed_origins
        .iter()
        .fold(cors, |cors, origin| cors.allowed_origin(origin))
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
