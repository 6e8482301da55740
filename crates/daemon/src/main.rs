use std::{net::SocketAddr, sync::Arc};

use axum::handler::HandlerWithoutStateExt;
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::{info, level_filters::LevelFilter};

use catalog::config::Config;
use catalog::service::CatalogService;
use catalog::thumbnail::FfmpegEncoder;

mod api;
mod error;
mod files;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_max_level(LevelFilter::INFO)
        .init();

    let config = Config::from_env();
    tokio::fs::create_dir_all(&config.videos_dir).await?;

    let service = Arc::new(CatalogService::new(config.clone(), Arc::new(FfmpegEncoder)));

    // Build the router with CORS support
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Front-end bundle, then the HTML 404 for anything unmatched
    let static_files =
        ServeDir::new(&config.public_dir).not_found_service(error::not_found.into_service());

    let app = Router::new()
        .nest("/api", api::router(service.clone()))
        .merge(files::router(service))
        .fallback_service(static_files)
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    // Start the server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    info!("Starting showcase server on {}", addr);
    info!("Static files are served from {}", config.public_dir.display());
    info!("Videos are served from {}", config.videos_dir.display());

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
