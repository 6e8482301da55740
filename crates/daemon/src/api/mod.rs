use axum::Router;
use std::sync::Arc;

use catalog::service::CatalogService;

pub mod admin;
pub mod videos;

pub fn router(service: Arc<CatalogService>) -> Router {
    Router::new()
        .merge(videos::router(service.clone()))
        .nest("/admin", admin::router(service))
}

#[cfg(test)]
mod tests;
