use axum::{
    body::Body,
    extract::{Path, State},
    http::{header, StatusCode},
    response::{Json, Response},
    routing::get,
    Router,
};
use std::sync::Arc;
use tracing::error;

use catalog::model::{GroupedVideos, Video};
use catalog::service::{CatalogService, ThumbnailError};

use crate::error::{ApiError, ApiResult};

pub fn router(service: Arc<CatalogService>) -> Router {
    Router::new()
        .route("/videos", get(list_videos))
        .route("/videos/:prize_type", get(list_videos_by_tier))
        .route("/thumbnail/:video_id", get(get_thumbnail))
        .with_state(service)
}

/// Catalog grouped by prize tier. Scan errors degrade to empty buckets
/// rather than failing the request.
async fn list_videos(State(service): State<Arc<CatalogService>>) -> Json<GroupedVideos> {
    Json(service.list_all().await)
}

async fn list_videos_by_tier(
    State(service): State<Arc<CatalogService>>,
    Path(prize_type): Path<String>,
) -> ApiResult<Json<Vec<Video>>> {
    let videos = service.list_by_tier(&prize_type).await?;
    Ok(Json(videos))
}

/// On-demand JPEG thumbnail, regenerated on every request.
async fn get_thumbnail(
    State(service): State<Arc<CatalogService>>,
    Path(video_id): Path<String>,
) -> ApiResult<Response> {
    let jpeg = service.thumbnail(&video_id).await.map_err(|e| match e {
        ThumbnailError::MediaNotFound => ApiError::NotFound("Video not found"),
        ThumbnailError::Encoder(err) => {
            error!(video_id = %video_id, error = %err, "Thumbnail generation failed");
            ApiError::Internal("Failed to generate thumbnail".to_string())
        }
    })?;

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "image/jpeg")
        .header(header::CONTENT_LENGTH, jpeg.len().to_string())
        .header(header::CACHE_CONTROL, "public, max-age=86400")
        .body(Body::from(jpeg))
        .map_err(|_| ApiError::Internal("Failed to build thumbnail response".to_string()))
}
