use std::path::Path as FsPath;
use std::sync::Arc;

use axum::{
    extract::{DefaultBodyLimit, Multipart, Path, State},
    response::Json,
    routing::{delete, get, post, put},
    Router,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{error, info};
use uuid::Uuid;

use catalog::config;
use catalog::model::{Metadata, PrizeTier, Video};
use catalog::service::CatalogService;

use crate::error::{ApiError, ApiResult};

pub fn router(service: Arc<CatalogService>) -> Router {
    Router::new()
        .route("/upload-video", post(upload_video))
        .route("/upload-metadata", post(upload_metadata))
        .route("/update-metadata", put(update_metadata))
        .route("/delete-video/:video_id", delete(delete_video))
        .route("/videos", get(list_videos))
        .layer(DefaultBodyLimit::max(config::MAX_UPLOAD_BYTES))
        .with_state(service)
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct MetadataRequest {
    video_id: Option<String>,
    metadata: Option<Metadata>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct UploadResponse {
    success: bool,
    video_id: String,
    filename: String,
    size: usize,
}

#[derive(Serialize)]
struct AdminResponse {
    success: bool,
    message: &'static str,
}

/// Multipart upload of the media file itself. Metadata arrives in a second
/// request, so a freshly uploaded video is listed with defaults until then.
async fn upload_video(
    State(service): State<Arc<CatalogService>>,
    mut multipart: Multipart,
) -> ApiResult<Json<UploadResponse>> {
    let mut saved: Option<(String, usize)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("Failed to read multipart body: {e}")))?
    {
        if field.name() != Some("video") {
            continue;
        }

        let original_name = field.file_name().unwrap_or_default().to_string();
        let ext = FsPath::new(&original_name)
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default()
            .to_lowercase();
        if !config::is_supported_extension(&ext) {
            return Err(ApiError::BadRequest("Unsupported video format".to_string()));
        }

        let data = field
            .bytes()
            .await
            .map_err(|e| ApiError::BadRequest(format!("Failed to read upload: {e}")))?;

        let filename = unique_filename(&ext);
        let dest = service.config().videos_dir.join(&filename);
        tokio::fs::write(&dest, &data).await.map_err(|e| {
            error!(filename = %filename, error = %e, "Failed to store uploaded video");
            ApiError::Internal("Failed to upload video".to_string())
        })?;

        info!(filename = %filename, size = data.len(), "Stored uploaded video");
        saved = Some((filename, data.len()));
        break;
    }

    let (filename, size) =
        saved.ok_or_else(|| ApiError::BadRequest("No video file provided".to_string()))?;
    let video_id = FsPath::new(&filename)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or_default()
        .to_string();

    Ok(Json(UploadResponse {
        success: true,
        video_id,
        filename,
        size,
    }))
}

async fn upload_metadata(
    State(service): State<Arc<CatalogService>>,
    Json(req): Json<MetadataRequest>,
) -> ApiResult<Json<AdminResponse>> {
    let (video_id, metadata) = validate_metadata_request(req)?;

    service.store().write(&video_id, &metadata).await.map_err(|e| {
        error!(video_id = %video_id, error = %e, "Failed to save metadata");
        ApiError::Internal("Failed to save metadata".to_string())
    })?;

    Ok(Json(AdminResponse {
        success: true,
        message: "Metadata saved successfully",
    }))
}

/// Full overwrite of an existing sidecar; 404 when none exists yet.
async fn update_metadata(
    State(service): State<Arc<CatalogService>>,
    Json(req): Json<MetadataRequest>,
) -> ApiResult<Json<AdminResponse>> {
    let (video_id, metadata) = validate_metadata_request(req)?;

    if !service.store().exists(&video_id).await {
        return Err(ApiError::NotFound("Video metadata not found"));
    }

    service.store().write(&video_id, &metadata).await.map_err(|e| {
        error!(video_id = %video_id, error = %e, "Failed to update metadata");
        ApiError::Internal("Failed to update metadata".to_string())
    })?;

    Ok(Json(AdminResponse {
        success: true,
        message: "Metadata updated successfully",
    }))
}

async fn delete_video(
    State(service): State<Arc<CatalogService>>,
    Path(video_id): Path<String>,
) -> ApiResult<Json<AdminResponse>> {
    let outcome = service.delete_video(&video_id).await.map_err(|e| {
        error!(video_id = %video_id, error = %e, "Failed to delete video");
        ApiError::Internal("Failed to delete video".to_string())
    })?;

    match outcome {
        Some(_) => Ok(Json(AdminResponse {
            success: true,
            message: "Video deleted successfully",
        })),
        None => Err(ApiError::NotFound("Video file not found")),
    }
}

/// Flat catalog for the admin console, unbucketed.
async fn list_videos(State(service): State<Arc<CatalogService>>) -> Json<Vec<Video>> {
    Json(service.list_flat().await)
}

fn validate_metadata_request(req: MetadataRequest) -> Result<(String, Metadata), ApiError> {
    let (Some(video_id), Some(metadata)) = (req.video_id, req.metadata) else {
        return Err(ApiError::BadRequest(
            "Video ID and metadata are required".to_string(),
        ));
    };
    if video_id.is_empty() {
        return Err(ApiError::BadRequest(
            "Video ID and metadata are required".to_string(),
        ));
    }

    // The write-time membership check; reads stay permissive.
    let tier = metadata
        .prize_type
        .as_deref()
        .ok_or_else(|| ApiError::BadRequest("Invalid prize type".to_string()))?;
    tier.parse::<PrizeTier>()?;

    Ok((video_id, metadata))
}

/// Timestamp plus random suffix, so concurrent uploads never collide.
fn unique_filename(ext: &str) -> String {
    let timestamp = Utc::now().timestamp_millis();
    let uuid = Uuid::new_v4().simple().to_string();
    format!("video_{timestamp}_{}.{ext}", &uuid[..6])
}
