use std::path::Path;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;

use catalog::config::Config;
use catalog::service::CatalogService;
use catalog::thumbnail::ThumbnailEncoder;

const FAKE_JPEG: &[u8] = &[0xFF, 0xD8, 0xFF, 0xD9];

struct FakeEncoder;

#[async_trait::async_trait]
impl ThumbnailEncoder for FakeEncoder {
    async fn extract_frame(
        &self,
        _video_path: &Path,
        _seek_secs: f64,
        _size: &str,
    ) -> anyhow::Result<Vec<u8>> {
        Ok(FAKE_JPEG.to_vec())
    }
}

fn app(tmp: &TempDir) -> Router {
    let config = Config {
        videos_dir: tmp.path().to_path_buf(),
        public_dir: tmp.path().to_path_buf(),
        ..Config::default()
    };
    let service = Arc::new(CatalogService::new(config, Arc::new(FakeEncoder)));
    Router::new()
        .nest("/api", super::router(service.clone()))
        .merge(crate::files::router(service))
        .fallback(crate::error::not_found)
}

fn put_video(tmp: &TempDir, name: &str, sidecar: Option<&str>) {
    std::fs::write(tmp.path().join(name), b"fake video bytes").unwrap();
    if let Some(json) = sidecar {
        let stem = Path::new(name).file_stem().unwrap().to_str().unwrap();
        std::fs::write(tmp.path().join(format!("{stem}.json")), json).unwrap();
    }
}

async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
}

async fn send_json(app: &Router, method: &str, uri: &str, body: Value) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method(method)
                .uri(uri)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(serde_json::to_vec(&body).unwrap()))
                .unwrap(),
        )
        .await
        .unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
}

#[tokio::test]
async fn grouped_listing_matches_the_sidecar() {
    let tmp = TempDir::new().unwrap();
    put_video(
        &tmp,
        "abc123.mp4",
        Some(r#"{"title":"Demo","prizeType":"first","school":"X","author":"Y"}"#),
    );

    let (status, body) = get(&app(&tmp), "/api/videos").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["second"], json!([]));
    assert_eq!(body["third"], json!([]));
    assert_eq!(
        body["first"],
        json!([{
            "id": "abc123",
            "title": "Demo",
            "videoUrl": "/video-showcase/videos/abc123.mp4",
            "thumbnailUrl": "/api/thumbnail/abc123",
            "prizeType": "first",
            "school": "X",
            "author": "Y"
        }])
    );
}

#[tokio::test]
async fn tier_listing_defaults_for_bare_media() {
    let tmp = TempDir::new().unwrap();
    put_video(&tmp, "xyz.webm", None);

    let (status, body) = get(&app(&tmp), "/api/videos/third").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["title"], "xyz");
    assert_eq!(body[0]["school"], "未知学校");
    assert_eq!(body[0]["author"], "未知作者");
}

#[tokio::test]
async fn invalid_tier_is_bad_request() {
    let tmp = TempDir::new().unwrap();
    put_video(&tmp, "a.mp4", None);

    let (status, body) = get(&app(&tmp), "/api/videos/grand").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid prize type");
}

#[tokio::test]
async fn thumbnail_for_known_video_is_jpeg_with_cache_header() {
    let tmp = TempDir::new().unwrap();
    put_video(&tmp, "clip.mov", None);

    let response = app(&tmp)
        .oneshot(
            Request::builder()
                .uri("/api/thumbnail/clip")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "image/jpeg");
    assert_eq!(
        response.headers()[header::CACHE_CONTROL],
        "public, max-age=86400"
    );
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(&bytes[..], FAKE_JPEG);
}

#[tokio::test]
async fn thumbnail_for_unknown_video_is_not_found() {
    let tmp = TempDir::new().unwrap();
    let (status, body) = get(&app(&tmp), "/api/thumbnail/ghost").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Video not found");
}

#[tokio::test]
async fn upload_stores_the_file_under_a_generated_name() {
    let tmp = TempDir::new().unwrap();
    let boundary = "XBOUNDARY";
    let body = format!(
        "--{boundary}\r\n\
         Content-Disposition: form-data; name=\"video\"; filename=\"clip.mp4\"\r\n\
         Content-Type: video/mp4\r\n\r\n\
         fake video bytes\r\n\
         --{boundary}--\r\n"
    );

    let response = app(&tmp)
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/admin/upload-video")
                .header(
                    header::CONTENT_TYPE,
                    format!("multipart/form-data; boundary={boundary}"),
                )
                .body(Body::from(body))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: Value = serde_json::from_slice(&bytes).unwrap();

    assert_eq!(json["success"], true);
    assert_eq!(json["size"], 16);
    let filename = json["filename"].as_str().unwrap();
    assert!(filename.starts_with("video_"));
    assert!(filename.ends_with(".mp4"));
    assert_eq!(
        json["videoId"].as_str().unwrap(),
        filename.trim_end_matches(".mp4")
    );
    assert!(tmp.path().join(filename).exists());
}

#[tokio::test]
async fn upload_with_unsupported_extension_is_rejected() {
    let tmp = TempDir::new().unwrap();
    let boundary = "XBOUNDARY";
    let body = format!(
        "--{boundary}\r\n\
         Content-Disposition: form-data; name=\"video\"; filename=\"clip.exe\"\r\n\r\n\
         bytes\r\n\
         --{boundary}--\r\n"
    );

    let response = app(&tmp)
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/admin/upload-video")
                .header(
                    header::CONTENT_TYPE,
                    format!("multipart/form-data; boundary={boundary}"),
                )
                .body(Body::from(body))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(std::fs::read_dir(tmp.path()).unwrap().next().is_none());
}

#[tokio::test]
async fn upload_without_video_field_is_rejected() {
    let tmp = TempDir::new().unwrap();
    let boundary = "XBOUNDARY";
    let body = format!(
        "--{boundary}\r\n\
         Content-Disposition: form-data; name=\"other\"\r\n\r\n\
         value\r\n\
         --{boundary}--\r\n"
    );

    let response = app(&tmp)
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/admin/upload-video")
                .header(
                    header::CONTENT_TYPE,
                    format!("multipart/form-data; boundary={boundary}"),
                )
                .body(Body::from(body))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn metadata_round_trips_into_the_tier_listing() {
    let tmp = TempDir::new().unwrap();
    put_video(&tmp, "clip.mp4", None);
    let app = app(&tmp);

    let (status, body) = send_json(
        &app,
        "POST",
        "/api/admin/upload-metadata",
        json!({
            "videoId": "clip",
            "metadata": {
                "title": "Demo",
                "prizeType": "second",
                "school": "X",
                "author": "Y"
            }
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);

    let (status, body) = get(&app, "/api/videos/second").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["title"], "Demo");
    assert_eq!(body[0]["prizeType"], "second");
    assert_eq!(body[0]["school"], "X");
    assert_eq!(body[0]["author"], "Y");
}

#[tokio::test]
async fn metadata_with_invalid_tier_is_rejected() {
    let tmp = TempDir::new().unwrap();
    put_video(&tmp, "clip.mp4", None);

    let (status, body) = send_json(
        &app(&tmp),
        "POST",
        "/api/admin/upload-metadata",
        json!({
            "videoId": "clip",
            "metadata": { "title": "Demo", "prizeType": "grand" }
        }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid prize type");
}

#[tokio::test]
async fn metadata_with_missing_fields_is_rejected() {
    let tmp = TempDir::new().unwrap();
    let app = app(&tmp);

    let (status, _) = send_json(
        &app,
        "POST",
        "/api/admin/upload-metadata",
        json!({ "videoId": "clip" }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send_json(
        &app,
        "POST",
        "/api/admin/upload-metadata",
        json!({ "metadata": { "prizeType": "first" } }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn update_requires_an_existing_sidecar() {
    let tmp = TempDir::new().unwrap();
    put_video(&tmp, "clip.mp4", None);
    let app = app(&tmp);

    let payload = json!({
        "videoId": "clip",
        "metadata": { "title": "Edited", "prizeType": "first" }
    });

    let (status, body) = send_json(&app, "PUT", "/api/admin/update-metadata", payload.clone()).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Video metadata not found");

    std::fs::write(tmp.path().join("clip.json"), b"{}").unwrap();
    let (status, _) = send_json(&app, "PUT", "/api/admin/update-metadata", payload).await;
    assert_eq!(status, StatusCode::OK);

    let stored: Value =
        serde_json::from_slice(&std::fs::read(tmp.path().join("clip.json")).unwrap()).unwrap();
    assert_eq!(stored["title"], "Edited");
}

#[tokio::test]
async fn delete_removes_media_and_sidecar() {
    let tmp = TempDir::new().unwrap();
    put_video(&tmp, "clip.mp4", Some(r#"{"prizeType":"first"}"#));
    let app = app(&tmp);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri("/api/admin/delete-video/clip")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(!tmp.path().join("clip.mp4").exists());
    assert!(!tmp.path().join("clip.json").exists());

    let (status, body) = get(&app, "/api/videos").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["first"], json!([]));
}

#[tokio::test]
async fn delete_unknown_id_is_not_found() {
    let tmp = TempDir::new().unwrap();
    put_video(&tmp, "keep.mp4", None);
    let app = app(&tmp);

    let response = app
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri("/api/admin/delete-video/ghost")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(tmp.path().join("keep.mp4").exists());
}

#[tokio::test]
async fn admin_listing_is_flat() {
    let tmp = TempDir::new().unwrap();
    put_video(&tmp, "a.mp4", Some(r#"{"prizeType":"first"}"#));
    put_video(&tmp, "b.mp4", Some(r#"{"prizeType":"grand"}"#));

    let (status, body) = get(&app(&tmp), "/api/admin/videos").await;
    assert_eq!(status, StatusCode::OK);
    // Both appear here, including the unbucketable tag.
    assert_eq!(body.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn video_file_range_request_returns_partial_content() {
    let tmp = TempDir::new().unwrap();
    put_video(&tmp, "clip.mp4", None);

    let response = app(&tmp)
        .oneshot(
            Request::builder()
                .uri("/video-showcase/videos/clip.mp4")
                .header(header::RANGE, "bytes=0-3")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::PARTIAL_CONTENT);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "video/mp4");
    assert_eq!(
        response.headers()[header::CONTENT_RANGE],
        "bytes 0-3/16"
    );
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(&bytes[..], b"fake");
}

#[tokio::test]
async fn unmatched_route_gets_the_html_page() {
    let tmp = TempDir::new().unwrap();
    let response = app(&tmp)
        .oneshot(
            Request::builder()
                .uri("/no/such/page")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let content_type = response.headers()[header::CONTENT_TYPE].to_str().unwrap();
    assert!(content_type.starts_with("text/html"));
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    assert!(String::from_utf8_lossy(&bytes).contains("404 Not Found"));
}
