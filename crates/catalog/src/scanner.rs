use std::path::PathBuf;

use tracing::warn;

use crate::config;
use crate::metadata::{MetadataError, MetadataStore};
use crate::model::{default_title, Metadata, PrizeTier, Video, DEFAULT_AUTHOR, DEFAULT_SCHOOL};

pub const VIDEO_URL_PREFIX: &str = "/video-showcase/videos";
pub const THUMBNAIL_URL_PREFIX: &str = "/api/thumbnail";

/// Rebuilds the catalog from the videos directory: every supported media
/// file joined with its sidecar (or defaults) by filename stem.
#[derive(Debug, Clone)]
pub struct CatalogScanner {
    videos_dir: PathBuf,
    store: MetadataStore,
}

impl CatalogScanner {
    pub fn new(videos_dir: impl Into<PathBuf>, store: MetadataStore) -> Self {
        Self {
            videos_dir: videos_dir.into(),
            store,
        }
    }

    /// Scan the directory and produce the catalog in listing order.
    ///
    /// A directory-level read error yields an empty catalog rather than
    /// propagating. Sidecar-level problems fall back to per-field defaults.
    pub async fn scan(&self) -> Vec<Video> {
        let mut entries = match tokio::fs::read_dir(&self.videos_dir).await {
            Ok(entries) => entries,
            Err(e) => {
                warn!(dir = %self.videos_dir.display(), error = %e, "Failed to read videos directory");
                return Vec::new();
            }
        };

        let mut videos = Vec::new();
        loop {
            let entry = match entries.next_entry().await {
                Ok(Some(entry)) => entry,
                Ok(None) => break,
                Err(e) => {
                    warn!(dir = %self.videos_dir.display(), error = %e, "Directory listing aborted");
                    break;
                }
            };
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
                continue;
            };
            if !config::is_supported_extension(ext) {
                continue;
            }
            let (Some(id), Some(file_name)) = (
                path.file_stem().and_then(|s| s.to_str()),
                path.file_name().and_then(|s| s.to_str()),
            ) else {
                continue;
            };
            videos.push(self.build_video(id, file_name).await);
        }
        videos
    }

    /// Resolve an id back to its media file, if any supported-extension file
    /// with that stem exists. Sidecar-only (orphaned) ids resolve to `None`.
    pub async fn find_media_file(&self, id: &str) -> Option<PathBuf> {
        let mut entries = tokio::fs::read_dir(&self.videos_dir).await.ok()?;
        while let Ok(Some(entry)) = entries.next_entry().await {
            let path = entry.path();
            let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
                continue;
            };
            if !config::is_supported_extension(ext) {
                continue;
            }
            if path.file_stem().and_then(|s| s.to_str()) == Some(id) && path.is_file() {
                return Some(path);
            }
        }
        None
    }

    async fn build_video(&self, id: &str, file_name: &str) -> Video {
        let metadata = match self.store.read(id).await {
            Ok(metadata) => metadata,
            Err(MetadataError::NotFound) => Metadata::default(),
            Err(e) => {
                warn!(id, error = %e, "Unreadable sidecar, using defaults");
                Metadata::default()
            }
        };
        Video {
            id: id.to_string(),
            title: metadata.title.unwrap_or_else(|| default_title(id)),
            video_url: format!("{VIDEO_URL_PREFIX}/{file_name}"),
            thumbnail_url: format!("{THUMBNAIL_URL_PREFIX}/{id}"),
            prize_type: metadata
                .prize_type
                .unwrap_or_else(|| PrizeTier::Third.as_str().to_string()),
            school: metadata.school.unwrap_or_else(|| DEFAULT_SCHOOL.to_string()),
            author: metadata.author.unwrap_or_else(|| DEFAULT_AUTHOR.to_string()),
        }
    }
}
