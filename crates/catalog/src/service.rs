use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use tracing::{info, warn};

use crate::config::Config;
use crate::metadata::MetadataStore;
use crate::model::{DeleteOutcome, GroupedVideos, PrizeTier, TierParseError, Video};
use crate::scanner::CatalogScanner;
use crate::thumbnail::ThumbnailEncoder;

#[derive(Debug, thiserror::Error)]
pub enum ThumbnailError {
    #[error("no media file for this id")]
    MediaNotFound,
    #[error("thumbnail generation failed: {0}")]
    Encoder(#[source] anyhow::Error),
}

/// The domain operations over one videos directory. Constructed once at
/// process start and shared by handle; tests construct their own instance
/// pointed at a temporary directory.
pub struct CatalogService {
    config: Config,
    scanner: CatalogScanner,
    store: MetadataStore,
    encoder: Arc<dyn ThumbnailEncoder>,
}

impl CatalogService {
    pub fn new(config: Config, encoder: Arc<dyn ThumbnailEncoder>) -> Self {
        let store = MetadataStore::new(&config.videos_dir);
        let scanner = CatalogScanner::new(&config.videos_dir, store.clone());
        Self {
            config,
            scanner,
            store,
            encoder,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn store(&self) -> &MetadataStore {
        &self.store
    }

    /// One scan, partitioned by exact tier match. Bucket order is scan
    /// order; unrecognized tags are in no bucket.
    pub async fn list_all(&self) -> GroupedVideos {
        let mut grouped = GroupedVideos::default();
        for video in self.scanner.scan().await {
            match video.tier() {
                Some(PrizeTier::First) => grouped.first.push(video),
                Some(PrizeTier::Second) => grouped.second.push(video),
                Some(PrizeTier::Third) => grouped.third.push(video),
                None => {}
            }
        }
        grouped
    }

    /// The raw scan, for the admin list. Unrecognized tags do appear here.
    pub async fn list_flat(&self) -> Vec<Video> {
        self.scanner.scan().await
    }

    /// Fails before scanning when the tier is not one of the three known
    /// tags, so an invalid tier never returns partial data.
    pub async fn list_by_tier(&self, tier: &str) -> Result<Vec<Video>, TierParseError> {
        let tier: PrizeTier = tier.parse()?;
        Ok(self
            .scanner
            .scan()
            .await
            .into_iter()
            .filter(|v| v.tier() == Some(tier))
            .collect())
    }

    pub fn is_valid_tier(tier: &str) -> bool {
        tier.parse::<PrizeTier>().is_ok()
    }

    pub async fn find_media_file(&self, id: &str) -> Option<PathBuf> {
        self.scanner.find_media_file(id).await
    }

    pub async fn thumbnail(&self, id: &str) -> Result<Vec<u8>, ThumbnailError> {
        let path = self
            .scanner
            .find_media_file(id)
            .await
            .ok_or(ThumbnailError::MediaNotFound)?;
        self.encoder
            .extract_frame(&path, self.config.thumbnail_seek_secs, &self.config.thumbnail_size)
            .await
            .map_err(ThumbnailError::Encoder)
    }

    /// Remove the media file, then best-effort remove the sidecar. `None`
    /// when no media file matches the id. A sidecar removal failure is
    /// logged and reported in the outcome, not propagated.
    pub async fn delete_video(&self, id: &str) -> io::Result<Option<DeleteOutcome>> {
        let Some(path) = self.scanner.find_media_file(id).await else {
            return Ok(None);
        };
        tokio::fs::remove_file(&path).await?;
        let sidecar_deleted = match self.store.delete(id).await {
            Ok(deleted) => deleted,
            Err(e) => {
                warn!(id, error = %e, "Failed to remove sidecar during delete");
                false
            }
        };
        info!(id, sidecar_deleted, "Deleted video");
        Ok(Some(DeleteOutcome {
            media_deleted: true,
            sidecar_deleted,
        }))
    }
}
