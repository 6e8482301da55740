use std::io;
use std::path::PathBuf;

use crate::model::Metadata;

/// Why a sidecar read failed. NotFound and Malformed are distinct so the
/// scanner can fall back to defaults while callers that care (the update
/// handler's existence check) can tell them apart.
#[derive(Debug, thiserror::Error)]
pub enum MetadataError {
    #[error("no sidecar for this id")]
    NotFound,
    #[error("malformed sidecar: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error(transparent)]
    Io(#[from] io::Error),
}

/// One JSON sidecar per video id, plain file I/O, no caching.
#[derive(Debug, Clone)]
pub struct MetadataStore {
    videos_dir: PathBuf,
}

impl MetadataStore {
    pub fn new(videos_dir: impl Into<PathBuf>) -> Self {
        Self {
            videos_dir: videos_dir.into(),
        }
    }

    pub fn sidecar_path(&self, id: &str) -> PathBuf {
        self.videos_dir.join(format!("{id}.json"))
    }

    pub async fn read(&self, id: &str) -> Result<Metadata, MetadataError> {
        let raw = match tokio::fs::read(self.sidecar_path(id)).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Err(MetadataError::NotFound),
            Err(e) => return Err(MetadataError::Io(e)),
        };
        Ok(serde_json::from_slice(&raw)?)
    }

    /// Full overwrite, pretty-printed. Creates the file if absent. No
    /// atomic rename; a crash mid-write can truncate the sidecar.
    pub async fn write(&self, id: &str, metadata: &Metadata) -> Result<(), MetadataError> {
        let json = serde_json::to_vec_pretty(metadata)?;
        tokio::fs::write(self.sidecar_path(id), json).await?;
        Ok(())
    }

    /// Returns `Ok(false)` when the sidecar was already absent, so
    /// best-effort callers never see that as an error.
    pub async fn delete(&self, id: &str) -> Result<bool, MetadataError> {
        match tokio::fs::remove_file(self.sidecar_path(id)).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(MetadataError::Io(e)),
        }
    }

    pub async fn exists(&self, id: &str) -> bool {
        tokio::fs::try_exists(self.sidecar_path(id))
            .await
            .unwrap_or(false)
    }
}
