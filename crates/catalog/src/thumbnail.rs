use std::path::Path;

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;

/// Capability interface for frame extraction, so the concrete external tool
/// is swappable and tests can use a fake.
#[async_trait]
pub trait ThumbnailEncoder: Send + Sync {
    /// Extract one frame at `seek_secs` into the video, scaled to `size`
    /// (e.g. "300x180"), encoded as baseline JPEG.
    async fn extract_frame(&self, video_path: &Path, seek_secs: f64, size: &str)
        -> Result<Vec<u8>>;
}

/// ffmpeg-backed encoder. Pipes the single frame straight from ffmpeg's
/// stdout into memory, so there is no intermediate file to clean up. No
/// retry and no caching; every call decodes from the source video.
pub struct FfmpegEncoder;

#[async_trait]
impl ThumbnailEncoder for FfmpegEncoder {
    async fn extract_frame(
        &self,
        video_path: &Path,
        seek_secs: f64,
        size: &str,
    ) -> Result<Vec<u8>> {
        let input = video_path.to_str().context("non-UTF-8 video path")?;
        let seek = seek_secs.to_string();

        let output = Command::new("ffmpeg")
            .args([
                "-ss",
                seek.as_str(),
                "-i",
                input,
                "-frames:v",
                "1",
                "-s",
                size,
                "-f",
                "image2pipe",
                "-vcodec",
                "mjpeg",
                "-",
            ])
            .output()
            .await
            .context("Failed to execute ffmpeg. Make sure FFmpeg is installed.")?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            bail!("ffmpeg failed to extract frame: {}", stderr);
        }
        if output.stdout.is_empty() {
            bail!("ffmpeg produced no frame data for {}", video_path.display());
        }

        debug!(path = %video_path.display(), bytes = output.stdout.len(), "Extracted thumbnail frame");
        Ok(output.stdout)
    }
}
