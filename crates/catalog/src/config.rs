use std::path::PathBuf;

/// Media file extensions the catalog recognizes, matched case-insensitively.
pub const SUPPORTED_EXTENSIONS: &[&str] = &["mp4", "webm", "ogg", "avi", "mov"];

/// Admin upload body limit (500 MB).
pub const MAX_UPLOAD_BYTES: usize = 500 * 1024 * 1024;

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub public_dir: PathBuf,
    pub videos_dir: PathBuf,
    pub thumbnail_size: String,
    pub thumbnail_seek_secs: f64,
}

impl Default for Config {
    fn default() -> Self {
        let public_dir = PathBuf::from("public");
        Self {
            port: 3000,
            videos_dir: public_dir.join("video-showcase").join("videos"),
            public_dir,
            thumbnail_size: "300x180".to_string(),
            thumbnail_seek_secs: 1.0,
        }
    }
}

impl Config {
    /// Build a config from the environment. Only `PORT` is read; the
    /// directory layout and thumbnail settings are fixed defaults.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Some(port) = std::env::var("PORT").ok().and_then(|p| p.parse().ok()) {
            config.port = port;
        }
        config
    }
}

pub fn is_supported_extension(ext: &str) -> bool {
    let ext = ext.to_lowercase();
    SUPPORTED_EXTENSIONS.contains(&ext.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_matching_is_case_insensitive() {
        assert!(is_supported_extension("mp4"));
        assert!(is_supported_extension("MP4"));
        assert!(is_supported_extension("MoV"));
        assert!(!is_supported_extension("mkv"));
        assert!(!is_supported_extension("json"));
    }
}
