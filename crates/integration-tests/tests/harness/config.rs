//! Programmatic configuration builder for integration tests

use std::net::SocketAddr;
use std::path::Path;

use overdub_config::{Config, GcsConfig, GcsCredentials, StorageBackend};

pub const BUCKET: &str = "test-bucket";
pub const BASE_VIDEO: &str = "Video Base \u{2010} test.mp4";

/// Builder for constructing test configurations
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Minimal config pointed at a mock GCS endpoint, with a private scratch dir
    pub fn new(gcs_endpoint: &str, scratch_dir: &Path) -> Self {
        let mut config = Config::default();

        config.server.listen_address = Some(SocketAddr::from(([127, 0, 0, 1], 0)));

        config.storage.bucket = BUCKET.to_string();
        config.storage.base_video_object = BASE_VIDEO.to_string();
        config.storage.backend = StorageBackend::Gcs(GcsConfig {
            endpoint: Some(gcs_endpoint.parse().unwrap()),
            public_base_url: Some(format!("{gcs_endpoint}public/").parse().unwrap()),
            credentials: GcsCredentials::Anonymous,
        });

        config.fetch.timeout = "10s".to_string();

        // mpeg4 ships with every ffmpeg build, libx264 does not
        config.media.video_codec = "mpeg4".to_string();
        config.media.preset = String::new();
        config.media.scratch_dir = Some(scratch_dir.to_path_buf());

        Self { config }
    }

    pub fn with_max_bytes(mut self, max_bytes: u64) -> Self {
        self.config.fetch.max_bytes = max_bytes;
        self
    }

    pub fn with_make_public(mut self, make_public: bool) -> Self {
        self.config.publish.make_public = make_public;
        self
    }

    /// Run the given executables instead of the installed `ffmpeg` / `ffprobe`
    pub fn with_toolkit(mut self, ffmpeg: &Path, ffprobe: &Path) -> Self {
        self.config.media.ffmpeg_path = ffmpeg.to_path_buf();
        self.config.media.ffprobe_path = ffprobe.to_path_buf();
        self
    }

    pub fn without_health(mut self) -> Self {
        self.config.server.health.enabled = false;
        self
    }

    pub fn build(self) -> Config {
        self.config.validate().unwrap();
        self.config
    }
}
