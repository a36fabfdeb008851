use std::path::Path;

use crate::{Config, StorageBackend};

impl Config {
    /// Load configuration from a TOML file
    ///
    /// Reads the file, expands `{{ env.VAR }}` placeholders, then
    /// deserializes and validates the result.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, environment variable
    /// expansion fails, TOML parsing fails, or validation fails
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("failed to read config file {}: {e}", path.display()))?;

        Self::from_toml(&raw)
    }

    /// Parse configuration from TOML text
    ///
    /// # Errors
    ///
    /// Returns an error if expansion, parsing, or validation fails
    pub fn from_toml(raw: &str) -> anyhow::Result<Self> {
        let expanded =
            crate::env::expand_env(raw).map_err(|e| anyhow::anyhow!("config variable expansion failed: {e}"))?;

        let config: Self = toml::from_str(&expanded).map_err(|e| anyhow::anyhow!("failed to parse config: {e}"))?;

        config.validate()?;

        Ok(config)
    }

    /// Validate that the configuration is internally consistent
    ///
    /// # Errors
    ///
    /// Returns an error if the health path is not absolute, storage names are
    /// empty, the fetch settings are unusable, or media codecs are missing
    pub fn validate(&self) -> anyhow::Result<()> {
        self.validate_server()?;
        self.validate_storage()?;
        self.validate_fetch()?;
        self.validate_media()?;
        Ok(())
    }

    fn validate_server(&self) -> anyhow::Result<()> {
        let health = &self.server.health;

        // Router paths must be absolute
        if health.enabled && !health.path.starts_with('/') {
            anyhow::bail!("server.health.path must start with '/', got '{}'", health.path);
        }

        Ok(())
    }

    fn validate_storage(&self) -> anyhow::Result<()> {
        if self.storage.bucket.trim().is_empty() {
            anyhow::bail!("storage.bucket must not be empty");
        }

        if self.storage.base_video_object.is_empty() {
            anyhow::bail!("storage.base_video_object must not be empty");
        }

        if let StorageBackend::Filesystem(ref fs) = self.storage.backend
            && fs.root.as_os_str().is_empty()
        {
            anyhow::bail!("storage.backend.root must not be empty for the filesystem backend");
        }

        Ok(())
    }

    fn validate_fetch(&self) -> anyhow::Result<()> {
        self.fetch.timeout_duration()?;

        if self.fetch.max_bytes == 0 {
            anyhow::bail!("fetch.max_bytes must be greater than 0");
        }

        Ok(())
    }

    fn validate_media(&self) -> anyhow::Result<()> {
        if self.media.video_codec.trim().is_empty() || self.media.audio_codec.trim().is_empty() {
            anyhow::bail!("media.video_codec and media.audio_codec must not be empty");
        }

        Ok(())
    }
}
