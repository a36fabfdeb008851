use std::path::PathBuf;

use secrecy::SecretString;
use serde::Deserialize;
use url::Url;

/// Bucket that holds the base video and receives rendered results
pub const DEFAULT_BUCKET: &str = "amkrbucket";

/// Object key of the base video template.
///
/// The separator is U+2010 HYPHEN, not an ASCII minus; the key must match the
/// stored object byte for byte.
pub const DEFAULT_BASE_VIDEO_OBJECT: &str = "Video Base \u{2010} Hecho con Clipchamp (1).mp4";

/// Object store configuration
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Bucket name
    #[serde(default = "default_bucket")]
    pub bucket: String,
    /// Object key of the base video
    #[serde(default = "default_base_video_object")]
    pub base_video_object: String,
    /// Storage backend
    #[serde(default)]
    pub backend: StorageBackend,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            bucket: default_bucket(),
            base_video_object: default_base_video_object(),
            backend: StorageBackend::default(),
        }
    }
}

/// Object store backend
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StorageBackend {
    /// Google Cloud Storage JSON API
    Gcs(GcsConfig),
    /// Local directory standing in for a bucket
    Filesystem(FilesystemStorageConfig),
}

impl Default for StorageBackend {
    fn default() -> Self {
        Self::Gcs(GcsConfig::default())
    }
}

/// Google Cloud Storage backend configuration
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GcsConfig {
    /// API endpoint override, e.g. a local emulator
    #[serde(default)]
    pub endpoint: Option<Url>,
    /// Base for public object URLs (defaults to `https://storage.googleapis.com/`)
    #[serde(default)]
    pub public_base_url: Option<Url>,
    /// How requests are authorized
    #[serde(default)]
    pub credentials: GcsCredentials,
}

/// Credential source for Google Cloud Storage
#[derive(Debug, Default, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GcsCredentials {
    /// Access tokens from the GCE / Cloud Run metadata server
    #[default]
    Metadata,
    /// A fixed OAuth2 bearer token
    Token {
        /// Bearer token
        token: SecretString,
    },
    /// No authorization header (emulators)
    Anonymous,
}

/// Filesystem backend configuration
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FilesystemStorageConfig {
    /// Directory holding one sub-directory per bucket
    pub root: PathBuf,
    /// Base URL under which the root directory is served
    pub public_base_url: Url,
}

fn default_bucket() -> String {
    DEFAULT_BUCKET.to_string()
}

fn default_base_video_object() -> String {
    DEFAULT_BASE_VIDEO_OBJECT.to_string()
}
