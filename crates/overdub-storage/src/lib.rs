#![allow(clippy::missing_errors_doc, clippy::must_use_candidate)]

//! Object store access for Overdub
//!
//! The pipeline talks to storage only through [`ObjectStore`], constructed
//! once at startup and shared read-only across requests.

mod error;
mod filesystem;
mod gcs;

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use overdub_config::{StorageBackend, StorageConfig};

pub use error::{Result, StorageError};
pub use filesystem::FilesystemStore;
pub use gcs::{GcsStore, TokenSource};

/// One bucket of an object store
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Name of the bucket this store is scoped to
    fn bucket(&self) -> &str;

    /// Stream `object` into the file at `destination`, replacing its contents
    async fn download_to_file(&self, object: &str, destination: &Path) -> Result<()>;

    /// Stream the file at `source` into `object`
    async fn upload_from_file(&self, object: &str, source: &Path, content_type: &str) -> Result<()>;

    /// Grant anonymous read access to `object`
    async fn make_public(&self, object: &str) -> Result<()>;

    /// Unauthenticated URL of `object`
    fn public_url(&self, object: &str) -> String;
}

/// Build the object store described by the configuration
pub fn build_store(config: &StorageConfig) -> anyhow::Result<Arc<dyn ObjectStore>> {
    let store: Arc<dyn ObjectStore> = match &config.backend {
        StorageBackend::Gcs(gcs) => {
            tracing::debug!(bucket = %config.bucket, "initializing GCS object store");
            Arc::new(
                GcsStore::from_config(config.bucket.clone(), gcs)
                    .map_err(|e| anyhow::anyhow!("failed to initialize GCS store: {e}"))?,
            )
        }
        StorageBackend::Filesystem(fs) => {
            tracing::debug!(bucket = %config.bucket, root = %fs.root.display(), "initializing filesystem object store");
            Arc::new(FilesystemStore::new(
                fs.root.clone(),
                config.bucket.clone(),
                fs.public_base_url.clone(),
            ))
        }
    };

    Ok(store)
}

/// Split an object key into URL path segments, keeping `/` as a separator
pub(crate) fn object_segments(object: &str) -> impl Iterator<Item = &str> {
    object.split('/')
}
