use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use url::Url;

use crate::{
    ObjectStore,
    error::{Result, StorageError},
    object_segments,
};

/// Local directory standing in for a bucket
///
/// Objects live at `{root}/{bucket}/{object}`; `public_base_url` is expected
/// to serve `root`. Every object is readable, so `make_public` is a no-op.
pub struct FilesystemStore {
    root: PathBuf,
    bucket: String,
    public_base_url: Url,
}

impl FilesystemStore {
    pub const fn new(root: PathBuf, bucket: String, public_base_url: Url) -> Self {
        Self {
            root,
            bucket,
            public_base_url,
        }
    }

    fn object_path(&self, object: &str) -> Result<PathBuf> {
        let mut path = self.root.join(&self.bucket);

        for segment in object_segments(object) {
            if segment.is_empty() || segment == "." || segment == ".." {
                return Err(StorageError::Config(format!(
                    "object key '{object}' cannot be mapped to a file path"
                )));
            }
            path.push(segment);
        }

        Ok(path)
    }
}

#[async_trait]
impl ObjectStore for FilesystemStore {
    fn bucket(&self) -> &str {
        &self.bucket
    }

    async fn download_to_file(&self, object: &str, destination: &Path) -> Result<()> {
        let source = self.object_path(object)?;

        match tokio::fs::copy(&source, destination).await {
            Ok(bytes) => {
                tracing::debug!(bucket = %self.bucket, %object, bytes, "copied object out of store");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Err(StorageError::NotFound(object.to_string())),
            Err(e) => Err(e.into()),
        }
    }

    async fn upload_from_file(&self, object: &str, source: &Path, _content_type: &str) -> Result<()> {
        let target = self.object_path(object)?;

        if let Some(parent) = target.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let bytes = tokio::fs::copy(source, &target).await?;

        tracing::debug!(bucket = %self.bucket, %object, bytes, "copied object into store");
        Ok(())
    }

    async fn make_public(&self, _object: &str) -> Result<()> {
        Ok(())
    }

    fn public_url(&self, object: &str) -> String {
        let mut url = self.public_base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty();
            segments.push(&self.bucket);
            segments.extend(object_segments(object));
        }
        url.to_string()
    }
}
