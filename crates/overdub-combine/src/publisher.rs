use std::sync::Arc;

use overdub_config::PublishConfig;
use overdub_storage::ObjectStore;

use crate::{
    error::{CombineError, Result},
    scratch::TempAsset,
};

const VIDEO_CONTENT_TYPE: &str = "video/mp4";

/// Uploads rendered videos and hands back their public URL
pub(crate) struct Publisher {
    store: Arc<dyn ObjectStore>,
    object_prefix: String,
    make_public: bool,
}

impl Publisher {
    pub fn new(store: Arc<dyn ObjectStore>, config: &PublishConfig) -> Self {
        Self {
            store,
            object_prefix: config.object_prefix.clone(),
            make_public: config.make_public,
        }
    }

    /// Object key for a rendered file
    pub fn object_name(&self, rendered: &TempAsset) -> String {
        format!("{}{}", self.object_prefix, rendered.file_name())
    }

    pub async fn publish(&self, rendered: &TempAsset) -> Result<String> {
        let object = self.object_name(rendered);

        self.store
            .upload_from_file(&object, rendered.path(), VIDEO_CONTENT_TYPE)
            .await
            .map_err(|e| {
                tracing::error!(bucket = self.store.bucket(), object = %object, error = %e, "upload failed");
                CombineError::Publish(e)
            })?;

        if self.make_public {
            self.store.make_public(&object).await.map_err(|e| {
                tracing::error!(bucket = self.store.bucket(), object = %object, error = %e, "failed to make object public");
                CombineError::Publish(e)
            })?;
        }

        let url = self.store.public_url(&object);
        tracing::info!(bucket = self.store.bucket(), object = %object, %url, "published video");

        Ok(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scratch::Scratch;
    use crate::test_store::MemoryStore;

    fn rendered(dir: &std::path::Path) -> TempAsset {
        let asset = Scratch::new(Some(dir.to_path_buf()))
            .create("overdub-render-", ".mp4")
            .unwrap();
        std::fs::write(asset.path(), b"rendered").unwrap();
        asset
    }

    #[tokio::test]
    async fn uploads_under_prefix_and_returns_public_url() {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(MemoryStore::default());
        let publisher = Publisher::new(store.clone(), &PublishConfig::default());
        let asset = rendered(dir.path());

        let url = publisher.publish(&asset).await.unwrap();

        let object = format!("output_video_{}", asset.file_name());
        assert_eq!(url, format!("https://storage.test/test-bucket/{object}"));

        let (bytes, content_type) = store.object(&object).unwrap();
        assert_eq!(bytes, b"rendered");
        assert_eq!(content_type, "video/mp4");
        assert!(store.is_public(&object));
    }

    #[tokio::test]
    async fn make_public_can_be_disabled() {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(MemoryStore::failing_acl());
        let config = PublishConfig {
            object_prefix: "renders/".to_string(),
            make_public: false,
        };
        let publisher = Publisher::new(store.clone(), &config);
        let asset = rendered(dir.path());

        let url = publisher.publish(&asset).await.unwrap();

        let object = publisher.object_name(&asset);
        assert!(object.starts_with("renders/overdub-render-"));
        assert!(url.ends_with(&object));
        assert!(!store.is_public(&object));
    }

    #[tokio::test]
    async fn storage_failures_are_internal() {
        let dir = tempfile::tempdir().unwrap();
        let asset = rendered(dir.path());

        let failing_upload = Publisher::new(
            Arc::new(MemoryStore::failing_uploads()),
            &PublishConfig::default(),
        );
        assert!(matches!(
            failing_upload.publish(&asset).await,
            Err(CombineError::Publish(_))
        ));

        let failing_acl = Publisher::new(
            Arc::new(MemoryStore::failing_acl()),
            &PublishConfig::default(),
        );
        assert!(matches!(failing_acl.publish(&asset).await, Err(CombineError::Publish(_))));
    }
}
