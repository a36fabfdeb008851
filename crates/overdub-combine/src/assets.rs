use std::sync::Arc;

use overdub_storage::ObjectStore;

use crate::{
    error::{CombineError, Result},
    scratch::{Scratch, TempAsset},
};

/// Supplies the fixed base video every request is composed onto
pub(crate) struct BaseAssetProvider {
    store: Arc<dyn ObjectStore>,
    object: String,
}

impl BaseAssetProvider {
    pub fn new(store: Arc<dyn ObjectStore>, object: String) -> Self {
        Self { store, object }
    }

    /// Download the base video to a fresh scratch file
    pub async fn fetch(&self, scratch: &Scratch) -> Result<TempAsset> {
        let asset = scratch
            .create("overdub-base-", ".mp4")
            .map_err(|source| CombineError::Scratch {
                step: "base_video",
                source,
            })?;

        if let Err(e) = self.store.download_to_file(&self.object, asset.path()).await {
            tracing::error!(
                bucket = self.store.bucket(),
                object = %self.object,
                error = %e,
                "failed to download base video"
            );
            asset.release();
            return Err(CombineError::BaseVideo(e));
        }

        Ok(asset)
    }
}
