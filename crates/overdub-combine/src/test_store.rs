//! In-memory object store for unit tests

use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::Mutex;

use async_trait::async_trait;
use overdub_storage::{ObjectStore, Result, StorageError};

#[derive(Default)]
pub(crate) struct MemoryStore {
    objects: Mutex<HashMap<String, (Vec<u8>, String)>>,
    public: Mutex<HashSet<String>>,
    fail_uploads: bool,
    fail_acl: bool,
}

impl MemoryStore {
    /// Store whose uploads answer 503
    pub fn failing_uploads() -> Self {
        Self {
            fail_uploads: true,
            ..Self::default()
        }
    }

    /// Store that rejects ACL updates like a uniform-access bucket
    pub fn failing_acl() -> Self {
        Self {
            fail_acl: true,
            ..Self::default()
        }
    }

    pub fn with_object(object: &str, bytes: &[u8]) -> Self {
        let store = Self::default();
        store
            .objects
            .lock()
            .unwrap()
            .insert(object.to_string(), (bytes.to_vec(), "video/mp4".to_string()));
        store
    }

    pub fn object(&self, object: &str) -> Option<(Vec<u8>, String)> {
        self.objects.lock().unwrap().get(object).cloned()
    }

    pub fn is_public(&self, object: &str) -> bool {
        self.public.lock().unwrap().contains(object)
    }
}

#[async_trait]
impl ObjectStore for MemoryStore {
    fn bucket(&self) -> &str {
        "test-bucket"
    }

    async fn download_to_file(&self, object: &str, destination: &Path) -> Result<()> {
        let bytes = self
            .object(object)
            .map(|(bytes, _)| bytes)
            .ok_or_else(|| StorageError::NotFound(object.to_string()))?;
        tokio::fs::write(destination, bytes).await?;
        Ok(())
    }

    async fn upload_from_file(&self, object: &str, source: &Path, content_type: &str) -> Result<()> {
        if self.fail_uploads {
            return Err(StorageError::Api {
                status: 503,
                message: "backend unavailable".to_string(),
            });
        }
        let bytes = tokio::fs::read(source).await?;
        self.objects
            .lock()
            .unwrap()
            .insert(object.to_string(), (bytes, content_type.to_string()));
        Ok(())
    }

    async fn make_public(&self, object: &str) -> Result<()> {
        if self.fail_acl {
            return Err(StorageError::AccessDenied {
                status: 403,
                message: "uniform bucket-level access".to_string(),
            });
        }
        self.public.lock().unwrap().insert(object.to_string());
        Ok(())
    }

    fn public_url(&self, object: &str) -> String {
        format!("https://storage.test/{}/{object}", self.bucket())
    }
}
