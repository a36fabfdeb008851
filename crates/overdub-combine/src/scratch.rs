use std::io;
use std::path::{Path, PathBuf};

use tempfile::TempPath;

/// Directory that holds per-request temporary media files
#[derive(Debug, Clone)]
pub(crate) struct Scratch {
    dir: PathBuf,
}

impl Scratch {
    pub fn new(dir: Option<PathBuf>) -> Self {
        Self {
            dir: dir.unwrap_or_else(std::env::temp_dir),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Reserve a new empty file named `{prefix}<random>{suffix}`
    pub fn create(&self, prefix: &str, suffix: &str) -> io::Result<TempAsset> {
        let path = tempfile::Builder::new()
            .prefix(prefix)
            .suffix(suffix)
            .tempfile_in(&self.dir)?
            .into_temp_path();

        tracing::trace!(path = %path.display(), "created temporary file");

        Ok(TempAsset { path: Some(path) })
    }
}

/// A temporary file owned by one request
///
/// Deleted on drop, on every exit path. A failed deletion is logged and
/// swallowed so it never replaces the request's real outcome.
#[derive(Debug)]
pub(crate) struct TempAsset {
    path: Option<TempPath>,
}

impl TempAsset {
    pub fn path(&self) -> &Path {
        self.path.as_deref().unwrap_or_else(|| Path::new(""))
    }

    /// Final path component, used to derive published object names
    pub fn file_name(&self) -> String {
        self.path()
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    /// Delete the file now instead of at end of scope
    pub fn release(mut self) {
        self.remove();
    }

    fn remove(&mut self) {
        let Some(path) = self.path.take() else {
            return;
        };

        let shown = path.display().to_string();

        match path.close() {
            Ok(()) => tracing::trace!(path = %shown, "deleted temporary file"),
            Err(e) => tracing::warn!(path = %shown, error = %e, "failed to delete temporary file"),
        }
    }
}

impl Drop for TempAsset {
    fn drop(&mut self) {
        self.remove();
    }
}
