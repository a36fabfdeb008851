use thiserror::Error;

pub type Result<T> = std::result::Result<T, StorageError>;

/// Object store failures
#[derive(Debug, Error)]
pub enum StorageError {
    /// The object does not exist
    #[error("object '{0}' not found")]
    NotFound(String),

    /// Credentials were missing, expired or lacked permission
    #[error("storage access denied ({status}): {message}")]
    AccessDenied { status: u16, message: String },

    /// The storage API answered with another non-success status
    #[error("storage API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// Transport failure talking to the storage API
    #[error("storage request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// An access token could not be obtained
    #[error("failed to obtain storage credentials: {0}")]
    Credentials(String),

    /// Reading or writing the local file failed
    #[error("local file error: {0}")]
    Io(#[from] std::io::Error),

    /// The store was configured with unusable values
    #[error("invalid storage configuration: {0}")]
    Config(String),
}

impl StorageError {
    /// Map a non-success API status to an error
    pub(crate) fn from_status(status: reqwest::StatusCode, object: &str, message: String) -> Self {
        match status.as_u16() {
            404 => Self::NotFound(object.to_string()),
            401 | 403 => Self::AccessDenied {
                status: status.as_u16(),
                message,
            },
            code => Self::Api { status: code, message },
        }
    }
}
