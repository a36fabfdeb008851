use std::time::{Duration, Instant};

use overdub_config::GcsCredentials;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use tokio::sync::Mutex;

use crate::error::{Result, StorageError};

const DEFAULT_METADATA_HOST: &str = "metadata.google.internal";
const TOKEN_PATH: &str = "/computeMetadata/v1/instance/service-accounts/default/token";

/// Tokens are refreshed this long before they expire
const REFRESH_MARGIN: Duration = Duration::from_secs(60);

/// Where bearer tokens for the storage API come from
pub enum TokenSource {
    /// GCE / Cloud Run metadata server, cached until close to expiry
    Metadata {
        host: String,
        cached: Mutex<Option<CachedToken>>,
    },
    /// Fixed token supplied by configuration
    Static(SecretString),
    /// No `Authorization` header
    Anonymous,
}

pub struct CachedToken {
    value: SecretString,
    expires_at: Instant,
}

#[derive(Deserialize)]
struct MetadataToken {
    access_token: String,
    expires_in: u64,
}

impl TokenSource {
    pub fn from_config(credentials: &GcsCredentials) -> Self {
        match credentials {
            GcsCredentials::Metadata => Self::metadata(
                std::env::var("GCE_METADATA_HOST").unwrap_or_else(|_| DEFAULT_METADATA_HOST.to_string()),
            ),
            GcsCredentials::Token { token } => Self::Static(token.clone()),
            GcsCredentials::Anonymous => Self::Anonymous,
        }
    }

    pub fn metadata(host: String) -> Self {
        Self::Metadata {
            host,
            cached: Mutex::new(None),
        }
    }

    /// Value for the `Authorization` header, if any
    pub(crate) async fn authorization(&self, http: &reqwest::Client) -> Result<Option<String>> {
        match self {
            Self::Anonymous => Ok(None),
            Self::Static(token) => Ok(Some(format!("Bearer {}", token.expose_secret()))),
            Self::Metadata { host, cached } => {
                let mut cached = cached.lock().await;

                if let Some(token) = cached.as_ref()
                    && token.expires_at > Instant::now() + REFRESH_MARGIN
                {
                    return Ok(Some(format!("Bearer {}", token.value.expose_secret())));
                }

                let token = fetch_metadata_token(http, host).await?;
                let header = format!("Bearer {}", token.value.expose_secret());
                *cached = Some(token);

                Ok(Some(header))
            }
        }
    }
}

async fn fetch_metadata_token(http: &reqwest::Client, host: &str) -> Result<CachedToken> {
    let url = format!("http://{host}{TOKEN_PATH}");

    tracing::debug!(%host, "requesting access token from metadata server");

    let response = http
        .get(&url)
        .header("Metadata-Flavor", "Google")
        .send()
        .await
        .map_err(|e| StorageError::Credentials(format!("metadata server unreachable: {e}")))?;

    let status = response.status();
    if !status.is_success() {
        let message = response.text().await.unwrap_or_default();
        return Err(StorageError::Credentials(format!(
            "metadata server returned {status}: {message}"
        )));
    }

    let token: MetadataToken = response
        .json()
        .await
        .map_err(|e| StorageError::Credentials(format!("malformed metadata token response: {e}")))?;

    Ok(CachedToken {
        value: SecretString::from(token.access_token),
        expires_at: Instant::now() + Duration::from_secs(token.expires_in),
    })
}
