mod auth;

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use futures::StreamExt;
use overdub_config::GcsConfig;
use serde::Serialize;
use tokio::io::AsyncWriteExt;
use url::Url;

pub use auth::TokenSource;

use crate::{
    ObjectStore,
    error::{Result, StorageError},
    object_segments,
};

const DEFAULT_ENDPOINT: &str = "https://storage.googleapis.com/";
const DEFAULT_PUBLIC_BASE: &str = "https://storage.googleapis.com/";

/// Google Cloud Storage bucket accessed through the JSON API
pub struct GcsStore {
    http: reqwest::Client,
    endpoint: Url,
    public_base: Url,
    bucket: String,
    tokens: TokenSource,
}

#[derive(Serialize)]
struct AclEntry<'a> {
    entity: &'a str,
    role: &'a str,
}

impl GcsStore {
    pub fn new(bucket: String, endpoint: Url, public_base: Url, tokens: TokenSource) -> Result<Self> {
        if endpoint.cannot_be_a_base() || public_base.cannot_be_a_base() {
            return Err(StorageError::Config(
                "storage endpoints must be absolute http(s) URLs".to_string(),
            ));
        }

        let http = reqwest::Client::builder()
            .pool_idle_timeout(Some(Duration::from_secs(30)))
            .tcp_keepalive(Some(Duration::from_secs(60)))
            .tcp_nodelay(true)
            .build()?;

        Ok(Self {
            http,
            endpoint,
            public_base,
            bucket,
            tokens,
        })
    }

    pub fn from_config(bucket: String, config: &GcsConfig) -> Result<Self> {
        let endpoint = match &config.endpoint {
            Some(url) => url.clone(),
            None => Url::parse(DEFAULT_ENDPOINT).map_err(|e| StorageError::Config(e.to_string()))?,
        };
        let public_base = match &config.public_base_url {
            Some(url) => url.clone(),
            None => Url::parse(DEFAULT_PUBLIC_BASE).map_err(|e| StorageError::Config(e.to_string()))?,
        };

        Self::new(bucket, endpoint, public_base, TokenSource::from_config(&config.credentials))
    }

    /// `{endpoint}/{prefix...}/b/{bucket}/o[/{object}]` with every segment percent-encoded
    fn api_url(&self, prefix: &[&str], object: Option<&str>) -> Url {
        let mut url = self.endpoint.clone();
        {
            // `new` rejects cannot-be-a-base endpoints
            if let Ok(mut segments) = url.path_segments_mut() {
                segments.pop_if_empty();
                segments.extend(prefix);
                segments.extend(["b", self.bucket.as_str(), "o"]);
                if let Some(object) = object {
                    segments.push(object);
                }
            }
        }
        url
    }

    async fn authorize(&self, request: reqwest::RequestBuilder) -> Result<reqwest::RequestBuilder> {
        Ok(match self.tokens.authorization(&self.http).await? {
            Some(header) => request.header(reqwest::header::AUTHORIZATION, header),
            None => request,
        })
    }

    async fn send(&self, request: reqwest::RequestBuilder, object: &str) -> Result<reqwest::Response> {
        let response = self.authorize(request).await?.send().await?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let message = response.text().await.unwrap_or_default();
        Err(StorageError::from_status(status, object, message))
    }
}

#[async_trait]
impl ObjectStore for GcsStore {
    fn bucket(&self) -> &str {
        &self.bucket
    }

    async fn download_to_file(&self, object: &str, destination: &Path) -> Result<()> {
        let url = self.api_url(&["storage", "v1"], Some(object));
        let request = self.http.get(url).query(&[("alt", "media")]);
        let response = self.send(request, object).await?;

        let mut file = tokio::fs::File::create(destination).await?;
        let mut body = response.bytes_stream();
        let mut written: u64 = 0;

        while let Some(chunk) = body.next().await {
            let chunk = chunk?;
            file.write_all(&chunk).await?;
            written += chunk.len() as u64;
        }
        file.flush().await?;

        tracing::debug!(bucket = %self.bucket, %object, bytes = written, "downloaded object");
        Ok(())
    }

    async fn upload_from_file(&self, object: &str, source: &Path, content_type: &str) -> Result<()> {
        let file = tokio::fs::File::open(source).await?;
        let length = file.metadata().await?.len();
        let body = reqwest::Body::wrap_stream(tokio_util::io::ReaderStream::new(file));

        let url = self.api_url(&["upload", "storage", "v1"], None);
        let request = self
            .http
            .post(url)
            .query(&[("uploadType", "media"), ("name", object)])
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .header(reqwest::header::CONTENT_LENGTH, length)
            .body(body);

        self.send(request, object).await?;

        tracing::debug!(bucket = %self.bucket, %object, bytes = length, "uploaded object");
        Ok(())
    }

    async fn make_public(&self, object: &str) -> Result<()> {
        let mut url = self.api_url(&["storage", "v1"], Some(object));
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.push("acl");
        }

        let request = self.http.post(url).json(&AclEntry {
            entity: "allUsers",
            role: "READER",
        });

        self.send(request, object).await?;

        tracing::debug!(bucket = %self.bucket, %object, "granted public read");
        Ok(())
    }

    fn public_url(&self, object: &str) -> String {
        let mut url = self.public_base.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty();
            segments.push(&self.bucket);
            segments.extend(object_segments(object));
        }
        url.to_string()
    }
}
