use std::path::Path;

use futures::StreamExt;
use overdub_config::FetchConfig;
use overdub_media::{MediaError, MediaToolkit, StreamKind};
use tokio::io::AsyncWriteExt;
use url::Url;

use crate::{
    error::{CombineError, Result},
    scratch::{Scratch, TempAsset},
};

const STEP: &str = "fetch_audio";

/// Downloads caller-supplied audio into scratch space
pub(crate) struct AudioFetcher {
    http: reqwest::Client,
    max_bytes: u64,
}

impl AudioFetcher {
    pub fn new(config: &FetchConfig) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout_duration()?)
            .user_agent(config.user_agent.clone())
            .build()?;

        Ok(Self {
            http,
            max_bytes: config.max_bytes,
        })
    }

    /// Download `url` and confirm it decodes as audio
    ///
    /// The declared content type is checked before anything touches disk.
    /// On any failure after that, the partial file is deleted before the
    /// error is returned.
    pub async fn fetch(&self, url: &Url, scratch: &Scratch, media: &MediaToolkit) -> Result<TempAsset> {
        let response = self
            .http
            .get(url.clone())
            .send()
            .await
            .map_err(|e| CombineError::AudioUnreachable(describe(&e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(CombineError::AudioUnreachable(format!("origin responded with {status}")));
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default()
            .to_string();

        if !is_audio(&content_type) {
            let declared = if content_type.is_empty() {
                "none".to_string()
            } else {
                content_type
            };
            return Err(CombineError::NotAudio(declared));
        }

        if let Some(length) = response.content_length()
            && length > self.max_bytes
        {
            return Err(CombineError::AudioTooLarge { limit: self.max_bytes });
        }

        let asset = scratch
            .create("overdub-audio-", suffix_for(&content_type))
            .map_err(|source| CombineError::Scratch { step: STEP, source })?;

        let written = match self.stream_to(response, asset.path()).await {
            Ok(written) => written,
            Err(e) => {
                asset.release();
                return Err(e);
            }
        };

        tracing::debug!(%url, bytes = written, content_type = %content_type, "downloaded audio");

        if let Err(e) = media.probe(asset.path()).await.and_then(|clip| clip.require(StreamKind::Audio)) {
            asset.release();
            return Err(match e {
                MediaError::Spawn { .. } => CombineError::Composition(e),
                other => CombineError::UndecodableAudio(other.to_string()),
            });
        }

        Ok(asset)
    }

    async fn stream_to(&self, response: reqwest::Response, destination: &Path) -> Result<u64> {
        let scratch_error = |source: std::io::Error| CombineError::Scratch { step: STEP, source };

        let mut file = tokio::fs::File::create(destination).await.map_err(scratch_error)?;
        let mut stream = response.bytes_stream();
        let mut written: u64 = 0;

        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|e| CombineError::AudioUnreachable(describe(&e)))?;

            written += chunk.len() as u64;
            if written > self.max_bytes {
                return Err(CombineError::AudioTooLarge { limit: self.max_bytes });
            }

            file.write_all(&chunk).await.map_err(scratch_error)?;
        }

        file.flush().await.map_err(scratch_error)?;

        Ok(written)
    }
}

fn describe(error: &reqwest::Error) -> String {
    if error.is_timeout() {
        "request timed out".to_string()
    } else if error.is_connect() {
        "connection failed".to_string()
    } else {
        error.to_string()
    }
}

/// Whether the declared media type is `audio/*`
fn is_audio(content_type: &str) -> bool {
    essence(content_type)
        .split_once('/')
        .is_some_and(|(kind, subtype)| kind.eq_ignore_ascii_case("audio") && !subtype.is_empty())
}

/// Extension for the scratch file, so the decoder can pick a demuxer from it
fn suffix_for(content_type: &str) -> &'static str {
    let essence = essence(content_type).to_ascii_lowercase();

    match essence.split_once('/').map_or("", |(_, subtype)| subtype) {
        "mpeg" | "mp3" | "mpeg3" | "x-mpeg" => ".mp3",
        "wav" | "x-wav" | "wave" | "vnd.wave" => ".wav",
        "ogg" | "opus" => ".ogg",
        "flac" | "x-flac" => ".flac",
        "aac" | "x-aac" => ".aac",
        "mp4" | "x-m4a" | "m4a" => ".m4a",
        "webm" => ".webm",
        _ => ".audio",
    }
}

fn essence(content_type: &str) -> &str {
    content_type.split(';').next().unwrap_or_default().trim()
}
