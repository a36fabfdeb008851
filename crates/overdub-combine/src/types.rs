use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{CombineError, Result};

/// Body of `POST /combine-video-audio`
#[derive(Debug, Clone, Deserialize)]
pub struct CombineRequest {
    /// Absolute http(s) URL of the audio to lay over the base video
    pub audio_url: String,
}

impl CombineRequest {
    /// Parse and check `audio_url`
    pub fn audio_url(&self) -> Result<Url> {
        let url = Url::parse(self.audio_url.trim()).map_err(|e| CombineError::InvalidUrl(e.to_string()))?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(CombineError::InvalidUrl(format!(
                "unsupported scheme '{}', expected http or https",
                url.scheme()
            )));
        }

        if url.host_str().is_none_or(str::is_empty) {
            return Err(CombineError::InvalidUrl("missing host".to_string()));
        }

        Ok(url)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CombineResponse {
    /// Public URL of the published video
    pub video_url: String,
}
