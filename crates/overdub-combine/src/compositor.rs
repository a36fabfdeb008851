use std::path::Path;
use std::time::Duration;

use overdub_media::MediaToolkit;

use crate::{
    error::{CombineError, Result},
    scratch::{Scratch, TempAsset},
};

/// Slack allowed between audio and video lengths before the video counts as too short
const LENGTH_TOLERANCE: Duration = Duration::from_millis(1);

/// Lays fetched audio over the base video
pub(crate) struct Compositor {
    media: MediaToolkit,
}

impl Compositor {
    pub fn new(media: MediaToolkit) -> Self {
        Self { media }
    }

    /// Render the first audio-length of `video` with `audio` as its only sound
    ///
    /// Both inputs are decoded here and released before this returns, so the
    /// caller may delete them right away.
    pub async fn compose(&self, video: &Path, audio: &Path, scratch: &Scratch) -> Result<TempAsset> {
        let audio = self.media.probe(audio).await.map_err(CombineError::Composition)?;
        let video = self.media.probe(video).await.map_err(CombineError::Composition)?;

        let length = audio.duration();
        check_lengths(video.duration(), length)?;

        let output = scratch
            .create("overdub-render-", ".mp4")
            .map_err(|source| CombineError::Scratch { step: "compose", source })?;

        if let Err(e) = self.media.replace_audio(&video, &audio, length, output.path()).await {
            output.release();
            return Err(CombineError::Composition(e));
        }

        tracing::debug!(
            output = %output.path().display(),
            length_secs = length.as_secs_f64(),
            "composed video"
        );

        Ok(output)
    }
}

fn check_lengths(video: Duration, audio: Duration) -> Result<()> {
    if video + LENGTH_TOLERANCE < audio {
        return Err(CombineError::BaseVideoTooShort {
            video_secs: video.as_secs_f64(),
            audio_secs: audio.as_secs_f64(),
        });
    }
    Ok(())
}
