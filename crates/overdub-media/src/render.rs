use std::ffi::OsString;
use std::path::Path;
use std::time::Duration;

use crate::{MediaClip, MediaToolkit, StreamKind, command, error::Result};

/// Output codec selection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Encoding {
    pub video_codec: String,
    pub audio_codec: String,
    /// Passed as `-preset` when not empty
    pub preset: String,
    pub audio_bitrate: String,
}

impl Default for Encoding {
    fn default() -> Self {
        Self {
            video_codec: "libx264".to_string(),
            audio_codec: "aac".to_string(),
            preset: "veryfast".to_string(),
            audio_bitrate: "192k".to_string(),
        }
    }
}

impl MediaToolkit {
    /// Render the first `length` of `video` with its sound replaced by `audio`
    ///
    /// Keeps the first video stream of `video` and the first audio stream of
    /// `audio`, cut to the half-open interval `[0, length)`, and writes an MP4
    /// to `output`.
    pub async fn replace_audio(
        &self,
        video: &MediaClip,
        audio: &MediaClip,
        length: Duration,
        output: &Path,
    ) -> Result<()> {
        video.require(StreamKind::Video)?;
        audio.require(StreamKind::Audio)?;

        let args = self.replace_audio_args(video.path(), audio.path(), length, output);

        tracing::debug!(
            video = %video.path().display(),
            audio = %audio.path().display(),
            output = %output.display(),
            length_secs = length.as_secs_f64(),
            "rendering"
        );

        command::run(&self.ffmpeg, args).await?;
        Ok(())
    }

    fn replace_audio_args(&self, video: &Path, audio: &Path, length: Duration, output: &Path) -> Vec<OsString> {
        let mut args: Vec<OsString> = ["-hide_banner", "-nostdin", "-loglevel", "error", "-y", "-i"]
            .into_iter()
            .map(OsString::from)
            .collect();
        args.push(video.into());
        args.push("-i".into());
        args.push(audio.into());

        let encoding = &self.encoding;
        let mut push = |values: &[&str]| args.extend(values.iter().map(OsString::from));

        push(&["-map", "0:v:0", "-map", "1:a:0"]);
        let length = format!("{:.6}", length.as_secs_f64());
        push(&["-t", length.as_str()]);
        push(&["-c:v", encoding.video_codec.as_str()]);
        if !encoding.preset.is_empty() {
            push(&["-preset", encoding.preset.as_str()]);
        }
        push(&["-pix_fmt", "yuv420p"]);
        push(&["-c:a", encoding.audio_codec.as_str(), "-b:a", encoding.audio_bitrate.as_str()]);
        push(&["-movflags", "+faststart"]);

        args.push(output.into());
        args
    }
}
