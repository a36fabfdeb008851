#![allow(clippy::missing_errors_doc, clippy::must_use_candidate)]

//! Thin wrapper around the `ffprobe` / `ffmpeg` command line tools
//!
//! Every call spawns a child process that is awaited to completion and killed
//! if the calling future is dropped, so no decoder outlives the call that
//! started it.

mod command;
mod error;
mod probe;
mod render;

use std::path::PathBuf;

use overdub_config::MediaConfig;

pub use error::{MediaError, Result};
pub use probe::{MediaClip, StreamKind};
pub use render::Encoding;

/// Handle on the external media toolkit
#[derive(Debug, Clone)]
pub struct MediaToolkit {
    ffmpeg: PathBuf,
    ffprobe: PathBuf,
    encoding: Encoding,
}

impl MediaToolkit {
    pub fn new(ffmpeg: PathBuf, ffprobe: PathBuf, encoding: Encoding) -> Self {
        Self {
            ffmpeg,
            ffprobe,
            encoding,
        }
    }

    pub fn from_config(config: &MediaConfig) -> Self {
        Self::new(
            config.ffmpeg_path.clone(),
            config.ffprobe_path.clone(),
            Encoding {
                video_codec: config.video_codec.clone(),
                audio_codec: config.audio_codec.clone(),
                preset: config.preset.clone(),
                audio_bitrate: config.audio_bitrate.clone(),
            },
        )
    }

    /// Confirm both executables can be started
    pub async fn check(&self) -> Result<()> {
        command::run(&self.ffprobe, ["-version"]).await?;
        command::run(&self.ffmpeg, ["-version"]).await?;
        Ok(())
    }
}
