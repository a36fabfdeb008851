use std::path::PathBuf;

use serde::Deserialize;

/// Media toolkit configuration
///
/// Codec defaults produce H.264 + AAC MP4 files that browsers and mobile
/// players decode without extra codecs.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MediaConfig {
    /// `ffmpeg` executable
    #[serde(default = "default_ffmpeg_path")]
    pub ffmpeg_path: PathBuf,
    /// `ffprobe` executable
    #[serde(default = "default_ffprobe_path")]
    pub ffprobe_path: PathBuf,
    /// Video encoder
    #[serde(default = "default_video_codec")]
    pub video_codec: String,
    /// Audio encoder
    #[serde(default = "default_audio_codec")]
    pub audio_codec: String,
    /// Encoder speed/size trade-off passed as `-preset`
    #[serde(default = "default_preset")]
    pub preset: String,
    /// Audio bitrate passed as `-b:a`
    #[serde(default = "default_audio_bitrate")]
    pub audio_bitrate: String,
    /// Directory for per-request temporary files (OS temp dir when unset)
    #[serde(default)]
    pub scratch_dir: Option<PathBuf>,
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self {
            ffmpeg_path: default_ffmpeg_path(),
            ffprobe_path: default_ffprobe_path(),
            video_codec: default_video_codec(),
            audio_codec: default_audio_codec(),
            preset: default_preset(),
            audio_bitrate: default_audio_bitrate(),
            scratch_dir: None,
        }
    }
}

fn default_ffmpeg_path() -> PathBuf {
    PathBuf::from("ffmpeg")
}

fn default_ffprobe_path() -> PathBuf {
    PathBuf::from("ffprobe")
}

fn default_video_codec() -> String {
    "libx264".to_string()
}

fn default_audio_codec() -> String {
    "aac".to_string()
}

fn default_preset() -> String {
    "veryfast".to_string()
}

fn default_audio_bitrate() -> String {
    "192k".to_string()
}
