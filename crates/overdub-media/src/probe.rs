use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::{
    MediaToolkit, command,
    error::{MediaError, Result},
};

/// Kind of elementary stream inside a container
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamKind {
    Audio,
    Video,
}

impl StreamKind {
    const fn name(self) -> &'static str {
        match self {
            Self::Audio => "audio",
            Self::Video => "video",
        }
    }
}

/// A local media file that decoded successfully
#[derive(Debug, Clone)]
pub struct MediaClip {
    path: PathBuf,
    duration: Duration,
    streams: Vec<StreamKind>,
}

impl MediaClip {
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub const fn duration(&self) -> Duration {
        self.duration
    }

    pub fn has(&self, kind: StreamKind) -> bool {
        self.streams.contains(&kind)
    }

    /// Fail unless the clip carries a `kind` stream
    pub fn require(&self, kind: StreamKind) -> Result<()> {
        if self.has(kind) {
            Ok(())
        } else {
            Err(MediaError::MissingStream(kind.name()))
        }
    }
}

#[derive(Debug, Deserialize)]
struct ProbeOutput {
    #[serde(default)]
    streams: Vec<ProbeStream>,
    #[serde(default)]
    format: Option<ProbeFormat>,
}

#[derive(Debug, Deserialize)]
struct ProbeStream {
    #[serde(default)]
    codec_type: Option<String>,
    #[serde(default)]
    duration: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ProbeFormat {
    #[serde(default)]
    duration: Option<String>,
}

impl MediaToolkit {
    /// Open `path` with `ffprobe` and read its duration and stream layout
    pub async fn probe(&self, path: &Path) -> Result<MediaClip> {
        let stdout = command::run(
            &self.ffprobe,
            [
                OsStr::new("-v"),
                OsStr::new("error"),
                OsStr::new("-print_format"),
                OsStr::new("json"),
                OsStr::new("-show_entries"),
                OsStr::new("format=duration:stream=codec_type,duration"),
                path.as_os_str(),
            ],
        )
        .await?;

        let clip = parse_probe(path, &stdout)?;

        tracing::debug!(
            path = %path.display(),
            duration_secs = clip.duration.as_secs_f64(),
            streams = ?clip.streams,
            "probed media"
        );

        Ok(clip)
    }
}

fn parse_probe(path: &Path, stdout: &[u8]) -> Result<MediaClip> {
    let output: ProbeOutput = serde_json::from_slice(stdout).map_err(|e| MediaError::Probe(e.to_string()))?;

    let streams: Vec<StreamKind> = output
        .streams
        .iter()
        .filter_map(|stream| match stream.codec_type.as_deref() {
            Some("audio") => Some(StreamKind::Audio),
            Some("video") => Some(StreamKind::Video),
            _ => None,
        })
        .collect();

    // Container duration first; some raw streams only report per-stream values
    let container = output
        .format
        .as_ref()
        .and_then(|format| parse_seconds(format.duration.as_deref()));
    let longest_stream = output
        .streams
        .iter()
        .filter_map(|stream| parse_seconds(stream.duration.as_deref()))
        .reduce(f64::max);

    let seconds = container.or(longest_stream).ok_or(MediaError::NoDuration)?;

    Ok(MediaClip {
        path: path.to_path_buf(),
        duration: Duration::from_secs_f64(seconds),
        streams,
    })
}

fn parse_seconds(value: Option<&str>) -> Option<f64> {
    value
        .and_then(|v| v.trim().parse::<f64>().ok())
        .filter(|seconds| seconds.is_finite() && *seconds > 0.0)
}
