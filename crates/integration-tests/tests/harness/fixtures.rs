//! Media fixtures generated at test time

use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::time::Duration;

use overdub_media::{Encoding, MediaToolkit};

pub fn toolkit() -> MediaToolkit {
    MediaToolkit::new(
        PathBuf::from("ffmpeg"),
        PathBuf::from("ffprobe"),
        Encoding {
            video_codec: "mpeg4".to_string(),
            preset: String::new(),
            ..Encoding::default()
        },
    )
}

/// Whether `ffmpeg` and `ffprobe` can be run; logs a skip notice when not
pub async fn toolkit_available() -> bool {
    if toolkit().check().await.is_ok() {
        return true;
    }
    eprintln!("skipping: ffmpeg/ffprobe not installed");
    false
}

/// Mono 16-bit WAV with a 440 Hz tone
pub fn tone_wav(seconds: u32) -> Vec<u8> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate: 8_000,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut cursor = Cursor::new(Vec::new());
    {
        let mut writer = hound::WavWriter::new(&mut cursor, spec).unwrap();
        for n in 0..spec.sample_rate * seconds {
            let t = f64::from(n) / f64::from(spec.sample_rate);
            let sample = (t * 440.0 * std::f64::consts::TAU).sin() * f64::from(i16::MAX / 4);
            #[allow(clippy::cast_possible_truncation)]
            writer.write_sample(sample as i16).unwrap();
        }
        writer.finalize().unwrap();
    }
    cursor.into_inner()
}

/// MP4 with a test pattern and its own audio track, `seconds` long
pub async fn base_video(seconds: u32) -> Vec<u8> {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("base.mp4");

    let status = tokio::process::Command::new("ffmpeg")
        .args(["-hide_banner", "-loglevel", "error", "-y", "-f", "lavfi", "-i"])
        .arg(format!("testsrc=duration={seconds}:size=160x120:rate=10"))
        .args(["-f", "lavfi", "-i"])
        .arg(format!("sine=frequency=220:duration={seconds}"))
        .args(["-c:v", "mpeg4", "-c:a", "aac", "-shortest"])
        .arg(&path)
        .status()
        .await
        .unwrap();
    assert!(status.success());

    std::fs::read(&path).unwrap()
}

/// Duration of encoded media held in memory
pub async fn duration_of(bytes: &[u8]) -> Duration {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("probe.mp4");
    std::fs::write(&path, bytes).unwrap();
    probe_duration(&path).await
}

pub async fn probe_duration(path: &Path) -> Duration {
    toolkit().probe(path).await.unwrap().duration()
}

/// Files left in a scratch directory
pub fn leftovers(dir: &Path) -> Vec<String> {
    std::fs::read_dir(dir)
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect()
}
