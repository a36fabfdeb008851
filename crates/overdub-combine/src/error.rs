use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use overdub_core::{ErrorClass, HttpError};
use overdub_media::MediaError;
use overdub_storage::StorageError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CombineError>;

/// Everything that can stop a combine request
#[derive(Debug, Error)]
pub enum CombineError {
    /// `audio_url` is not an absolute http(s) URL
    #[error("Invalid audio URL: {0}")]
    InvalidUrl(String),

    /// The audio origin could not be reached or answered with an error status
    #[error("Could not download audio: {0}")]
    AudioUnreachable(String),

    /// The origin declared a non-audio content type
    #[error("The file is not valid audio (content-type: {0})")]
    NotAudio(String),

    /// The downloaded bytes do not decode as audio
    #[error("The file is not valid audio: {0}")]
    UndecodableAudio(String),

    /// The audio body exceeded the download limit
    #[error("Audio file exceeds the {limit} byte download limit")]
    AudioTooLarge { limit: u64 },

    /// The base video cannot cover the whole audio track
    #[error("Base video is too short: {video_secs:.2}s of video for {audio_secs:.2}s of audio")]
    BaseVideoTooShort { video_secs: f64, audio_secs: f64 },

    /// The base video could not be retrieved from the object store
    #[error("Base video unavailable: {0}")]
    BaseVideo(#[source] StorageError),

    /// Decoding or rendering failed
    #[error("Composition failed: {0}")]
    Composition(#[source] MediaError),

    /// Upload or ACL update failed
    #[error("Publishing failed: {0}")]
    Publish(#[source] StorageError),

    /// A temporary file could not be created or written
    #[error("Scratch file error during {step}: {source}")]
    Scratch {
        step: &'static str,
        #[source]
        source: std::io::Error,
    },
}

impl CombineError {
    /// Pipeline step the error belongs to
    pub const fn step(&self) -> &'static str {
        match self {
            Self::InvalidUrl(_) => "validate",
            Self::AudioUnreachable(_) | Self::NotAudio(_) | Self::UndecodableAudio(_) | Self::AudioTooLarge { .. } => {
                "fetch_audio"
            }
            Self::BaseVideo(_) => "base_video",
            Self::BaseVideoTooShort { .. } | Self::Composition(_) => "compose",
            Self::Publish(_) => "publish",
            Self::Scratch { step, .. } => *step,
        }
    }
}

impl HttpError for CombineError {
    fn class(&self) -> ErrorClass {
        match self {
            Self::InvalidUrl(_)
            | Self::AudioUnreachable(_)
            | Self::NotAudio(_)
            | Self::UndecodableAudio(_)
            | Self::AudioTooLarge { .. }
            | Self::BaseVideoTooShort { .. } => ErrorClass::InvalidInput,
            Self::BaseVideo(_) | Self::Composition(_) | Self::Publish(_) | Self::Scratch { .. } => {
                ErrorClass::Internal
            }
        }
    }

    fn client_message(&self) -> String {
        match self.class() {
            ErrorClass::InvalidInput => self.to_string(),
            ErrorClass::Internal => "Internal server error".to_string(),
        }
    }
}

impl IntoResponse for CombineError {
    fn into_response(self) -> Response {
        let status: StatusCode = self.status_code();
        (status, Json(self.body())).into_response()
    }
}
