use thiserror::Error;

pub type Result<T> = std::result::Result<T, MediaError>;

/// Media toolkit failures
#[derive(Debug, Error)]
pub enum MediaError {
    /// The executable could not be started
    #[error("failed to run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The tool ran and exited unsuccessfully
    #[error("{program} exited with {status}: {stderr}")]
    Failed {
        program: String,
        status: String,
        stderr: String,
    },

    /// `ffprobe` output could not be interpreted
    #[error("unreadable probe output: {0}")]
    Probe(String),

    /// The file decoded but lacks a required stream
    #[error("no {0} stream found")]
    MissingStream(&'static str),

    /// The file decoded but reports no usable duration
    #[error("media has no known duration")]
    NoDuration,
}
