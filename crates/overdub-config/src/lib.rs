#![allow(clippy::must_use_candidate)]

pub mod cors;
mod env;
pub mod fetch;
pub mod health;
mod loader;
pub mod media;
pub mod publish;
pub mod server;
pub mod storage;
pub mod telemetry;

use serde::Deserialize;

pub use cors::*;
pub use fetch::*;
pub use health::*;
pub use media::*;
pub use publish::*;
pub use server::*;
pub use storage::*;
pub use telemetry::TelemetryConfig;

/// Top-level Overdub configuration
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,
    /// Object store holding the base video and published results
    #[serde(default)]
    pub storage: StorageConfig,
    /// Remote audio download settings
    #[serde(default)]
    pub fetch: FetchConfig,
    /// Media toolkit settings
    #[serde(default)]
    pub media: MediaConfig,
    /// Publishing settings
    #[serde(default)]
    pub publish: PublishConfig,
    /// Telemetry configuration
    #[serde(default)]
    pub telemetry: Option<TelemetryConfig>,
}
