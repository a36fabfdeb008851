use std::time::Duration;

use serde::Deserialize;

/// Remote audio download settings
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FetchConfig {
    /// Whole-request timeout, e.g. `"60s"` or `"2m"`
    #[serde(default = "default_timeout")]
    pub timeout: String,
    /// Upper bound on the downloaded body
    #[serde(default = "default_max_bytes")]
    pub max_bytes: u64,
    /// `User-Agent` sent to audio origins
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout: default_timeout(),
            max_bytes: default_max_bytes(),
            user_agent: default_user_agent(),
        }
    }
}

impl FetchConfig {
    /// Parse the configured timeout
    ///
    /// # Errors
    ///
    /// Returns an error if the timeout is not a valid duration string
    pub fn timeout_duration(&self) -> anyhow::Result<Duration> {
        duration_str::parse(&self.timeout)
            .map_err(|e| anyhow::anyhow!("invalid fetch.timeout '{}': {e}", self.timeout))
    }
}

fn default_timeout() -> String {
    "60s".to_string()
}

#[allow(clippy::missing_const_for_fn)]
fn default_max_bytes() -> u64 {
    100 << 20
}

fn default_user_agent() -> String {
    concat!("overdub/", env!("CARGO_PKG_VERSION")).to_string()
}
