use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;

/// Overdub video/audio combiner
#[derive(Debug, Parser)]
#[command(name = "overdub", about = "Lay remote audio over a stored base video and publish the result")]
pub struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "overdub.toml", env = "OVERDUB_CONFIG")]
    pub config: PathBuf,

    /// Override the listen address
    #[arg(long, env = "OVERDUB_LISTEN")]
    pub listen: Option<SocketAddr>,
}
