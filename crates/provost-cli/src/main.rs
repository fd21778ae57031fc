//! Provost - environment-driven provisioning of game servers from remote
//! archives or git repositories.

mod config;
mod deploy;
mod error;
mod git;
mod server_files;

use anyhow::Result;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let settings = config::Settings::from_env()?;
    deploy::run(&settings)
}
