//! Per-invocation state shared by every command.

use tracing::debug;

use crate::cli::Cli;
use crate::config::Config;
use crate::error::Result;

#[derive(Debug, Clone)]
pub struct AppContext {
    pub config: Config,
}

impl AppContext {
    /// Load the config layers, resolving relative paths against the working directory.
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        let root = std::env::current_dir()?;
        let config = Config::load(cli.config.as_deref(), &root)?;
        if tracing::enabled!(tracing::Level::DEBUG) {
            let rendered = config.to_toml_string()?;
            debug!(root = %root.display(), "resolved config:\n{rendered}");
        }

        Ok(Self { config })
    }

    /// Context around an already-resolved config.
    pub fn for_config(config: Config) -> Self {
        Self { config }
    }
}
