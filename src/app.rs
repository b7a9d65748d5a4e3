//! Per-invocation context shared by every command.

use std::path::PathBuf;

use crate::cli::Cli;
use crate::config::Config;
use crate::error::Result;

pub struct AppContext {
    pub config: Config,
    pub config_path: Option<PathBuf>,
    /// Emit JSON instead of styled text.
    pub robot_mode: bool,
    pub verbosity: u8,
    /// Page source progress is read from and written to.
    pub source_url: String,
}

impl AppContext {
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        let project_root = std::env::current_dir()?;
        let config = Config::load(cli.config.as_deref(), &project_root)?;

        let robot_mode = cli.robot || config.output.is_json();
        let source_url = cli
            .source
            .clone()
            .unwrap_or_else(|| config.source.page_source_url.clone());

        Ok(Self {
            config,
            config_path: cli.config.clone(),
            robot_mode,
            verbosity: cli.verbose,
            source_url,
        })
    }

    /// Robot mode as far as it can be known without a loaded config, for
    /// reporting errors raised while loading it.
    pub fn robot_requested(cli: &Cli) -> bool {
        cli.robot || crate::config::env_requests_json()
    }

    /// Context from an already loaded config, for embedding and tests.
    pub fn with_config(config: Config, robot_mode: bool) -> Self {
        let source_url = config.source.page_source_url.clone();
        Self {
            config,
            config_path: None,
            robot_mode,
            verbosity: 0,
            source_url,
        }
    }
}
