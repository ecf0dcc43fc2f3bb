//! Application context for the Strongbox CLI.
//!
//! Bundles CLI arguments with the loaded config file.

use std::io::IsTerminal;
use std::path::{Path, PathBuf};

use crate::cli::Cli;
use crate::config::{read_config_or_default, StrongboxConfig};
use crate::errors::CliError;

use super::resolver::{resolve_config_path, resolve_email, resolve_vault_path};

pub struct AppContext<'a> {
    cli: &'a Cli,
    config_path: PathBuf,
    config: StrongboxConfig,
}

impl<'a> AppContext<'a> {
    pub fn new(cli: &'a Cli, config_path: PathBuf, config: StrongboxConfig) -> Self {
        Self {
            cli,
            config_path,
            config,
        }
    }

    /// Load the config file (or defaults) for `cli`.
    pub fn load(cli: &'a Cli) -> anyhow::Result<Self> {
        let config_path = resolve_config_path()?;
        let config = read_config_or_default(&config_path)?;
        Ok(Self::new(cli, config_path, config))
    }

    pub fn config(&self) -> &StrongboxConfig {
        &self.config
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    pub fn quiet(&self) -> bool {
        self.cli.quiet
    }

    /// Whether prompts may be shown.
    pub fn interactive(&self) -> bool {
        !self.cli.no_input && std::io::stdin().is_terminal()
    }

    pub fn vault_path(&self) -> anyhow::Result<PathBuf> {
        resolve_vault_path(self.cli, &self.config)
    }

    pub fn email(&self) -> Result<String, CliError> {
        resolve_email(self.cli, &self.config)
    }
}
