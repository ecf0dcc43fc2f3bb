//! Path and identity resolution for config and vault files.

use std::path::{Path, PathBuf};

use crate::cli::Cli;
use crate::config::{default_config_path, default_vault_path, StrongboxConfig};
use crate::constants::CONFIG_ENV;
use crate::errors::CliError;

/// Resolve the config file path, checking STRONGBOX_CONFIG first.
pub fn resolve_config_path() -> anyhow::Result<PathBuf> {
    if let Ok(value) = std::env::var(CONFIG_ENV) {
        if !value.trim().is_empty() {
            return Ok(PathBuf::from(value));
        }
    }
    default_config_path()
}

/// Resolve the vault file from CLI args, then config, then the XDG default.
pub fn resolve_vault_path(cli: &Cli, config: &StrongboxConfig) -> anyhow::Result<PathBuf> {
    if let Some(path) = cli.vault.as_deref().filter(|p| !p.trim().is_empty()) {
        return Ok(PathBuf::from(path));
    }
    if let Some(path) = config.vault.path.as_deref() {
        return Ok(PathBuf::from(path));
    }
    default_vault_path()
}

/// Resolve the account email from CLI args or config.
pub fn resolve_email(cli: &Cli, config: &StrongboxConfig) -> Result<String, CliError> {
    cli.email
        .as_deref()
        .or(config.vault.email.as_deref())
        .map(|email| email.trim().to_ascii_lowercase())
        .filter(|email| !email.is_empty())
        .ok_or_else(|| {
            CliError::invalid_input(
                "No account email provided. Use --email, STRONGBOX_EMAIL, or run `strongbox init`.",
            )
        })
}

/// Error when the vault file is missing.
pub fn missing_vault_error(path: &Path) -> CliError {
    CliError::not_found(
        format!("No vault found at {}", path.display()),
        "Run:\n  strongbox init\n\nOr specify a vault path:\n  STRONGBOX_PATH=/path/to/vault.json strongbox init",
    )
}
