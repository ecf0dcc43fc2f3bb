//! Master password handling and vault unlocking with retry logic.

use std::path::Path;

use dialoguer::Password;
use secrecy::{ExposeSecret, SecretString};
use strongbox_core::crypto::validate_master_password;
use strongbox_core::storage::{JsonFileStore, VaultIdentity};
use strongbox_core::{IdentityResolver, RecordVault, TieredIdentityResolver, VaultSession};

use crate::config::default_identity_cache_path;
use crate::constants::{MASTER_PASSWORD_ENV, MAX_UNLOCK_ATTEMPTS};
use crate::errors::CliError;

use super::context::AppContext;
use super::resolver::missing_vault_error;

const FORGOT_HINT: &str =
    "Hint: the master password cannot be recovered. Records stay encrypted without it.";

/// An unlocked vault plus the identity it was unlocked with.
pub struct OpenVault {
    pub vault: RecordVault<JsonFileStore>,
    pub identity: VaultIdentity,
}

fn env_master_password() -> Option<SecretString> {
    std::env::var(MASTER_PASSWORD_ENV)
        .ok()
        .filter(|value| !value.is_empty())
        .map(SecretString::from)
}

/// Read the master password from STRONGBOX_MASTER_PASSWORD or a prompt.
pub fn prompt_master_password(interactive: bool) -> anyhow::Result<SecretString> {
    if let Some(value) = env_master_password() {
        return Ok(value);
    }
    if !interactive {
        return Err(CliError::invalid_input(format!(
            "No master password provided and no TTY available. Set {}.",
            MASTER_PASSWORD_ENV
        ))
        .into());
    }
    Password::new()
        .with_prompt("Master password")
        .interact()
        .map(SecretString::from)
        .map_err(|e| anyhow::anyhow!("Failed to read master password: {}", e))
}

/// Read and validate a new master password (for `init`).
pub fn prompt_new_master_password(
    interactive: bool,
    min_length: usize,
) -> anyhow::Result<SecretString> {
    let password = match env_master_password() {
        Some(value) => value,
        None if interactive => Password::new()
            .with_prompt("Choose a master password")
            .with_confirmation("Confirm master password", "Passwords do not match")
            .interact()
            .map(SecretString::from)
            .map_err(|e| anyhow::anyhow!("Failed to read master password: {}", e))?,
        None => {
            return Err(CliError::invalid_input(format!(
                "No master password provided and no TTY available. Set {}.",
                MASTER_PASSWORD_ENV
            ))
            .into())
        }
    };
    validate_master_password(password.expose_secret(), min_length)
        .map_err(|e| CliError::invalid_input(e.to_string()))?;
    Ok(password)
}

/// Find the identity for the configured email, vault file first, then the
/// local identity cache.
pub fn resolve_identity(
    ctx: &AppContext<'_>,
    vault_path: &Path,
) -> anyhow::Result<(JsonFileStore, VaultIdentity)> {
    let remote = JsonFileStore::open(vault_path)?;
    if !remote.exists() {
        return Err(missing_vault_error(remote.path()).into());
    }
    let email = ctx.email()?;
    let local = JsonFileStore::open(default_identity_cache_path()?)?;

    let mut resolver = TieredIdentityResolver::new(remote, local);
    let identity = resolver.resolve(&email)?.ok_or_else(|| {
        CliError::not_found(
            format!("No vault identity for {}", email),
            "Run:\n  strongbox init --email <EMAIL>",
        )
    })?;
    let (remote, _) = resolver.into_parts();
    Ok((remote, identity))
}

/// Unlock `session`, prompting up to three times when interactive.
pub fn unlock_with_retry(
    session: &VaultSession,
    identity: &VaultIdentity,
    interactive: bool,
) -> anyhow::Result<()> {
    if let Some(password) = env_master_password() {
        return unlock_once(session, identity, &password);
    }

    let max_attempts = if interactive { MAX_UNLOCK_ATTEMPTS } else { 1 };
    let mut attempts = 0;
    loop {
        attempts += 1;
        let password = prompt_master_password(interactive)?;
        match unlock_once(session, identity, &password) {
            Ok(()) => return Ok(()),
            Err(err) if is_auth_failure(&err) => {
                let remaining = max_attempts.saturating_sub(attempts);
                if remaining == 0 {
                    return Err(CliError::auth_failed_with_hint(
                        "Too many failed master password attempts.",
                        FORGOT_HINT,
                    )
                    .into());
                }
                eprintln!(
                    "Invalid master password. {} attempt{} remaining.",
                    remaining,
                    if remaining == 1 { "" } else { "s" }
                );
            }
            Err(err) => return Err(err),
        }
    }
}

fn unlock_once(
    session: &VaultSession,
    identity: &VaultIdentity,
    password: &SecretString,
) -> anyhow::Result<()> {
    match session.unlock_identity(password.expose_secret(), identity) {
        Ok(true) => Ok(()),
        Ok(false) => Err(CliError::auth_failed("Invalid master password").into()),
        Err(err) => Err(CliError::auth_failed(err.unlock_failure_message()).into()),
    }
}

fn is_auth_failure(err: &anyhow::Error) -> bool {
    err.downcast_ref::<CliError>()
        .is_some_and(|cli| cli.code == crate::constants::exit_codes::AUTH_FAILED)
}

/// Resolve, unlock and open the configured vault.
pub fn open_vault(ctx: &AppContext<'_>) -> anyhow::Result<OpenVault> {
    let vault_path = ctx.vault_path()?;
    let (store, identity) = resolve_identity(ctx, &vault_path)?;
    let session = VaultSession::new();
    unlock_with_retry(&session, &identity, ctx.interactive())?;
    tracing::debug!(vault = %vault_path.display(), "vault opened");
    let vault = RecordVault::new(session, store, identity.email.clone());
    Ok(OpenVault { vault, identity })
}
