use std::path::PathBuf;

use secrecy::ExposeSecret;
use strongbox_core::storage::JsonFileStore;
use strongbox_core::{IdentityStore, VaultSession};

use crate::app::{prompt_new_master_password, AppContext};
use crate::cli::InitArgs;
use crate::config::{default_identity_cache_path, write_config, StrongboxConfig};
use crate::errors::CliError;

fn validate_email(email: &str) -> Result<(), CliError> {
    let valid = email
        .split_once('@')
        .is_some_and(|(local, domain)| !local.is_empty() && domain.contains('.'));
    if valid {
        Ok(())
    } else {
        Err(CliError::invalid_input(format!("Invalid email address: {}", email)))
    }
}

/// Register a new vault identity and write the config file.
pub fn init(ctx: &AppContext<'_>, args: &InitArgs) -> anyhow::Result<()> {
    let email = ctx.email()?;
    validate_email(&email)?;
    let vault_path = match args.path.as_deref() {
        Some(path) => PathBuf::from(path),
        None => ctx.vault_path()?,
    };

    let mut store = JsonFileStore::open(&vault_path)?;
    if store.get_identity(&email)?.is_some() {
        return Err(CliError::invalid_input(format!(
            "A vault for {} already exists at {}",
            email,
            vault_path.display()
        ))
        .into());
    }

    let password = prompt_new_master_password(
        ctx.interactive(),
        ctx.config().security.min_master_password_length,
    )?;
    let session = VaultSession::new();
    let credentials = session.initialize_vault(password.expose_secret())?;
    session.logout();

    let identity = credentials.to_identity(&email);
    store.put_identity(&identity)?;
    let mut cache = JsonFileStore::open(default_identity_cache_path()?)?;
    if let Err(err) = cache.put_identity(&identity) {
        tracing::warn!(error = %err, "could not write local identity cache");
    }

    let config_path = ctx.config_path();
    if !config_path.exists() || args.force {
        write_config(config_path, &StrongboxConfig::new(&vault_path, &email))?;
    } else if !ctx.quiet() {
        eprintln!(
            "Config at {} left unchanged (use --force to overwrite).",
            config_path.display()
        );
    }

    if !ctx.quiet() {
        println!("Initialized vault for {} at {}", email, vault_path.display());
        println!();
        println!("Your master password cannot be recovered. Keep it somewhere safe.");
    }
    Ok(())
}
