//! CLI errors carrying a process exit code.

use std::fmt;

use strongbox_core::StrongboxError;

use crate::constants::exit_codes;

/// An error that ends the process with a specific exit code.
#[derive(Debug)]
pub struct CliError {
    pub code: i32,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    fn new(code: i32, message: impl Into<String>, hint: Option<String>) -> Self {
        Self {
            code,
            message: message.into(),
            hint,
        }
    }

    pub fn not_found(message: impl Into<String>, hint: impl Into<String>) -> Self {
        Self::new(exit_codes::NOT_FOUND, message, Some(hint.into()))
    }

    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::new(exit_codes::INVALID_INPUT, message, None)
    }

    pub fn auth_failed(message: impl Into<String>) -> Self {
        Self::new(exit_codes::AUTH_FAILED, message, None)
    }

    pub fn auth_failed_with_hint(message: impl Into<String>, hint: impl Into<String>) -> Self {
        Self::new(exit_codes::AUTH_FAILED, message, Some(hint.into()))
    }

    pub fn vault_locked() -> Self {
        Self::new(
            exit_codes::VAULT_LOCKED,
            "Vault is locked",
            Some("Hint: run `unlock` to continue.".to_string()),
        )
    }

    /// Print the error and exit.
    pub fn exit(&self) -> ! {
        eprintln!("Error: {}", self.message);
        if let Some(hint) = &self.hint {
            eprintln!();
            eprintln!("{}", hint);
        }
        std::process::exit(self.code)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

impl From<&StrongboxError> for CliError {
    fn from(err: &StrongboxError) -> Self {
        match err {
            StrongboxError::RecordNotFound(_) | StrongboxError::NotFound(_) => Self::new(
                exit_codes::NOT_FOUND,
                err.to_string(),
                Some("Hint: run `strongbox list` to see record IDs.".to_string()),
            ),
            StrongboxError::InvalidInput(_) => Self::invalid_input(err.to_string()),
            StrongboxError::VaultLocked => Self::vault_locked(),
            _ => Self::new(exit_codes::FAILURE, err.to_string(), None),
        }
    }
}

/// Exit code for an error returned from a command.
pub fn exit_code(err: &anyhow::Error) -> i32 {
    if let Some(cli) = err.downcast_ref::<CliError>() {
        return cli.code;
    }
    if let Some(core) = err.downcast_ref::<StrongboxError>() {
        return CliError::from(core).code;
    }
    exit_codes::FAILURE
}
