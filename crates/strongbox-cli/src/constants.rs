//! Constants used throughout the CLI.

/// Exit codes for the CLI.
///
/// These follow common Unix conventions:
/// - 0: Success
/// - 1: General error (used by anyhow for unhandled errors)
/// - 2: Misuse of shell command (reserved by shells, clap usage errors)
/// - 3+: Application-specific errors
pub mod exit_codes {
    /// General failure.
    pub const FAILURE: i32 = 1;

    /// Resource not found (config, vault file, identity, record).
    pub const NOT_FOUND: i32 = 3;

    /// Invalid user input or arguments.
    pub const INVALID_INPUT: i32 = 4;

    /// Authentication failed (wrong master password, too many attempts).
    pub const AUTH_FAILED: i32 = 5;

    /// Operation attempted while the vault is locked.
    pub const VAULT_LOCKED: i32 = 6;
}

/// Environment variable holding the master password for non-interactive use.
pub const MASTER_PASSWORD_ENV: &str = "STRONGBOX_MASTER_PASSWORD";

/// Environment variable holding the log filter.
pub const LOG_ENV: &str = "STRONGBOX_LOG";

/// Environment variable overriding the config file location.
pub const CONFIG_ENV: &str = "STRONGBOX_CONFIG";

/// Unlock attempts allowed at an interactive prompt.
pub const MAX_UNLOCK_ATTEMPTS: u32 = 3;
