//! Master password policy.
//!
//! Applied when a vault is registered. The KDF itself accepts any
//! password; this check only guards new vaults against trivially short
//! master passwords.

use crate::error::{Result, StrongboxError};

/// Default minimum master password length in characters.
pub const MIN_MASTER_PASSWORD_LENGTH: usize = 8;

/// Validate a new master password.
///
/// # Requirements
///
/// - Not empty or only whitespace
/// - At least `min_length` characters long
///
/// # Examples
///
/// ```
/// use strongbox_core::crypto::{validate_master_password, MIN_MASTER_PASSWORD_LENGTH};
///
/// assert!(validate_master_password("my-secure-passphrase-123", MIN_MASTER_PASSWORD_LENGTH).is_ok());
/// assert!(validate_master_password("short", MIN_MASTER_PASSWORD_LENGTH).is_err());
/// ```
pub fn validate_master_password(master_password: &str, min_length: usize) -> Result<()> {
    if master_password.trim().is_empty() {
        return Err(StrongboxError::InvalidInput(
            "Master password cannot be empty".to_string(),
        ));
    }

    let length = master_password.chars().count();
    if length < min_length {
        return Err(StrongboxError::InvalidInput(format!(
            "Master password must be at least {} characters (got {})",
            min_length, length
        )));
    }

    Ok(())
}
