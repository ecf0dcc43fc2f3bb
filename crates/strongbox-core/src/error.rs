//! Error types for Strongbox core operations.
//!
//! This module defines the error hierarchy for all core operations.
//! Errors are descriptive at the core level; the CLI layer maps these
//! to user-facing text; unlock failures go through
//! [`StrongboxError::unlock_failure_message`].

use thiserror::Error;
use uuid::Uuid;

/// Result type alias for Strongbox operations.
pub type Result<T> = std::result::Result<T, StrongboxError>;

/// Core error type for Strongbox operations.
#[derive(Debug, Error)]
pub enum StrongboxError {
    /// Malformed salt, key material or other locally validated input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A crypto operation was attempted without an unlocked session
    #[error("Vault is locked")]
    VaultLocked,

    /// Authentication tag mismatch or corrupted ciphertext/nonce/key
    #[error("Decryption failed: {0}")]
    Decryption(String),

    /// Malformed base64 or text encoding
    #[error("Format error: {0}")]
    Format(String),

    /// Encryption primitive failure
    #[error("Encryption error: {0}")]
    Crypto(String),

    /// Storage backend error (generic)
    #[error("Storage error: {0}")]
    Storage(String),

    /// Record not found by ID
    #[error("Record not found: {0}")]
    RecordNotFound(Uuid),

    /// Generic resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// I/O error
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    /// JSON serialization/deserialization error
    #[error("JSON error: {source}")]
    Json {
        #[from]
        source: serde_json::Error,
    },

    /// Generic error (fallback)
    #[error("{0}")]
    Other(String),
}

impl StrongboxError {
    /// Whether the error is the "no active key" condition.
    pub fn is_locked(&self) -> bool {
        matches!(self, StrongboxError::VaultLocked)
    }

    /// Text shown when unlocking fails with this error.
    ///
    /// Every failure that can come out of verifying a master password (bad
    /// salt, bad hash, undecodable identity, primitive failure) renders the
    /// same as a wrong password. Only meant for the unlock path.
    pub fn unlock_failure_message(&self) -> &'static str {
        match self {
            StrongboxError::VaultLocked => "Vault is locked. Unlock it first.",
            _ => "Invalid master password",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unlock_failures_share_message() {
        let failures = [
            StrongboxError::InvalidInput("salt must be 16 bytes".to_string()),
            StrongboxError::Format("invalid base64".to_string()),
            StrongboxError::Crypto("Key expansion failed: internal detail".to_string()),
            StrongboxError::Other("Key derivation task failed: panicked".to_string()),
        ];
        for err in &failures {
            assert_eq!(err.unlock_failure_message(), "Invalid master password");
        }
    }

    #[test]
    fn test_locked_predicate() {
        assert!(StrongboxError::VaultLocked.is_locked());
        assert!(!StrongboxError::Other("x".to_string()).is_locked());
    }
}
