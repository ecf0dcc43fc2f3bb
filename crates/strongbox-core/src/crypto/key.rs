//! Key material types: salt, encryption key, auth hash.
//!
//! `EncryptionKey` is an opaque handle. Code outside this crate can only
//! hand it to the cipher engine; there is no public byte accessor and the
//! bytes are zeroized when the last handle is dropped. This approximates a
//! non-extractable platform key but does not defend against an attacker
//! who can read process memory.

use std::fmt;

use subtle::ConstantTimeEq;
use zeroize::Zeroizing;

use crate::codec::{decode_base64_exact, encode_base64, fill_random};
use crate::error::{Result, StrongboxError};

/// Salt length in bytes.
pub const SALT_LENGTH: usize = 16;

/// Length of the derived key and auth hash in bytes (256 bits).
pub const KEY_LENGTH: usize = 32;

/// Per-vault random salt. Not secret; persisted next to the identity.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Salt([u8; SALT_LENGTH]);

impl Salt {
    /// Generate a fresh salt from the OS CSPRNG.
    pub fn generate() -> Self {
        let mut bytes = [0u8; SALT_LENGTH];
        fill_random(&mut bytes);
        Self(bytes)
    }

    /// Build a salt from raw bytes.
    ///
    /// # Errors
    ///
    /// Returns `StrongboxError::InvalidInput` unless exactly 16 bytes are given.
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        let array: [u8; SALT_LENGTH] = bytes.try_into().map_err(|_| {
            StrongboxError::InvalidInput(format!(
                "salt must be {} bytes (got {})",
                SALT_LENGTH,
                bytes.len()
            ))
        })?;
        Ok(Self(array))
    }

    /// Parse the persisted base64 form.
    pub fn from_base64(text: &str) -> Result<Self> {
        decode_base64_exact::<SALT_LENGTH>(text, "salt").map(Self)
    }

    /// Base64 form for storage.
    pub fn to_base64(&self) -> String {
        encode_base64(&self.0)
    }

    pub fn as_bytes(&self) -> &[u8; SALT_LENGTH] {
        &self.0
    }
}

impl fmt::Debug for Salt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Salt").field(&self.to_base64()).finish()
    }
}

/// Symmetric key for record encryption.
///
/// Never serialized. Lives only for one unlocked session.
pub struct EncryptionKey {
    key: Zeroizing<[u8; KEY_LENGTH]>,
}

impl EncryptionKey {
    pub(crate) fn from_bytes(bytes: [u8; KEY_LENGTH]) -> Self {
        Self {
            key: Zeroizing::new(bytes),
        }
    }

    /// Raw key bytes, for the cipher engine only.
    pub(crate) fn as_bytes(&self) -> &[u8; KEY_LENGTH] {
        &self.key
    }
}

impl fmt::Debug for EncryptionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EncryptionKey")
            .field("key", &"[REDACTED]")
            .finish()
    }
}

/// One-way password verifier, safe to persist.
///
/// Equality is constant-time.
#[derive(Clone, Copy)]
pub struct AuthHash([u8; KEY_LENGTH]);

impl AuthHash {
    pub(crate) fn from_bytes(bytes: [u8; KEY_LENGTH]) -> Self {
        Self(bytes)
    }

    /// Parse the persisted base64 form.
    pub fn from_base64(text: &str) -> Result<Self> {
        decode_base64_exact::<KEY_LENGTH>(text, "auth hash").map(Self)
    }

    /// Base64 form for storage.
    pub fn to_base64(&self) -> String {
        encode_base64(&self.0)
    }

    pub fn as_bytes(&self) -> &[u8; KEY_LENGTH] {
        &self.0
    }

    /// Constant-time comparison against arbitrary stored bytes.
    ///
    /// A length mismatch compares unequal.
    pub fn matches(&self, stored: &[u8]) -> bool {
        self.0.as_slice().ct_eq(stored).into()
    }
}

impl PartialEq for AuthHash {
    fn eq(&self, other: &Self) -> bool {
        self.matches(&other.0)
    }
}

impl Eq for AuthHash {}

impl fmt::Debug for AuthHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("AuthHash").field(&self.to_base64()).finish()
    }
}
