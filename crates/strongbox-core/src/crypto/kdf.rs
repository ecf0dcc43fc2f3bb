//! Master-password key derivation using PBKDF2-HMAC-SHA256.
//!
//! One PBKDF2 run turns (master password, salt) into a 256-bit master
//! secret. HKDF-SHA256 then expands that secret under two fixed labels:
//! one output becomes the [`EncryptionKey`], the other the persisted
//! [`AuthHash`]. Knowing the auth hash does not give the encryption key.

use hkdf::Hkdf;
use pbkdf2::pbkdf2_hmac;
use sha2::Sha256;
use zeroize::Zeroizing;

use super::key::{AuthHash, EncryptionKey, Salt, KEY_LENGTH, SALT_LENGTH};
use crate::error::{Result, StrongboxError};

/// PBKDF2 iteration count.
///
/// Balances brute-force resistance against interactive unlock latency.
pub const PBKDF2_ITERATIONS: u32 = 100_000;

const ENCRYPTION_KEY_LABEL: &[u8] = b"strongbox/v1/encryption-key";
const AUTH_HASH_LABEL: &[u8] = b"strongbox/v1/auth-hash";

/// Output of vault registration.
#[derive(Debug)]
pub struct DerivedVault {
    pub encryption_key: EncryptionKey,
    pub auth_hash: AuthHash,
    pub salt: Salt,
}

/// Create key material for a brand-new vault.
///
/// Generates a fresh 16-byte salt, then derives the encryption key and
/// auth hash from it.
///
/// # Examples
///
/// ```
/// use strongbox_core::crypto::{initialize, verify};
///
/// let derived = initialize("correct horse battery staple").unwrap();
/// let salt = derived.salt.as_bytes();
/// assert!(verify("correct horse battery staple", salt, derived.auth_hash.as_bytes()).unwrap());
/// ```
pub fn initialize(master_password: &str) -> Result<DerivedVault> {
    let salt = Salt::generate();
    let master = stretch(master_password, salt.as_bytes())?;
    Ok(DerivedVault {
        encryption_key: EncryptionKey::from_bytes(*expand(&master, ENCRYPTION_KEY_LABEL)?),
        auth_hash: AuthHash::from_bytes(*expand(&master, AUTH_HASH_LABEL)?),
        salt,
    })
}

/// Re-derive the encryption key of an existing vault.
///
/// Deterministic: same password and salt always give the same key.
///
/// # Errors
///
/// Returns `StrongboxError::InvalidInput` if the salt is not 16 bytes.
pub fn derive_key(master_password: &str, salt: &[u8]) -> Result<EncryptionKey> {
    let master = stretch(master_password, salt)?;
    let key = expand(&master, ENCRYPTION_KEY_LABEL)?;
    Ok(EncryptionKey::from_bytes(*key))
}

/// Compute the verifier for (password, salt).
pub fn hash(master_password: &str, salt: &[u8]) -> Result<AuthHash> {
    let master = stretch(master_password, salt)?;
    let hash = expand(&master, AUTH_HASH_LABEL)?;
    Ok(AuthHash::from_bytes(*hash))
}

/// Check a password against a stored verifier in constant time.
///
/// A wrong password is `Ok(false)`, never an error.
pub fn verify(master_password: &str, salt: &[u8], stored_auth_hash: &[u8]) -> Result<bool> {
    Ok(hash(master_password, salt)?.matches(stored_auth_hash))
}

/// Verify and derive in one KDF run.
///
/// Returns `Ok(None)` when the password does not match.
pub fn unlock(
    master_password: &str,
    salt: &[u8],
    stored_auth_hash: &[u8],
) -> Result<Option<EncryptionKey>> {
    let master = stretch(master_password, salt)?;
    let candidate = AuthHash::from_bytes(*expand(&master, AUTH_HASH_LABEL)?);
    if !candidate.matches(stored_auth_hash) {
        return Ok(None);
    }
    let key = expand(&master, ENCRYPTION_KEY_LABEL)?;
    Ok(Some(EncryptionKey::from_bytes(*key)))
}

fn stretch(master_password: &str, salt: &[u8]) -> Result<Zeroizing<[u8; KEY_LENGTH]>> {
    if salt.len() != SALT_LENGTH {
        return Err(StrongboxError::InvalidInput(format!(
            "salt must be {} bytes (got {})",
            SALT_LENGTH,
            salt.len()
        )));
    }

    let mut master = Zeroizing::new([0u8; KEY_LENGTH]);
    pbkdf2_hmac::<Sha256>(
        master_password.as_bytes(),
        salt,
        PBKDF2_ITERATIONS,
        &mut master[..],
    );
    Ok(master)
}

fn expand(master: &[u8; KEY_LENGTH], label: &[u8]) -> Result<Zeroizing<[u8; KEY_LENGTH]>> {
    let hkdf = Hkdf::<Sha256>::new(None, master);
    let mut output = Zeroizing::new([0u8; KEY_LENGTH]);
    hkdf.expand(label, &mut output[..])
        .map_err(|e| StrongboxError::Crypto(format!("Key expansion failed: {}", e)))?;
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SALT: &[u8; 16] = b"unique-salt-1234";

    const KAT_PASSWORD: &str = "correct horse battery staple";
    const KAT_SALT: &[u8; 16] = b"strongbox-kat-16";

    #[test]
    fn test_stretch_known_answer() {
        // PBKDF2-HMAC-SHA256, 100,000 iterations, 32-byte output.
        let master = stretch(KAT_PASSWORD, KAT_SALT).unwrap();
        assert_eq!(
            hex::encode(&master[..]),
            "d0f2a724a58a260d0a91a58cb0ea36dc4db5fb40404b916289d29218cd173973"
        );
    }

    #[test]
    fn test_labelled_outputs_known_answer() {
        let key = derive_key(KAT_PASSWORD, KAT_SALT).unwrap();
        let auth = hash(KAT_PASSWORD, KAT_SALT).unwrap();
        assert_eq!(
            hex::encode(key.as_bytes()),
            "1c85ea10767ba574828cfaa0ea6920a3d0fc8226ab1adfacb3b63713b330e77a"
        );
        assert_eq!(
            hex::encode(auth.as_bytes()),
            "3153bbb0a580809b6e8ef7b9f317042b19b927940c2bb46f0dcf88322729aa1f"
        );
    }

    #[test]
    fn test_key_derivation_deterministic() {
        let key1 = derive_key("test-passphrase", SALT).unwrap();
        let key2 = derive_key("test-passphrase", SALT).unwrap();

        assert_eq!(key1.as_bytes(), key2.as_bytes());
    }

    #[test]
    fn test_different_salt_different_key() {
        let key1 = derive_key("test-passphrase", b"salt1-1234567890").unwrap();
        let key2 = derive_key("test-passphrase", b"salt2-1234567890").unwrap();

        assert_ne!(key1.as_bytes(), key2.as_bytes());
    }

    #[test]
    fn test_different_password_different_key() {
        let key1 = derive_key("passphrase-one", SALT).unwrap();
        let key2 = derive_key("passphrase-two", SALT).unwrap();

        assert_ne!(key1.as_bytes(), key2.as_bytes());
    }

    #[test]
    fn test_hash_is_byte_identical() {
        let hash1 = hash("test-passphrase", SALT).unwrap();
        let hash2 = hash("test-passphrase", SALT).unwrap();

        assert_eq!(hash1.as_bytes(), hash2.as_bytes());
    }

    #[test]
    fn test_auth_hash_differs_from_key() {
        let key = derive_key("test-passphrase", SALT).unwrap();
        let auth = hash("test-passphrase", SALT).unwrap();

        assert_ne!(key.as_bytes(), auth.as_bytes());
    }

    #[test]
    fn test_initialize_consistent_with_derive() {
        let derived = initialize("test-passphrase").unwrap();
        let key = derive_key("test-passphrase", derived.salt.as_bytes()).unwrap();
        let auth = hash("test-passphrase", derived.salt.as_bytes()).unwrap();

        assert_eq!(key.as_bytes(), derived.encryption_key.as_bytes());
        assert_eq!(auth, derived.auth_hash);
    }

    #[test]
    fn test_initialize_fresh_salt_each_time() {
        let first = initialize("same").unwrap();
        let second = initialize("same").unwrap();

        assert_ne!(first.salt, second.salt);
        assert_ne!(first.auth_hash, second.auth_hash);
    }

    #[test]
    fn test_verify_correct_and_wrong() {
        let stored = hash("right-password", SALT).unwrap();

        assert!(verify("right-password", SALT, stored.as_bytes()).unwrap());
        assert!(!verify("wrong-password", SALT, stored.as_bytes()).unwrap());
    }

    #[test]
    fn test_verify_truncated_hash_is_false() {
        let stored = hash("right-password", SALT).unwrap();
        assert!(!verify("right-password", SALT, &stored.as_bytes()[..31]).unwrap());
    }

    #[test]
    fn test_empty_password_is_accepted() {
        assert!(derive_key("", SALT).is_ok());
    }

    #[test]
    fn test_short_salt_rejected() {
        let result = derive_key("test-passphrase", b"short");
        assert!(matches!(result, Err(StrongboxError::InvalidInput(_))));
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("salt must be 16 bytes"));
    }

    #[test]
    fn test_long_salt_rejected() {
        let result = hash("test-passphrase", &[0u8; 32]);
        assert!(matches!(result, Err(StrongboxError::InvalidInput(_))));
    }

    #[test]
    fn test_unlock_returns_key_only_on_match() {
        let stored = hash("right-password", SALT).unwrap();

        let key = unlock("right-password", SALT, stored.as_bytes()).unwrap();
        let expected = derive_key("right-password", SALT).unwrap();
        assert_eq!(key.unwrap().as_bytes(), expected.as_bytes());

        assert!(unlock("wrong-password", SALT, stored.as_bytes())
            .unwrap()
            .is_none());
    }
}
