//! Unlocked-session key holder.
//!
//! A [`VaultSession`] is either `Locked` (no key) or `Unlocked` (exactly one
//! key). Every record encrypt/decrypt goes through it and fails with
//! `StrongboxError::VaultLocked` while locked.
//!
//! The key lives in a shared slot. Each operation snapshots the key handle
//! once at its start, so a concurrent `lock()` either happens before the
//! snapshot (the call fails with `VaultLocked`) or after it (the in-flight
//! call finishes with the key it already holds). The key bytes are zeroized
//! when the last snapshot is dropped.

use std::sync::Arc;

use parking_lot::RwLock;
use secrecy::{ExposeSecret, SecretString};

use crate::crypto::{self, AuthHash, EncryptedPayload, EncryptionKey, Salt};
use crate::error::{Result, StrongboxError};
use crate::storage::{PlaintextRecord, VaultIdentity};

/// Session state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Locked,
    Unlocked,
}

/// Values the caller persists after registering a vault.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VaultCredentials {
    pub salt: Salt,
    pub auth_hash: AuthHash,
}

impl VaultCredentials {
    /// The identity record to persist for `email`.
    pub fn to_identity(&self, email: &str) -> VaultIdentity {
        VaultIdentity {
            email: email.to_string(),
            salt: self.salt.to_base64(),
            auth_hash: self.auth_hash.to_base64(),
            created_at: chrono::Utc::now(),
        }
    }
}

/// Holds the in-memory encryption key for one session.
///
/// Cloning gives another handle onto the same key slot; locking through any
/// handle locks them all.
#[derive(Clone, Default)]
pub struct VaultSession {
    key: Arc<RwLock<Option<Arc<EncryptionKey>>>>,
}

impl VaultSession {
    /// Create a locked session.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> SessionState {
        if self.key.read().is_some() {
            SessionState::Unlocked
        } else {
            SessionState::Locked
        }
    }

    pub fn is_unlocked(&self) -> bool {
        self.state() == SessionState::Unlocked
    }

    /// Register a new vault and unlock with its key.
    ///
    /// Returns the salt and auth hash for the caller to persist. Does not
    /// check whether an identity already exists.
    pub fn initialize_vault(&self, master_password: &str) -> Result<VaultCredentials> {
        let derived = crypto::initialize(master_password)?;
        self.install(derived.encryption_key);
        tracing::info!("vault initialized; session unlocked");
        Ok(VaultCredentials {
            salt: derived.salt,
            auth_hash: derived.auth_hash,
        })
    }

    /// Unlock an existing vault.
    ///
    /// A wrong password is `Ok(false)` and leaves the session state as it
    /// was. Only a malformed salt is an error.
    pub fn unlock(&self, master_password: &str, salt: &Salt, auth_hash: &AuthHash) -> Result<bool> {
        self.unlock_raw(master_password, salt.as_bytes(), auth_hash.as_bytes())
    }

    /// Unlock from the persisted identity record.
    ///
    /// # Errors
    ///
    /// Returns `StrongboxError::Format` or `StrongboxError::InvalidInput`
    /// when the stored salt or auth hash text cannot be parsed.
    pub fn unlock_identity(&self, master_password: &str, identity: &VaultIdentity) -> Result<bool> {
        let salt = Salt::from_base64(&identity.salt)?;
        let auth_hash = AuthHash::from_base64(&identity.auth_hash)?;
        self.unlock(master_password, &salt, &auth_hash)
    }

    /// Unlock with raw salt/hash bytes as read from storage.
    pub fn unlock_raw(&self, master_password: &str, salt: &[u8], auth_hash: &[u8]) -> Result<bool> {
        match crypto::unlock(master_password, salt, auth_hash)? {
            Some(key) => {
                self.install(key);
                tracing::info!("session unlocked");
                Ok(true)
            }
            None => {
                tracing::warn!("unlock rejected: master password did not verify");
                Ok(false)
            }
        }
    }

    /// [`initialize_vault`](Self::initialize_vault) on tokio's blocking pool.
    pub async fn initialize_vault_async(
        &self,
        master_password: SecretString,
    ) -> Result<VaultCredentials> {
        let session = self.clone();
        tokio::task::spawn_blocking(move || {
            session.initialize_vault(master_password.expose_secret())
        })
        .await
        .map_err(|e| StrongboxError::Other(format!("Key derivation task failed: {}", e)))?
    }

    /// [`unlock`](Self::unlock) on tokio's blocking pool.
    pub async fn unlock_async(
        &self,
        master_password: SecretString,
        salt: Salt,
        auth_hash: AuthHash,
    ) -> Result<bool> {
        let session = self.clone();
        tokio::task::spawn_blocking(move || {
            session.unlock(master_password.expose_secret(), &salt, &auth_hash)
        })
        .await
        .map_err(|e| StrongboxError::Other(format!("Key derivation task failed: {}", e)))?
    }

    /// Drop the held key. Idempotent.
    pub fn lock(&self) {
        if self.key.write().take().is_some() {
            tracing::info!("session locked");
        }
    }

    /// Same as [`lock`](Self::lock).
    pub fn logout(&self) {
        self.lock();
    }

    /// Encrypt a record with the session key.
    pub fn encrypt(&self, record: &PlaintextRecord) -> Result<EncryptedPayload> {
        let key = self.snapshot_key()?;
        crypto::encrypt(record, &key)
    }

    /// Decrypt a stored payload with the session key.
    pub fn decrypt(&self, ciphertext: &str, nonce: &str) -> Result<PlaintextRecord> {
        let key = self.snapshot_key()?;
        crypto::decrypt(ciphertext, nonce, &key)
    }

    /// Encrypt several records under one key snapshot.
    pub fn encrypt_batch(&self, records: &[PlaintextRecord]) -> Result<Vec<EncryptedPayload>> {
        let key = self.snapshot_key()?;
        crypto::encrypt_batch(records, &key)
    }

    /// Decrypt several payloads under one key snapshot.
    ///
    /// Fails as a whole only when the session is locked; per-payload
    /// failures are reported in their own slot.
    pub fn decrypt_batch(
        &self,
        payloads: &[EncryptedPayload],
    ) -> Result<Vec<Result<PlaintextRecord>>> {
        let key = self.snapshot_key()?;
        Ok(crypto::decrypt_batch(payloads, &key))
    }

    fn install(&self, key: EncryptionKey) {
        *self.key.write() = Some(Arc::new(key));
    }

    fn snapshot_key(&self) -> Result<Arc<EncryptionKey>> {
        self.key.read().clone().ok_or(StrongboxError::VaultLocked)
    }
}

impl std::fmt::Debug for VaultSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VaultSession")
            .field("state", &self.state())
            .finish()
    }
}
