//! Storage collaborator traits.
//!
//! The vault core is storage-agnostic. A remote database, a local file, or
//! an in-process map all plug in through these traits. Implementations
//! only ever see [`VaultIdentity`] and [`EncryptedRecord`]; they never
//! receive plaintext or key material.

use uuid::Uuid;

use super::types::{EncryptedRecord, VaultIdentity};
use crate::error::Result;

/// Read/write access to identity records keyed by email.
pub trait IdentityStore: Send + Sync {
    /// Look up an identity.
    ///
    /// # Returns
    ///
    /// Returns `Ok(Some(identity))` if found, `Ok(None)` if not found.
    fn get_identity(&self, email: &str) -> Result<Option<VaultIdentity>>;

    /// Insert or replace an identity.
    ///
    /// Uniqueness is the caller's concern; an existing identity for the same
    /// email is overwritten.
    fn put_identity(&mut self, identity: &VaultIdentity) -> Result<()>;

    /// Remove an identity.
    ///
    /// # Returns
    ///
    /// Returns `true` if something was removed.
    fn delete_identity(&mut self, email: &str) -> Result<bool>;
}

/// CRUD access to encrypted records, grouped by vault identifier.
///
/// All implementations must preserve the `ciphertext` and `nonce` text
/// exactly as given: no re-encoding, trimming, or truncation.
pub trait RecordStore: Send + Sync {
    /// List every record in a vault.
    ///
    /// Records are returned oldest first.
    fn list_records(&self, vault_id: &str) -> Result<Vec<EncryptedRecord>>;

    /// Get a record by ID.
    ///
    /// # Returns
    ///
    /// Returns `Ok(Some(record))` if found, `Ok(None)` if not found.
    fn get_record(&self, vault_id: &str, id: &Uuid) -> Result<Option<EncryptedRecord>>;

    /// Insert a new record or replace the one with the same ID.
    fn put_record(&mut self, record: &EncryptedRecord) -> Result<()>;

    /// Delete a record.
    ///
    /// # Returns
    ///
    /// Returns `true` if the record existed.
    fn delete_record(&mut self, vault_id: &str, id: &Uuid) -> Result<bool>;
}
