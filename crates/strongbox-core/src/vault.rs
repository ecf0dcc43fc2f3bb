//! Record CRUD over a session and a record store.
//!
//! [`RecordVault`] is the path every record takes: plaintext in, through the
//! session's key, ciphertext out to storage, and back. Each write encrypts
//! with a fresh nonce, including updates of unchanged content.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::analyzer::{analyze, SecurityReport};
use crate::crypto::EncryptedPayload;
use crate::error::{Result, StrongboxError};
use crate::session::VaultSession;
use crate::storage::{
    Category, DecryptedRecord, EncryptedRecord, NewRecord, PlaintextRecord, RecordFilter,
    RecordStore,
};

/// Result of decrypting a whole vault.
#[derive(Debug, Default)]
pub struct DecryptedBatch {
    pub records: Vec<DecryptedRecord>,
    /// Records that failed to decrypt and were skipped
    pub unreadable: Vec<Uuid>,
}

/// Encrypted record collection for one vault.
pub struct RecordVault<S> {
    session: VaultSession,
    store: S,
    vault_id: String,
}

impl<S: RecordStore> RecordVault<S> {
    pub fn new(session: VaultSession, store: S, vault_id: impl Into<String>) -> Self {
        Self {
            session,
            store,
            vault_id: vault_id.into(),
        }
    }

    pub fn session(&self) -> &VaultSession {
        &self.session
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Encrypt and store a new record.
    pub fn add(&mut self, new: &NewRecord) -> Result<EncryptedRecord> {
        let payload = self.session.encrypt(&new.record)?;
        let now = Utc::now();
        let record = EncryptedRecord {
            id: Uuid::now_v7(),
            vault_id: self.vault_id.clone(),
            ciphertext: payload.ciphertext,
            nonce: payload.nonce,
            category: new.category,
            favorite: new.favorite,
            created_at: now,
            updated_at: now,
        };
        self.store.put_record(&record)?;
        tracing::debug!(record_id = %record.id, "record added");
        Ok(record)
    }

    /// Replace the secret content of a record.
    pub fn update(&mut self, id: &Uuid, record: &PlaintextRecord) -> Result<EncryptedRecord> {
        self.ensure_unlocked()?;
        let mut stored = self.require(id)?;
        let EncryptedPayload { ciphertext, nonce } = self.session.encrypt(record)?;
        stored.ciphertext = ciphertext;
        stored.nonce = nonce;
        stored.updated_at = Utc::now();
        self.store.put_record(&stored)?;
        tracing::debug!(record_id = %stored.id, "record updated");
        Ok(stored)
    }

    /// Toggle the favorite flag. Metadata only; requires an unlocked session.
    pub fn set_favorite(&mut self, id: &Uuid, favorite: bool) -> Result<EncryptedRecord> {
        self.ensure_unlocked()?;
        let mut stored = self.require(id)?;
        stored.favorite = favorite;
        self.store.put_record(&stored)?;
        Ok(stored)
    }

    /// Change the category. Metadata only; requires an unlocked session.
    pub fn set_category(&mut self, id: &Uuid, category: Category) -> Result<EncryptedRecord> {
        self.ensure_unlocked()?;
        let mut stored = self.require(id)?;
        stored.category = category;
        self.store.put_record(&stored)?;
        Ok(stored)
    }

    /// Fetch and decrypt one record.
    pub fn get(&self, id: &Uuid) -> Result<DecryptedRecord> {
        self.ensure_unlocked()?;
        let stored = self.require(id)?;
        let record = self.session.decrypt(&stored.ciphertext, &stored.nonce)?;
        Ok(decrypted(&stored, record))
    }

    /// Stored (still encrypted) records.
    pub fn list(&self) -> Result<Vec<EncryptedRecord>> {
        self.store.list_records(&self.vault_id)
    }

    /// Find a record whose ID starts with `prefix`.
    ///
    /// # Errors
    ///
    /// Returns `StrongboxError::InvalidInput` when the prefix is blank or
    /// ambiguous and `StrongboxError::NotFound` on no match.
    pub fn find_by_prefix(&self, prefix: &str) -> Result<Uuid> {
        let prefix = prefix.trim().to_ascii_lowercase();
        if prefix.is_empty() {
            return Err(StrongboxError::InvalidInput(
                "Record ID prefix cannot be empty".to_string(),
            ));
        }
        if let Ok(id) = Uuid::parse_str(&prefix) {
            return Ok(id);
        }
        let matches: Vec<Uuid> = self
            .list()?
            .into_iter()
            .map(|record| record.id)
            .filter(|id| id.to_string().starts_with(&prefix))
            .collect();
        match matches.as_slice() {
            [id] => Ok(*id),
            [] => Err(StrongboxError::NotFound(format!("record {}", prefix))),
            _ => Err(StrongboxError::InvalidInput(format!(
                "Record ID prefix {} is ambiguous ({} matches)",
                prefix,
                matches.len()
            ))),
        }
    }

    /// Delete a record.
    pub fn delete(&mut self, id: &Uuid) -> Result<()> {
        self.ensure_unlocked()?;
        if !self.store.delete_record(&self.vault_id, id)? {
            return Err(StrongboxError::RecordNotFound(*id));
        }
        tracing::debug!(record_id = %id, "record deleted");
        Ok(())
    }

    /// Decrypt every record that passes `filter`.
    ///
    /// Records that fail to decrypt are skipped and listed in
    /// [`DecryptedBatch::unreadable`]; a locked session fails the whole call.
    pub fn decrypt_all(&self, filter: &RecordFilter) -> Result<DecryptedBatch> {
        let stored = self.list()?;
        let payloads: Vec<EncryptedPayload> = stored
            .iter()
            .map(|record| EncryptedPayload {
                ciphertext: record.ciphertext.clone(),
                nonce: record.nonce.clone(),
            })
            .collect();
        let results = self.session.decrypt_batch(&payloads)?;

        let mut batch = DecryptedBatch::default();
        for (meta, result) in stored.iter().zip(results) {
            match result {
                Ok(record) => {
                    let entry = decrypted(meta, record);
                    if filter.matches(&entry) {
                        batch.records.push(entry);
                    }
                }
                Err(err) => {
                    tracing::warn!(record_id = %meta.id, error = %err, "skipping unreadable record");
                    batch.unreadable.push(meta.id);
                }
            }
        }
        Ok(batch)
    }

    /// Decrypt everything and run the password health analysis.
    pub fn audit(&self, now: DateTime<Utc>) -> Result<SecurityReport> {
        let batch = self.decrypt_all(&RecordFilter::default())?;
        Ok(analyze(&batch.records, now))
    }

    fn require(&self, id: &Uuid) -> Result<EncryptedRecord> {
        self.store
            .get_record(&self.vault_id, id)?
            .ok_or(StrongboxError::RecordNotFound(*id))
    }

    fn ensure_unlocked(&self) -> Result<()> {
        if self.session.is_unlocked() {
            Ok(())
        } else {
            Err(StrongboxError::VaultLocked)
        }
    }
}

fn decrypted(meta: &EncryptedRecord, record: PlaintextRecord) -> DecryptedRecord {
    DecryptedRecord {
        id: meta.id,
        category: meta.category,
        favorite: meta.favorite,
        created_at: meta.created_at,
        updated_at: meta.updated_at,
        record,
    }
}
