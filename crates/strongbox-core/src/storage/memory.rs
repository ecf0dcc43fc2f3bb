//! In-process store.
//!
//! Backs tests and the local identity cache, and is the in-memory state of
//! [`JsonFileStore`](super::JsonFileStore).

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::traits::{IdentityStore, RecordStore};
use super::types::{EncryptedRecord, VaultIdentity};
use crate::error::Result;

/// In-memory identity and record store.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MemoryStore {
    #[serde(default)]
    identities: BTreeMap<String, VaultIdentity>,

    #[serde(default)]
    records: BTreeMap<String, Vec<EncryptedRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl IdentityStore for MemoryStore {
    fn get_identity(&self, email: &str) -> Result<Option<VaultIdentity>> {
        Ok(self.identities.get(email).cloned())
    }

    fn put_identity(&mut self, identity: &VaultIdentity) -> Result<()> {
        self.identities
            .insert(identity.email.clone(), identity.clone());
        Ok(())
    }

    fn delete_identity(&mut self, email: &str) -> Result<bool> {
        Ok(self.identities.remove(email).is_some())
    }
}

impl RecordStore for MemoryStore {
    fn list_records(&self, vault_id: &str) -> Result<Vec<EncryptedRecord>> {
        Ok(self.records.get(vault_id).cloned().unwrap_or_default())
    }

    fn get_record(&self, vault_id: &str, id: &Uuid) -> Result<Option<EncryptedRecord>> {
        Ok(self
            .records
            .get(vault_id)
            .and_then(|records| records.iter().find(|record| record.id == *id))
            .cloned())
    }

    fn put_record(&mut self, record: &EncryptedRecord) -> Result<()> {
        let records = self.records.entry(record.vault_id.clone()).or_default();
        match records.iter_mut().find(|existing| existing.id == record.id) {
            Some(existing) => *existing = record.clone(),
            None => records.push(record.clone()),
        }
        Ok(())
    }

    fn delete_record(&mut self, vault_id: &str, id: &Uuid) -> Result<bool> {
        let Some(records) = self.records.get_mut(vault_id) else {
            return Ok(false);
        };
        let before = records.len();
        records.retain(|record| record.id != *id);
        Ok(records.len() != before)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::Category;
    use chrono::Utc;

    fn record(vault_id: &str, ciphertext: &str) -> EncryptedRecord {
        let now = Utc::now();
        EncryptedRecord {
            id: Uuid::new_v4(),
            vault_id: vault_id.to_string(),
            ciphertext: ciphertext.to_string(),
            nonce: "AAAAAAAAAAAAAAAA".to_string(),
            category: Category::Login,
            favorite: false,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_put_get_replace_delete() {
        let mut store = MemoryStore::new();
        let mut first = record("a@example.com", "Y2lwaGVy");
        store.put_record(&first).unwrap();
        store.put_record(&record("a@example.com", "b3RoZXI=")).unwrap();

        first.ciphertext = "bmV3".to_string();
        store.put_record(&first).unwrap();

        let listed = store.list_records("a@example.com").unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].ciphertext, "bmV3");

        assert!(store.delete_record("a@example.com", &first.id).unwrap());
        assert!(!store.delete_record("a@example.com", &first.id).unwrap());
        assert!(store.get_record("a@example.com", &first.id).unwrap().is_none());
        assert_eq!(store.list_records("a@example.com").unwrap().len(), 1);
    }

    #[test]
    fn test_vaults_are_isolated() {
        let mut store = MemoryStore::new();
        let a = record("a@example.com", "YQ==");
        store.put_record(&a).unwrap();

        assert!(store.list_records("b@example.com").unwrap().is_empty());
        assert!(store.get_record("b@example.com", &a.id).unwrap().is_none());
        assert!(!store.delete_record("b@example.com", &a.id).unwrap());
    }

    #[test]
    fn test_identity_crud() {
        let mut store = MemoryStore::new();
        let identity = VaultIdentity {
            email: "a@example.com".to_string(),
            salt: "c2FsdA==".to_string(),
            auth_hash: "aGFzaA==".to_string(),
            created_at: Utc::now(),
        };
        assert!(store.get_identity("a@example.com").unwrap().is_none());
        store.put_identity(&identity).unwrap();
        assert_eq!(store.get_identity("a@example.com").unwrap(), Some(identity));
        assert!(store.delete_identity("a@example.com").unwrap());
        assert!(store.get_identity("a@example.com").unwrap().is_none());
    }
}
