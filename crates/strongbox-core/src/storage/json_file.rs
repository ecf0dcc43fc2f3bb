//! Single-file JSON store.
//!
//! The whole document is rewritten atomically on every mutation. Stored
//! records are already encrypted, so the file itself is not encrypted.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::memory::MemoryStore;
use super::traits::{IdentityStore, RecordStore};
use super::types::{EncryptedRecord, VaultIdentity};
use crate::error::{Result, StrongboxError};
use crate::fs::write_atomic;

/// On-disk format version.
pub const FORMAT_VERSION: &str = "1";

#[derive(Deserialize)]
struct Document {
    format_version: String,
    #[serde(flatten)]
    store: MemoryStore,
}

#[derive(Serialize)]
struct DocumentRef<'a> {
    format_version: &'a str,
    #[serde(flatten)]
    store: &'a MemoryStore,
}

/// File-backed identity and record store.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    state: MemoryStore,
}

impl JsonFileStore {
    /// Open the store at `path`, starting empty if the file does not exist.
    ///
    /// # Errors
    ///
    /// Returns `StrongboxError::Storage` if the file exists but is not a
    /// store document of a supported version.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if !path.exists() {
            return Ok(Self {
                path,
                state: MemoryStore::new(),
            });
        }

        let contents = std::fs::read(&path)?;
        let document: Document = serde_json::from_slice(&contents).map_err(|e| {
            StrongboxError::Storage(format!("Failed to parse {}: {}", path.display(), e))
        })?;
        if document.format_version != FORMAT_VERSION {
            return Err(StrongboxError::Storage(format!(
                "Unsupported store format version: {}",
                document.format_version
            )));
        }

        Ok(Self {
            path,
            state: document.store,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Apply `change` to a copy of the state, persist the copy, then adopt it.
    ///
    /// The in-memory state is untouched when the write fails.
    fn commit<T>(&mut self, change: impl FnOnce(&mut MemoryStore) -> Result<T>) -> Result<T> {
        let mut next = self.state.clone();
        let outcome = change(&mut next)?;
        write_document(&self.path, &next)?;
        self.state = next;
        Ok(outcome)
    }
}

fn write_document(path: &Path, store: &MemoryStore) -> Result<()> {
    let document = DocumentRef {
        format_version: FORMAT_VERSION,
        store,
    };
    let contents = serde_json::to_vec_pretty(&document)?;
    write_atomic(path, &contents).map_err(|e| {
        StrongboxError::Storage(format!("Failed to write {}: {}", path.display(), e))
    })
}

impl IdentityStore for JsonFileStore {
    fn get_identity(&self, email: &str) -> Result<Option<VaultIdentity>> {
        self.state.get_identity(email)
    }

    fn put_identity(&mut self, identity: &VaultIdentity) -> Result<()> {
        self.commit(|state| state.put_identity(identity))
    }

    fn delete_identity(&mut self, email: &str) -> Result<bool> {
        if self.state.get_identity(email)?.is_none() {
            return Ok(false);
        }
        self.commit(|state| state.delete_identity(email))
    }
}

impl RecordStore for JsonFileStore {
    fn list_records(&self, vault_id: &str) -> Result<Vec<EncryptedRecord>> {
        self.state.list_records(vault_id)
    }

    fn get_record(&self, vault_id: &str, id: &Uuid) -> Result<Option<EncryptedRecord>> {
        self.state.get_record(vault_id, id)
    }

    fn put_record(&mut self, record: &EncryptedRecord) -> Result<()> {
        self.commit(|state| state.put_record(record))
    }

    fn delete_record(&mut self, vault_id: &str, id: &Uuid) -> Result<bool> {
        if self.state.get_record(vault_id, id)?.is_none() {
            return Ok(false);
        }
        self.commit(|state| state.delete_record(vault_id, id))
    }
}
